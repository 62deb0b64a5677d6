//! Command line client for the plantation server.

use anyhow::Result;
use clap::{Parser, Subcommand};
use plantation_cli::{random_plantings, PlantationClient};
use plantation_core::{EstateDimensions, PlantingRules};

/// Manage estates on a plantation server
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Plantation server URL
    #[arg(long, env = "PLANTATION_URL", default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an estate and print its ID
    CreateEstate {
        #[arg(long)]
        width: i64,
        #[arg(long)]
        length: i64,
    },
    /// Plant one tree
    Plant {
        #[arg(long = "estate")]
        estate_id: String,
        #[arg(long)]
        x: i64,
        #[arg(long)]
        y: i64,
        #[arg(long)]
        height: i64,
    },
    /// Print tree count and height statistics
    Stats {
        #[arg(long = "estate")]
        estate_id: String,
    },
    /// Print the drone travel distance
    DronePlan {
        #[arg(long = "estate")]
        estate_id: String,
    },
    /// List trees in visiting order
    Trees {
        #[arg(long = "estate")]
        estate_id: String,
    },
    /// Create an estate and fill it with randomly placed trees
    Seed {
        #[arg(long)]
        width: i64,
        #[arg(long)]
        length: i64,
        #[arg(long, default_value_t = 10)]
        trees: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    let client = PlantationClient::new(&args.url);

    match args.command {
        Command::CreateEstate { width, length } => {
            println!("{}", client.create_estate(width, length)?);
        }
        Command::Plant {
            estate_id,
            x,
            y,
            height,
        } => {
            println!("{}", client.plant_tree(&estate_id, x, y, height)?);
        }
        Command::Stats { estate_id } => {
            let stats = client.stats(&estate_id)?;
            println!(
                "count={} max={} min={} median={}",
                stats.count, stats.max, stats.min, stats.median
            );
        }
        Command::DronePlan { estate_id } => {
            println!("{}", client.drone_plan(&estate_id)?.distance);
        }
        Command::Trees { estate_id } => {
            for tree in client.trees(&estate_id)? {
                println!("({}, {}) height {}  {}", tree.x, tree.y, tree.height, tree.id);
            }
        }
        Command::Seed {
            width,
            length,
            trees,
        } => seed(&client, width, length, trees)?,
    }

    Ok(())
}

fn seed(client: &PlantationClient, width: i64, length: i64, trees: usize) -> Result<()> {
    let dims = EstateDimensions::new(width, length)?;
    let estate_id = client.create_estate(width, length)?;
    println!("Created estate {}", estate_id);

    let plantings = random_plantings(&mut rand::rng(), dims, &PlantingRules::default(), trees);
    for planting in &plantings {
        client.plant_tree(&estate_id, planting.x, planting.y, planting.height)?;
        println!(
            "Planted ({}, {}) height {}",
            planting.x, planting.y, planting.height
        );
    }

    let stats = client.stats(&estate_id)?;
    let plan = client.drone_plan(&estate_id)?;
    println!(
        "{} trees, median height {}, drone distance {}",
        stats.count, stats.median, plan.distance
    );
    Ok(())
}
