//! Random estate seeding.

use plantation_core::{EstateDimensions, PlantingRules};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// One tree to plant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Planting {
    pub x: i64,
    pub y: i64,
    pub height: i64,
}

/// Pick `count` distinct plots with random heights inside the rules' range.
///
/// Asking for more trees than the estate has plots yields one tree per plot.
pub fn random_plantings<R: Rng>(
    rng: &mut R,
    dims: EstateDimensions,
    rules: &PlantingRules,
    count: usize,
) -> Vec<Planting> {
    let plots = random_plots(rng, dims, count);
    plots
        .into_iter()
        .map(|(x, y)| Planting {
            x,
            y,
            height: rng.random_range(rules.min_height..=rules.max_height),
        })
        .collect()
}

fn random_plots<R: Rng>(rng: &mut R, dims: EstateDimensions, count: usize) -> Vec<(i64, i64)> {
    let total = dims.width as u128 * dims.length as u128;

    // Sparse picks are drawn directly; dense ones shuffle the full grid.
    if (count as u128) * 2 < total {
        let mut seen = HashSet::with_capacity(count);
        let mut plots = Vec::with_capacity(count);
        while plots.len() < count {
            let plot = (
                rng.random_range(1..=dims.length),
                rng.random_range(1..=dims.width),
            );
            if seen.insert(plot) {
                plots.push(plot);
            }
        }
        return plots;
    }

    let mut plots: Vec<(i64, i64)> = (1..=dims.width)
        .flat_map(|y| (1..=dims.length).map(move |x| (x, y)))
        .collect();
    plots.shuffle(rng);
    plots.truncate(count);
    plots
}

#[cfg(test)]
mod tests {
    use super::*;
    use plantation_core::GridCoord;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn plantings_are_distinct_and_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let dims = EstateDimensions::new(5, 6).unwrap();
        let rules = PlantingRules::default();

        let plantings = random_plantings(&mut rng, dims, &rules, 12);
        assert_eq!(plantings.len(), 12);

        let plots: HashSet<_> = plantings.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(plots.len(), 12);
        for p in &plantings {
            assert!(dims.contains(GridCoord::new(p.x, p.y)));
            assert!(rules.height_in_range(p.height));
        }
    }

    #[test]
    fn count_is_capped_at_plot_total() {
        let mut rng = StdRng::seed_from_u64(1);
        let dims = EstateDimensions::new(2, 3).unwrap();
        let plantings = random_plantings(&mut rng, dims, &PlantingRules::default(), 100);
        assert_eq!(plantings.len(), 6);
    }

    #[test]
    fn huge_estate_with_few_trees_samples_directly() {
        let mut rng = StdRng::seed_from_u64(3);
        let dims = EstateDimensions::new(100_000, 100_000).unwrap();
        let rules = PlantingRules::default();

        let plantings = random_plantings(&mut rng, dims, &rules, 10);
        assert_eq!(plantings.len(), 10);

        let plots: HashSet<_> = plantings.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(plots.len(), 10);
        for p in &plantings {
            assert!(dims.contains(GridCoord::new(p.x, p.y)));
        }
    }
}
