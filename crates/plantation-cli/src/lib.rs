//! Plantation CLI - command line tools for the plantation drone service.
//!
//! The `plantation` binary wraps every server endpoint and can seed an
//! estate with randomly placed trees.

pub mod client;
pub mod seed;

pub use client::PlantationClient;
pub use seed::{random_plantings, Planting};
