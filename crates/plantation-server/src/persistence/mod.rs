//! Persistence layer for the plantation server.
//!
//! Provides SQLite-backed storage for estates and trees. `Database`
//! implements the `EstateStore` contract used by the service layer.

pub mod db;
pub mod estates;
pub mod store;
pub mod trees;

pub use db::{init_database, Database};
