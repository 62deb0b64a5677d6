//! Shared library surface for the plantation server and its tests.

pub mod api;
pub mod config;
pub mod persistence;
pub mod service;
pub mod state;
