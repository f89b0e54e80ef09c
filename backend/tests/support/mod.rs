//! Shared helpers for integration suites.

pub mod cluster_skip;
pub mod embedded_postgres;
pub mod scholarlink_world;
