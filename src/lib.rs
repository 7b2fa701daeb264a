//! Geometry puzzle (workspace facade crate).
//!
//! Re-exports the workspace crates as `geo_puzzle::{core, adapter, term, input, types}`
//! and adds the process-level plumbing shared by both binaries: environment
//! configuration and tracing setup.

pub mod config;
pub mod logging;

pub use geo_puzzle_adapter as adapter;
pub use geo_puzzle_core as core;
pub use geo_puzzle_input as input;
pub use geo_puzzle_term as term;
pub use geo_puzzle_types as types;
