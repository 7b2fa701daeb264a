//! Network adapter: line-delimited JSON over TCP.
//!
//! Exposes puzzle sessions to remote clients (bots, test harnesses). The
//! protocol types live in [`protocol`]; [`server`] owns the tokio listener
//! and the per-connection protocol state.

pub mod protocol;
pub mod server;

pub use geo_puzzle_core as core;
pub use geo_puzzle_types as types;

pub use protocol::{build_observation, parse_message, ParsedMessage, WireCommand};
pub use server::{run_server, Connection, ServerConfig, ServerMessage};
