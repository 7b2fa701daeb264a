//! Terminal input module (engine-facing).
//!
//! This module is independent of any UI framework. It maps `crossterm` key
//! events into [`map::KeyAction`]s and resolves pointer drags into
//! [`crate::types::Direction`]s for the sliding grid.

pub mod gesture;
pub mod map;

pub use geo_puzzle_types as types;

pub use gesture::{resolve_direction, DragTracker};
pub use map::{handle_key_event, should_quit, KeyAction};
