//! Core puzzle engine - pure, deterministic, and testable
//!
//! This crate contains the game rules, state model and level progression for
//! both puzzle variants. It has **no dependencies** on UI, networking, or I/O:
//!
//! - **Deterministic**: the same commands from the same level always produce the same state
//! - **Synchronous**: every command completes before the caller regains control
//! - **Non-failing**: invalid commands degrade to an [`Outcome`](types::Outcome), never a panic
//!
//! # Module Structure
//!
//! - [`geometry`]: grid rectangles, overlap and bounds checks
//! - [`slide_game`]: sliding-block engine with collision-checked moves and exit detection
//! - [`shape_game`]: shape-transform engine (rotate, expand, duplicate, match)
//! - [`levels`]: validated level catalog, overflow policy, shape level generator
//! - [`session`]: routes [`GameCommand`](types::GameCommand)s to the right engine
//! - [`config`]: behavioral policies
//!
//! # Example
//!
//! ```
//! use geo_puzzle_core::Session;
//! use geo_puzzle_types::{BlockId, Direction, GameCommand, Outcome};
//!
//! let mut session = Session::builtin();
//!
//! // Route moves to the target block and push it one cell right.
//! assert_eq!(session.apply(GameCommand::Select(BlockId(1))), Outcome::Applied);
//! assert_eq!(session.apply(GameCommand::Move(Direction::Right)), Outcome::Applied);
//! assert_eq!(session.slide().moves_left(), 9);
//! ```

pub mod config;
pub mod geometry;
pub mod levels;
pub mod session;
pub mod shape_game;
pub mod slide_game;

pub use geo_puzzle_types as types;

// Re-export commonly used types for convenience
pub use config::EngineConfig;
pub use geometry::Rect;
pub use levels::{CatalogError, LevelCatalog, ShapeLevel, SlideLevel};
pub use session::Session;
pub use shape_game::{Piece, ShapeGame, ShapeState, TargetDescriptor};
pub use slide_game::{Block, SlideGame, SlideState};
