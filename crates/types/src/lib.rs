//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are pure data structures with no external dependencies, making them
//! usable in any context (engine logic, terminal rendering, network protocol).
//!
//! # Grid Coordinates
//!
//! The sliding-block grid is square. `(x, y)` is the top-left corner of a
//! block, x grows to the right and y grows downward. The exit is the right
//! edge of the grid: the target block wins once `x + width >= grid_size`.
//!
//! # Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_GRID_SIZE` | 6 | Grid size of the built-in sliding levels |
//! | `SHAPE_MOVE_BUDGET` | 5 | Moves granted per shape-transform level |
//! | `ROTATION_STEP_DEGREES` | 90 | One rotate command |
//! | `FULL_TURN_DEGREES` | 360 | Rotations are compared modulo this |
//!
//! # Examples
//!
//! ```
//! use geo_puzzle_types::{Direction, GameCommand, ShapeSize};
//!
//! assert_eq!(Direction::from_str("LEFT"), Some(Direction::Left));
//! assert_eq!(Direction::Up.delta(), (0, -1));
//!
//! assert_eq!(ShapeSize::Small.grow(), Some(ShapeSize::Medium));
//! assert_eq!(ShapeSize::Large.grow(), None);
//!
//! assert_eq!(GameCommand::from_str("rotateLeft"), Some(GameCommand::RotateLeft));
//! ```

use std::fmt;

/// Grid size used by the built-in sliding-block levels
pub const DEFAULT_GRID_SIZE: u8 = 6;

/// Moves granted at the start of every shape-transform level
pub const SHAPE_MOVE_BUDGET: u32 = 5;

/// Degrees applied by a single rotate command
pub const ROTATION_STEP_DEGREES: i64 = 90;

/// Rotations are equivalent modulo a full turn
pub const FULL_TURN_DEGREES: i64 = 360;


/// Identifier of a block on the sliding grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub u32);

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identifier of a shape-transform piece
///
/// Minted by the owning engine from a monotonic counter, so ids stay unique
/// even across level transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub u64);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The three geometric piece kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Triangle,
    Square,
    Circle,
}

impl ShapeKind {
    /// Level generation cycles through kinds in this order
    pub const ALL: [ShapeKind; 3] = [ShapeKind::Triangle, ShapeKind::Square, ShapeKind::Circle];

    /// Parse kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use geo_puzzle_types::ShapeKind;
    ///
    /// assert_eq!(ShapeKind::from_str("Triangle"), Some(ShapeKind::Triangle));
    /// assert_eq!(ShapeKind::from_str("hexagon"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "triangle" => Some(ShapeKind::Triangle),
            "square" => Some(ShapeKind::Square),
            "circle" => Some(ShapeKind::Circle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeKind::Triangle => "triangle",
            ShapeKind::Square => "square",
            ShapeKind::Circle => "circle",
        }
    }
}

/// Piece sizes, ordered small < medium < large
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShapeSize {
    Small,
    Medium,
    Large,
}

impl ShapeSize {
    /// Next size up, or `None` at the ceiling
    pub fn grow(&self) -> Option<Self> {
        match self {
            ShapeSize::Small => Some(ShapeSize::Medium),
            ShapeSize::Medium => Some(ShapeSize::Large),
            ShapeSize::Large => None,
        }
    }

    /// Next size up, staying at `Large` once reached
    pub fn grow_saturating(&self) -> Self {
        self.grow().unwrap_or(*self)
    }

    /// Parse size from string
    ///
    /// Accepts full names or the short forms used by the UI:
    /// "small" | "sm", "medium" | "md", "large" | "lg"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "small" | "sm" => Some(ShapeSize::Small),
            "medium" | "md" => Some(ShapeSize::Medium),
            "large" | "lg" => Some(ShapeSize::Large),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShapeSize::Small => "small",
            ShapeSize::Medium => "medium",
            ShapeSize::Large => "large",
        }
    }
}

/// One-cell shift directions on the sliding grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    /// Grid offset `(dx, dy)` of a single step (y grows downward)
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
        }
    }

    /// Parse direction from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "left" | "l" => Some(Direction::Left),
            "right" | "r" => Some(Direction::Right),
            "up" | "u" => Some(Direction::Up),
            "down" | "d" => Some(Direction::Down),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

/// The two game variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    Shape,
    #[default]
    Slide,
}

impl Variant {
    pub fn toggled(&self) -> Self {
        match self {
            Variant::Shape => Variant::Slide,
            Variant::Slide => Variant::Shape,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "shape" => Some(Variant::Shape),
            "slide" => Some(Variant::Slide),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Shape => "shape",
            Variant::Slide => "slide",
        }
    }
}

/// Commands accepted by a game session
///
/// Shape commands route to the shape-transform engine, `Select`/`Move` to the
/// sliding-block engine, and `Restart` to whichever variant is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Rotate every piece by -90°
    RotateLeft,
    /// Rotate every piece by +90°
    RotateRight,
    /// Grow every piece one size step
    Expand,
    /// Append a copy of the last piece
    Duplicate,
    /// Compare the first piece against the target
    CheckMatch,
    /// Route subsequent moves to a block
    Select(BlockId),
    /// Shift the selected block one cell
    Move(Direction),
    /// Reload the active variant's current level
    Restart,
}

impl GameCommand {
    /// Parse a payload-free command from its camelCase name
    ///
    /// `Select` and `Move` carry data and are never produced here.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "rotateleft" => Some(GameCommand::RotateLeft),
            "rotateright" => Some(GameCommand::RotateRight),
            "expand" => Some(GameCommand::Expand),
            "duplicate" => Some(GameCommand::Duplicate),
            "checkmatch" => Some(GameCommand::CheckMatch),
            "restart" => Some(GameCommand::Restart),
            _ => None,
        }
    }

    /// Whether an `Applied` outcome of this command spent one move
    ///
    /// `Select`, `CheckMatch` and `Restart` never touch the budget.
    pub fn spends_move(&self) -> bool {
        matches!(
            self,
            GameCommand::RotateLeft
                | GameCommand::RotateRight
                | GameCommand::Expand
                | GameCommand::Duplicate
                | GameCommand::Move(_)
        )
    }

    /// camelCase name for logs and the wire protocol
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::RotateLeft => "rotateLeft",
            GameCommand::RotateRight => "rotateRight",
            GameCommand::Expand => "expand",
            GameCommand::Duplicate => "duplicate",
            GameCommand::CheckMatch => "checkMatch",
            GameCommand::Select(_) => "select",
            GameCommand::Move(_) => "move",
            GameCommand::Restart => "restart",
        }
    }
}

/// Result of a command, shared by both variants
///
/// - **Applied**: state changed; commands that spend moves spent exactly one
/// - **LevelComplete**: a committed command finished the level; `level` is the new level
/// - **Rejected**: the command was refused for a reason the player should see
/// - **Ignored**: the command was a no-op; nothing changed and no move was spent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Applied,
    LevelComplete { level: u32 },
    Rejected(RejectReason),
    Ignored(IgnoreReason),
}

impl Outcome {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Outcome::Rejected(RejectReason::Blocked { .. }))
    }

    pub fn is_level_complete(&self) -> bool {
        matches!(self, Outcome::LevelComplete { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Applied => "applied",
            Outcome::LevelComplete { .. } => "levelComplete",
            Outcome::Rejected(_) => "rejected",
            Outcome::Ignored(_) => "ignored",
        }
    }
}

/// Why a command was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// The shifted block would overlap another block
    Blocked { by: BlockId },
    /// No block with this id exists in the current level
    InvalidSelection(BlockId),
    /// The first piece does not match the target
    NoMatch,
}

impl RejectReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Blocked { .. } => "blocked",
            RejectReason::InvalidSelection(_) => "invalidSelection",
            RejectReason::NoMatch => "noMatch",
        }
    }
}

/// Why a command was a silent no-op
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IgnoreReason {
    NoMovesLeft,
    NoSelection,
    /// The selected block is flush against the grid edge in that direction
    AtBoundary,
    /// Every piece is already large (only under `ExpandPolicy::SkipAtCeiling`)
    AtCeiling,
    NothingToDuplicate,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            IgnoreReason::NoMovesLeft => "noMovesLeft",
            IgnoreReason::NoSelection => "noSelection",
            IgnoreReason::AtBoundary => "atBoundary",
            IgnoreReason::AtCeiling => "atCeiling",
            IgnoreReason::NothingToDuplicate => "nothingToDuplicate",
        }
    }
}

/// What `expand` does when every piece is already large
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ExpandPolicy {
    /// Spend a move anyway
    #[default]
    AlwaysSpend,
    /// Ignore the command and keep the move
    SkipAtCeiling,
}

impl ExpandPolicy {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "spend" | "always" => Some(ExpandPolicy::AlwaysSpend),
            "skip" => Some(ExpandPolicy::SkipAtCeiling),
            _ => None,
        }
    }
}

/// Which template a level past the end of the catalog uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LevelOverflow {
    /// Fall back to the first template
    #[default]
    WrapToFirst,
    /// Keep replaying the last template
    RepeatLast,
}

impl LevelOverflow {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "first" | "wrap" => Some(LevelOverflow::WrapToFirst),
            "last" | "repeat" => Some(LevelOverflow::RepeatLast),
            _ => None,
        }
    }
}
