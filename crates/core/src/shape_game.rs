//! Shape-transform engine
//!
//! A collection of pieces is transformed as a whole (rotate, expand,
//! duplicate) under a move budget. `check_match` compares the first piece
//! with the level's target descriptor and advances the level on success.

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::levels::ShapeLevel;
use crate::types::{
    ExpandPolicy, IgnoreReason, Outcome, PieceId, ShapeKind, ShapeSize, FULL_TURN_DEGREES,
    ROTATION_STEP_DEGREES,
};

/// A transformable piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub id: PieceId,
    pub kind: ShapeKind,
    pub size: ShapeSize,
    /// Accumulated rotation; equivalence is modulo 360
    pub rotation_degrees: i64,
}

impl Piece {
    /// Rotation normalized into `0..360`
    pub fn normalized_rotation(&self) -> i64 {
        self.rotation_degrees.rem_euclid(FULL_TURN_DEGREES)
    }
}

/// Win condition of a shape-transform level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetDescriptor {
    pub kind: ShapeKind,
    pub size: ShapeSize,
    pub rotation_degrees: i64,
}

impl TargetDescriptor {
    /// Same kind, same size, rotation congruent modulo 360
    pub fn matches(&self, piece: &Piece) -> bool {
        self.kind == piece.kind
            && self.size == piece.size
            && (self.rotation_degrees - piece.rotation_degrees).rem_euclid(FULL_TURN_DEGREES) == 0
    }
}

/// Complete shape-transform state for one level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ShapeState {
    pub level: u32,
    pub moves_left: u32,
    pub pieces: Vec<Piece>,
    pub target: TargetDescriptor,
}

/// Shape-transform engine driven by discrete commands
#[derive(Debug, Clone)]
pub struct ShapeGame {
    state: ShapeState,
    expand_policy: ExpandPolicy,
    /// Last id handed out; ids are never reused within an engine
    last_id: u64,
}

impl ShapeGame {
    /// Start at level 1
    pub fn new(config: EngineConfig) -> Self {
        Self::at_level(config, 1)
    }

    pub fn at_level(config: EngineConfig, level: u32) -> Self {
        let mut game = Self {
            state: ShapeState {
                level: 0,
                moves_left: 0,
                pieces: Vec::new(),
                target: ShapeLevel::generate(1).target,
            },
            expand_policy: config.expand_policy,
            last_id: 0,
        };
        game.load_level(level.max(1));
        game
    }

    pub fn state(&self) -> &ShapeState {
        &self.state
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn moves_left(&self) -> u32 {
        self.state.moves_left
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.state.pieces
    }

    pub fn target(&self) -> &TargetDescriptor {
        &self.state.target
    }

    pub fn is_stalled(&self) -> bool {
        self.state.moves_left == 0
    }

    pub fn rotate_left(&mut self) -> Outcome {
        self.rotate(-ROTATION_STEP_DEGREES)
    }

    pub fn rotate_right(&mut self) -> Outcome {
        self.rotate(ROTATION_STEP_DEGREES)
    }

    /// Grow every piece one size step
    ///
    /// Under `ExpandPolicy::AlwaysSpend` a move is spent even when every
    /// piece is already large.
    pub fn expand(&mut self) -> Outcome {
        if self.state.moves_left == 0 {
            return Outcome::Ignored(IgnoreReason::NoMovesLeft);
        }
        let at_ceiling = self.state.pieces.iter().all(|p| p.size.grow().is_none());
        if at_ceiling && self.expand_policy == ExpandPolicy::SkipAtCeiling {
            return Outcome::Ignored(IgnoreReason::AtCeiling);
        }

        let mut next = self.state.clone();
        for piece in &mut next.pieces {
            piece.size = piece.size.grow_saturating();
        }
        self.commit(next, "expand")
    }

    /// Append a copy of the last piece under a fresh id
    pub fn duplicate(&mut self) -> Outcome {
        if self.state.moves_left == 0 {
            return Outcome::Ignored(IgnoreReason::NoMovesLeft);
        }
        let Some(last) = self.state.pieces.last().copied() else {
            return Outcome::Ignored(IgnoreReason::NothingToDuplicate);
        };

        let mut next = self.state.clone();
        next.pieces.push(Piece {
            id: self.mint_id(),
            ..last
        });
        self.commit(next, "duplicate")
    }

    /// Whether the first piece matches the target
    ///
    /// On a match the next level is generated and the budget reset. The
    /// check itself never spends a move.
    pub fn check_match(&mut self) -> bool {
        let matched = self
            .state
            .pieces
            .first()
            .is_some_and(|p| self.state.target.matches(p));
        if matched {
            let next = self.state.level.saturating_add(1);
            info!(level = self.state.level, next, "shape level complete");
            self.load_level(next);
        }
        matched
    }

    /// Regenerate the current level
    pub fn restart(&mut self) -> Outcome {
        self.load_level(self.state.level);
        Outcome::Applied
    }

    fn rotate(&mut self, delta: i64) -> Outcome {
        if self.state.moves_left == 0 {
            return Outcome::Ignored(IgnoreReason::NoMovesLeft);
        }
        let mut next = self.state.clone();
        for piece in &mut next.pieces {
            piece.rotation_degrees += delta;
        }
        self.commit(next, "rotate")
    }

    fn commit(&mut self, mut next: ShapeState, command: &'static str) -> Outcome {
        next.moves_left -= 1;
        self.state = next;
        debug!(command, moves_left = self.state.moves_left, "shape command applied");
        Outcome::Applied
    }

    fn mint_id(&mut self) -> PieceId {
        self.last_id += 1;
        PieceId(self.last_id)
    }

    fn load_level(&mut self, level: u32) {
        let layout = ShapeLevel::generate(level);
        let piece = Piece {
            id: self.mint_id(),
            kind: layout.start_kind,
            size: layout.start_size,
            rotation_degrees: layout.start_rotation,
        };
        self.state = ShapeState {
            level: layout.level,
            moves_left: layout.move_budget,
            pieces: vec![piece],
            target: layout.target,
        };
    }
}

impl Default for ShapeGame {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_shape_game() {
        let game = ShapeGame::default();
        assert_eq!(game.level(), 1);
        assert_eq!(game.moves_left(), 5);
        assert_eq!(game.pieces().len(), 1);
        let piece = game.pieces()[0];
        assert_eq!(piece.kind, ShapeKind::Triangle);
        assert_eq!(piece.size, ShapeSize::Medium);
        assert_eq!(piece.rotation_degrees, 0);
        assert_eq!(game.target().rotation_degrees, 90);
    }

    #[test]
    fn test_target_match_is_modular() {
        let target = TargetDescriptor {
            kind: ShapeKind::Square,
            size: ShapeSize::Small,
            rotation_degrees: -90,
        };
        let piece = Piece {
            id: PieceId(1),
            kind: ShapeKind::Square,
            size: ShapeSize::Small,
            rotation_degrees: 270,
        };
        assert!(target.matches(&piece));
        assert!(!target.matches(&Piece {
            rotation_degrees: 180,
            ..piece
        }));
        assert!(!target.matches(&Piece {
            size: ShapeSize::Medium,
            ..piece
        }));
        assert_eq!(Piece { rotation_degrees: -450, ..piece }.normalized_rotation(), 270);
    }

    #[test]
    fn test_commands_ignored_without_moves() {
        let mut game = ShapeGame::default();
        for _ in 0..5 {
            assert_eq!(game.rotate_right(), Outcome::Applied);
        }
        let before = game.state().clone();
        assert_eq!(game.rotate_left(), Outcome::Ignored(IgnoreReason::NoMovesLeft));
        assert_eq!(game.expand(), Outcome::Ignored(IgnoreReason::NoMovesLeft));
        assert_eq!(game.duplicate(), Outcome::Ignored(IgnoreReason::NoMovesLeft));
        assert_eq!(game.state(), &before);
    }

    #[test]
    fn test_duplicate_ids_survive_level_change() {
        let mut game = ShapeGame::default();
        let first = game.pieces()[0].id;
        game.expand();
        game.rotate_right();
        assert!(game.check_match());
        assert_eq!(game.level(), 2);
        assert_ne!(game.pieces()[0].id, first);
    }
}
