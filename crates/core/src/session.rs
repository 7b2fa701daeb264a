//! Session - one shape engine, one sliding engine, and the active variant
//!
//! A session is the command surface consumed by presentation layers and
//! the network adapter. It owns both engines exclusively; callers serialize
//! their commands by holding `&mut Session`.

use std::sync::Arc;

use tracing::debug;

use crate::config::EngineConfig;
use crate::levels::LevelCatalog;
use crate::shape_game::ShapeGame;
use crate::slide_game::SlideGame;
use crate::types::{GameCommand, Outcome, RejectReason, Variant};

#[derive(Debug, Clone)]
pub struct Session {
    shape: ShapeGame,
    slide: SlideGame,
    active: Variant,
}

impl Session {
    pub fn new(catalog: Arc<LevelCatalog>, config: EngineConfig) -> Self {
        Self {
            shape: ShapeGame::new(config),
            slide: SlideGame::new(catalog, config),
            active: Variant::default(),
        }
    }

    /// Session over the built-in catalog with default policies
    pub fn builtin() -> Self {
        Self::new(Arc::new(LevelCatalog::builtin()), EngineConfig::default())
    }

    pub fn with_active(mut self, active: Variant) -> Self {
        self.active = active;
        self
    }

    pub fn active(&self) -> Variant {
        self.active
    }

    pub fn set_active(&mut self, variant: Variant) {
        self.active = variant;
    }

    pub fn toggle_active(&mut self) -> Variant {
        self.active = self.active.toggled();
        self.active
    }

    pub fn shape(&self) -> &ShapeGame {
        &self.shape
    }

    pub fn slide(&self) -> &SlideGame {
        &self.slide
    }

    pub fn shape_mut(&mut self) -> &mut ShapeGame {
        &mut self.shape
    }

    pub fn slide_mut(&mut self) -> &mut SlideGame {
        &mut self.slide
    }

    /// Moves left in the active variant
    pub fn moves_left(&self) -> u32 {
        match self.active {
            Variant::Shape => self.shape.moves_left(),
            Variant::Slide => self.slide.moves_left(),
        }
    }

    /// Level of the active variant
    pub fn level(&self) -> u32 {
        match self.active {
            Variant::Shape => self.shape.level(),
            Variant::Slide => self.slide.level(),
        }
    }

    /// Apply a command to the engine it belongs to
    ///
    /// `CheckMatch` reports `LevelComplete` on a match and
    /// `Rejected(NoMatch)` otherwise. `Restart` targets the active variant.
    pub fn apply(&mut self, command: GameCommand) -> Outcome {
        let outcome = match command {
            GameCommand::RotateLeft => self.shape.rotate_left(),
            GameCommand::RotateRight => self.shape.rotate_right(),
            GameCommand::Expand => self.shape.expand(),
            GameCommand::Duplicate => self.shape.duplicate(),
            GameCommand::CheckMatch => {
                if self.shape.check_match() {
                    Outcome::LevelComplete {
                        level: self.shape.level(),
                    }
                } else {
                    Outcome::Rejected(RejectReason::NoMatch)
                }
            }
            GameCommand::Select(id) => self.slide.select(id),
            GameCommand::Move(direction) => self.slide.move_selected(direction),
            GameCommand::Restart => match self.active {
                Variant::Shape => self.shape.restart(),
                Variant::Slide => self.slide.restart(),
            },
        };
        debug!(command = command.as_str(), outcome = outcome.as_str(), "session command");
        outcome
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BlockId, Direction, IgnoreReason};

    #[test]
    fn test_commands_route_by_kind() {
        let mut session = Session::builtin();
        assert_eq!(session.active(), Variant::Slide);

        assert_eq!(session.apply(GameCommand::RotateRight), Outcome::Applied);
        assert_eq!(session.shape().moves_left(), 4);
        assert_eq!(session.slide().moves_left(), 10);

        assert_eq!(session.apply(GameCommand::Select(BlockId(1))), Outcome::Applied);
        assert_eq!(session.apply(GameCommand::Move(Direction::Right)), Outcome::Applied);
        assert_eq!(session.slide().moves_left(), 9);
        assert_eq!(session.shape().moves_left(), 4);
    }

    #[test]
    fn test_restart_targets_active_variant() {
        let mut session = Session::builtin();
        session.apply(GameCommand::Expand);
        session.apply(GameCommand::Select(BlockId(1)));
        session.apply(GameCommand::Move(Direction::Right));

        session.apply(GameCommand::Restart);
        assert_eq!(session.slide().moves_left(), 10);
        assert_eq!(session.shape().moves_left(), 4);

        assert_eq!(session.toggle_active(), Variant::Shape);
        session.apply(GameCommand::Restart);
        assert_eq!(session.shape().moves_left(), 5);
        assert_eq!(session.moves_left(), 5);
    }

    #[test]
    fn test_check_match_outcomes() {
        let mut session = Session::builtin().with_active(Variant::Shape);
        assert_eq!(
            session.apply(GameCommand::CheckMatch),
            Outcome::Rejected(RejectReason::NoMatch)
        );
        session.apply(GameCommand::Expand);
        session.apply(GameCommand::RotateRight);
        assert_eq!(
            session.apply(GameCommand::CheckMatch),
            Outcome::LevelComplete { level: 2 }
        );
        assert_eq!(session.level(), 2);
    }

    #[test]
    fn test_move_without_selection() {
        let mut session = Session::builtin();
        assert_eq!(
            session.apply(GameCommand::Move(Direction::Up)),
            Outcome::Ignored(IgnoreReason::NoSelection)
        );
    }

    #[test]
    fn test_applied_commands_spend_only_when_they_should() {
        let mut session = Session::builtin();
        let script = [
            GameCommand::Restart,
            GameCommand::Select(BlockId(2)),
            GameCommand::Move(Direction::Up),
            GameCommand::Select(BlockId(1)),
            GameCommand::RotateLeft,
            GameCommand::Expand,
            GameCommand::Duplicate,
        ];
        for command in script {
            let before = session.shape().moves_left() + session.slide().moves_left();
            assert_eq!(session.apply(command), Outcome::Applied, "{}", command.as_str());
            let after = session.shape().moves_left() + session.slide().moves_left();
            assert_eq!(before - after, u32::from(command.spends_move()), "{}", command.as_str());
        }
    }
}
