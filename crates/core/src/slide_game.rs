//! Sliding-block engine
//!
//! Holds axis-aligned blocks on a square grid, validates one-cell moves
//! against the grid bounds and every other block, and advances to the next
//! catalog level once the target block reaches the exit (right edge).
//!
//! There is a single state: every command validates and commits atomically.
//! The current [`SlideState`] is a value that is replaced on each committed
//! command, so callers may keep older values for replay or comparison.

use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::geometry::Rect;
use crate::levels::{validate_layout, CatalogError, LevelCatalog, SlideLevel};
use crate::types::{BlockId, Direction, IgnoreReason, LevelOverflow, Outcome, RejectReason};

/// A rectangular block on the sliding grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Block {
    pub id: BlockId,
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub is_target: bool,
}

impl Block {
    /// Create an ordinary block
    pub const fn new(id: u32, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id: BlockId(id),
            x,
            y,
            width,
            height,
            is_target: false,
        }
    }

    /// Create the block that must reach the exit
    pub const fn target(id: u32, x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            id: BlockId(id),
            x,
            y,
            width,
            height,
            is_target: true,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Complete sliding-block state for one level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlideState {
    pub level: u32,
    pub grid_size: i32,
    pub moves_left: u32,
    pub blocks: Vec<Block>,
    /// Routing key for move commands; not ownership
    pub selection: Option<BlockId>,
}

impl SlideState {
    /// Fresh state for `level` from its template
    pub fn from_template(level: u32, template: &SlideLevel) -> Self {
        Self {
            level,
            grid_size: template.grid_size as i32,
            moves_left: template.move_budget,
            blocks: template.blocks.clone(),
            selection: None,
        }
    }

    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.blocks.iter().find(|b| b.id == id)
    }

    pub fn target_block(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_target)
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selection.and_then(|id| self.block(id))
    }

    /// Block covering the cell `(x, y)`, if any
    pub fn block_at(&self, x: i32, y: i32) -> Option<&Block> {
        self.blocks.iter().find(|b| b.rect().contains(x, y))
    }

    /// Whether the target block reaches the exit
    pub fn is_won(&self) -> bool {
        self.target_block()
            .is_some_and(|t| t.rect().reaches_exit(self.grid_size))
    }

    /// Outcome of shifting block `id` one cell, without committing
    ///
    /// `Ok` carries the shifted block.
    fn try_slide(&self, id: BlockId, direction: Direction) -> Result<Block, Outcome> {
        let Some(block) = self.block(id) else {
            return Err(Outcome::Ignored(IgnoreReason::NoSelection));
        };

        let (dx, dy) = direction.delta();
        let candidate = block.rect().translated(dx, dy);
        if !candidate.fits_in_grid(self.grid_size) {
            return Err(Outcome::Ignored(IgnoreReason::AtBoundary));
        }

        if let Some(other) = self
            .blocks
            .iter()
            .find(|other| other.id != id && other.rect().overlaps(&candidate))
        {
            return Err(Outcome::Rejected(RejectReason::Blocked { by: other.id }));
        }

        Ok(Block {
            x: candidate.x,
            y: candidate.y,
            ..*block
        })
    }

    /// Copy of this state with `moved` committed and one move spent
    fn with_committed(&self, moved: Block) -> Self {
        let mut next = self.clone();
        if let Some(slot) = next.blocks.iter_mut().find(|b| b.id == moved.id) {
            *slot = moved;
        }
        next.moves_left -= 1;
        next
    }
}

/// Sliding-block engine driven by discrete commands
#[derive(Debug, Clone)]
pub struct SlideGame {
    catalog: Arc<LevelCatalog>,
    overflow: LevelOverflow,
    state: SlideState,
}

impl SlideGame {
    /// Start at level 1
    pub fn new(catalog: Arc<LevelCatalog>, config: EngineConfig) -> Self {
        Self::at_level(catalog, config, 1)
    }

    /// Start at an arbitrary level (clamped to at least 1)
    pub fn at_level(catalog: Arc<LevelCatalog>, config: EngineConfig, level: u32) -> Self {
        let level = level.max(1);
        let state =
            SlideState::from_template(level, catalog.template_for(level, config.level_overflow));
        Self {
            catalog,
            overflow: config.level_overflow,
            state,
        }
    }

    /// Start from a caller-built state (puzzle setups and tests)
    ///
    /// The state must satisfy the same layout rules as a catalog template
    /// and name an existing block as its selection. A zero budget is
    /// allowed. The state's level still selects the template used by
    /// `restart` and by the level that follows a win.
    pub fn from_state(
        catalog: Arc<LevelCatalog>,
        config: EngineConfig,
        state: SlideState,
    ) -> Result<Self, CatalogError> {
        if state.level == 0 {
            return Err(CatalogError::ZeroLevel);
        }
        validate_layout(state.level, state.grid_size, &state.blocks)?;
        if let Some(id) = state.selection {
            if state.block(id).is_none() {
                return Err(CatalogError::UnknownSelection {
                    level: state.level,
                    id,
                });
            }
        }

        Ok(Self {
            catalog,
            overflow: config.level_overflow,
            state,
        })
    }

    pub fn state(&self) -> &SlideState {
        &self.state
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn level(&self) -> u32 {
        self.state.level
    }

    pub fn moves_left(&self) -> u32 {
        self.state.moves_left
    }

    pub fn grid_size(&self) -> i32 {
        self.state.grid_size
    }

    pub fn blocks(&self) -> &[Block] {
        &self.state.blocks
    }

    pub fn selection(&self) -> Option<BlockId> {
        self.state.selection
    }

    /// Whether the move budget is exhausted
    pub fn is_stalled(&self) -> bool {
        self.state.moves_left == 0
    }

    /// Route subsequent moves to `id`
    ///
    /// Unknown ids are rejected and leave the current selection in place.
    /// Selecting never spends a move.
    pub fn select(&mut self, id: BlockId) -> Outcome {
        if self.state.block(id).is_none() {
            debug!(block = %id, "select rejected: unknown block");
            return Outcome::Rejected(RejectReason::InvalidSelection(id));
        }
        self.state.selection = Some(id);
        Outcome::Applied
    }

    pub fn clear_selection(&mut self) {
        self.state.selection = None;
    }

    /// Shift the selected block one cell in `direction`
    ///
    /// Only a committed shift spends a move. A shift past the grid edge is
    /// ignored, a shift into another block is rejected as blocked. When the
    /// committed shift brings the target block to the exit, the next level
    /// is loaded and `LevelComplete` is returned.
    pub fn move_selected(&mut self, direction: Direction) -> Outcome {
        if self.state.moves_left == 0 {
            return Outcome::Ignored(IgnoreReason::NoMovesLeft);
        }
        let Some(id) = self.state.selection else {
            return Outcome::Ignored(IgnoreReason::NoSelection);
        };

        let moved = match self.state.try_slide(id, direction) {
            Ok(moved) => moved,
            Err(outcome) => {
                debug!(block = %id, direction = direction.as_str(), ?outcome, "move not committed");
                return outcome;
            }
        };

        self.state = self.state.with_committed(moved);
        debug!(
            block = %id,
            direction = direction.as_str(),
            x = moved.x,
            y = moved.y,
            moves_left = self.state.moves_left,
            "move committed"
        );

        if self.state.is_won() {
            let next = self.state.level.saturating_add(1);
            info!(level = self.state.level, next, "sliding level complete");
            self.load_level(next);
            return Outcome::LevelComplete { level: next };
        }

        Outcome::Applied
    }

    /// Reload the current level's template and clear the selection
    pub fn restart(&mut self) -> Outcome {
        self.load_level(self.state.level);
        Outcome::Applied
    }

    /// Directions in which the selected block could commit a move now
    pub fn movable_directions(&self) -> ArrayVec<Direction, 4> {
        let mut out = ArrayVec::new();
        if self.state.moves_left == 0 {
            return out;
        }
        let Some(id) = self.state.selection else {
            return out;
        };
        for direction in Direction::ALL {
            if self.state.try_slide(id, direction).is_ok() {
                out.push(direction);
            }
        }
        out
    }

    fn load_level(&mut self, level: u32) {
        let template = self.catalog.template_for(level, self.overflow);
        self.state = SlideState::from_template(level, template);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game_with(blocks: Vec<Block>, moves: u32) -> SlideGame {
        let catalog = Arc::new(LevelCatalog::new(vec![SlideLevel::new(6, moves, blocks)]).unwrap());
        SlideGame::new(catalog, EngineConfig::default())
    }

    #[test]
    fn test_new_game_starts_at_level_one() {
        let game = SlideGame::new(Arc::new(LevelCatalog::builtin()), EngineConfig::default());
        assert_eq!(game.level(), 1);
        assert_eq!(game.moves_left(), 10);
        assert_eq!(game.grid_size(), 6);
        assert!(game.selection().is_none());
        assert!(game.state().target_block().is_some());
    }

    #[test]
    fn test_select_known_and_unknown() {
        let mut game = game_with(vec![Block::target(1, 0, 0, 2, 1)], 3);
        assert_eq!(game.select(BlockId(1)), Outcome::Applied);
        assert_eq!(game.selection(), Some(BlockId(1)));

        assert_eq!(
            game.select(BlockId(9)),
            Outcome::Rejected(RejectReason::InvalidSelection(BlockId(9)))
        );
        assert_eq!(game.selection(), Some(BlockId(1)));
        assert_eq!(game.moves_left(), 3);
    }

    #[test]
    fn test_move_without_selection_is_ignored() {
        let mut game = game_with(vec![Block::target(1, 0, 0, 2, 1)], 3);
        assert_eq!(
            game.move_selected(Direction::Right),
            Outcome::Ignored(IgnoreReason::NoSelection)
        );
        assert_eq!(game.moves_left(), 3);
    }

    #[test]
    fn test_try_slide_reports_blocker() {
        let game = game_with(
            vec![Block::target(1, 2, 2, 2, 1), Block::new(2, 4, 1, 1, 2)],
            3,
        );
        assert_eq!(
            game.state().try_slide(BlockId(1), Direction::Right),
            Err(Outcome::Rejected(RejectReason::Blocked { by: BlockId(2) }))
        );
        let moved = game.state().try_slide(BlockId(1), Direction::Left).unwrap();
        assert_eq!((moved.x, moved.y), (1, 2));
    }

    #[test]
    fn test_movable_directions() {
        let mut game = game_with(
            vec![Block::target(1, 0, 0, 2, 1), Block::new(2, 0, 1, 1, 1)],
            3,
        );
        assert!(game.movable_directions().is_empty());

        game.select(BlockId(1));
        let dirs = game.movable_directions();
        assert_eq!(dirs.as_slice(), &[Direction::Right]);
    }

    #[test]
    fn test_block_at() {
        let game = game_with(vec![Block::target(1, 1, 2, 2, 1)], 3);
        assert_eq!(game.state().block_at(2, 2).map(|b| b.id), Some(BlockId(1)));
        assert!(game.state().block_at(3, 2).is_none());
    }

    #[test]
    fn test_from_state_checks_layout() {
        let catalog = Arc::new(LevelCatalog::builtin());
        let config = EngineConfig::default();
        let fresh = SlideState::from_template(1, &catalog.templates()[0]);

        let mut exhausted = fresh.clone();
        exhausted.moves_left = 0;
        exhausted.selection = Some(BlockId(3));
        let game = SlideGame::from_state(Arc::clone(&catalog), config, exhausted).unwrap();
        assert!(game.is_stalled());

        let mut overlapping = fresh.clone();
        overlapping.blocks[1].x = 1;
        assert_eq!(
            SlideGame::from_state(Arc::clone(&catalog), config, overlapping).unwrap_err(),
            CatalogError::Overlap {
                level: 1,
                first: BlockId(1),
                second: BlockId(2)
            }
        );

        let mut outside = fresh.clone();
        outside.blocks[2].y = 4;
        assert!(matches!(
            SlideGame::from_state(Arc::clone(&catalog), config, outside),
            Err(CatalogError::OutOfBounds { id: BlockId(3), grid_size: 6, .. })
        ));

        let mut no_target = fresh.clone();
        no_target.blocks.remove(0);
        assert!(matches!(
            SlideGame::from_state(Arc::clone(&catalog), config, no_target),
            Err(CatalogError::TargetCount { count: 0, .. })
        ));

        let mut level_zero = fresh.clone();
        level_zero.level = 0;
        assert_eq!(
            SlideGame::from_state(Arc::clone(&catalog), config, level_zero).unwrap_err(),
            CatalogError::ZeroLevel
        );

        let mut stray_selection = fresh;
        stray_selection.selection = Some(BlockId(9));
        assert_eq!(
            SlideGame::from_state(catalog, config, stray_selection).unwrap_err(),
            CatalogError::UnknownSelection {
                level: 1,
                id: BlockId(9)
            }
        );
    }
}
