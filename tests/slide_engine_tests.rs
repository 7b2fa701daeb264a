//! Sliding-block engine tests through the facade crate.

use std::sync::Arc;

use geo_puzzle::core::{Block, EngineConfig, LevelCatalog, SlideGame, SlideLevel, SlideState};
use geo_puzzle::types::{
    BlockId, Direction, IgnoreReason, LevelOverflow, Outcome, RejectReason,
};

fn single_level(moves: u32, blocks: Vec<Block>) -> Arc<LevelCatalog> {
    Arc::new(LevelCatalog::new(vec![SlideLevel::new(6, moves, blocks)]).unwrap())
}

fn builtin() -> SlideGame {
    SlideGame::new(Arc::new(LevelCatalog::builtin()), EngineConfig::default())
}

#[test]
fn blocked_move_reports_blocker_and_keeps_budget() {
    let catalog = single_level(
        10,
        vec![Block::target(1, 2, 2, 2, 1), Block::new(2, 4, 1, 1, 2)],
    );
    let mut game = SlideGame::new(catalog, EngineConfig::default());
    game.select(BlockId(1));

    let before = game.state().clone();
    assert_eq!(
        game.move_selected(Direction::Right),
        Outcome::Rejected(RejectReason::Blocked { by: BlockId(2) })
    );
    assert_eq!(game.state(), &before);
}

#[test]
fn target_reaching_exit_completes_level() {
    let catalog = single_level(10, vec![Block::target(1, 2, 2, 2, 1)]);
    let mut game = SlideGame::new(catalog, EngineConfig::default());
    game.select(BlockId(1));

    assert_eq!(game.move_selected(Direction::Right), Outcome::Applied);
    let target = game.state().target_block().unwrap();
    assert_eq!((target.x, target.y), (3, 2));
    assert_eq!(game.moves_left(), 9);

    // 4 + 2 == 6: the right edge is reached.
    assert_eq!(
        game.move_selected(Direction::Right),
        Outcome::LevelComplete { level: 2 }
    );
    assert_eq!(game.level(), 2);
    assert_eq!(game.moves_left(), 10);
    assert_eq!(game.selection(), None);
    // One template only: level 2 wraps to the first layout.
    assert_eq!(game.state().target_block().map(|t| t.x), Some(2));
}

#[test]
fn last_move_spends_budget_then_everything_is_ignored() {
    let catalog = single_level(
        10,
        vec![Block::target(1, 1, 2, 2, 1), Block::new(2, 3, 2, 1, 1)],
    );
    let config = EngineConfig::default();
    let mut state = SlideState::from_template(1, &catalog.templates()[0]);
    state.moves_left = 1;
    state.selection = Some(BlockId(1));
    let mut game = SlideGame::from_state(catalog, config, state).unwrap();

    assert!(game.move_selected(Direction::Right).is_blocked());
    assert_eq!(game.moves_left(), 1);

    assert_eq!(game.move_selected(Direction::Left), Outcome::Applied);
    assert_eq!(game.moves_left(), 0);
    assert!(game.is_stalled());

    let frozen = game.state().clone();
    for direction in Direction::ALL {
        assert_eq!(
            game.move_selected(direction),
            Outcome::Ignored(IgnoreReason::NoMovesLeft)
        );
    }
    assert_eq!(game.state(), &frozen);
    assert!(game.movable_directions().is_empty());
}

#[test]
fn flush_block_moving_outward_hits_boundary() {
    let catalog = single_level(5, vec![Block::target(1, 0, 0, 2, 1)]);
    let mut game = SlideGame::new(catalog, EngineConfig::default());
    game.select(BlockId(1));

    assert_eq!(
        game.move_selected(Direction::Left),
        Outcome::Ignored(IgnoreReason::AtBoundary)
    );
    assert_eq!(
        game.move_selected(Direction::Up),
        Outcome::Ignored(IgnoreReason::AtBoundary)
    );
    assert_eq!(game.moves_left(), 5);
    assert!(!game.move_selected(Direction::Up).is_blocked());
}

#[test]
fn builtin_first_level_is_solvable() {
    let mut game = builtin();

    game.select(BlockId(1));
    assert_eq!(game.move_selected(Direction::Right), Outcome::Applied);
    assert_eq!(
        game.move_selected(Direction::Right),
        Outcome::Rejected(RejectReason::Blocked { by: BlockId(2) })
    );
    assert_eq!(game.moves_left(), 9);

    game.select(BlockId(2));
    assert_eq!(game.move_selected(Direction::Up), Outcome::Applied);

    game.select(BlockId(1));
    assert_eq!(game.move_selected(Direction::Right), Outcome::Applied);
    assert_eq!(game.move_selected(Direction::Right), Outcome::Applied);
    assert_eq!(
        game.move_selected(Direction::Right),
        Outcome::LevelComplete { level: 2 }
    );
    assert_eq!(game.moves_left(), 12);
    assert_eq!(game.blocks().len(), 4);
}

/// Play `route` from the start of `level`; every step but the last must apply.
fn play_route(level: u32, route: &[(u32, Direction)]) -> (SlideGame, Outcome) {
    let catalog = Arc::new(LevelCatalog::builtin());
    let mut game = SlideGame::at_level(catalog, EngineConfig::default(), level);
    let (last, steps) = route.split_last().unwrap();

    for &(id, direction) in steps {
        game.select(BlockId(id));
        assert_eq!(
            game.move_selected(direction),
            Outcome::Applied,
            "level {level}: block {id} {direction:?}"
        );
    }
    game.select(BlockId(last.0));
    let outcome = game.move_selected(last.1);
    (game, outcome)
}

#[test]
fn builtin_second_level_is_solvable() {
    use Direction::*;
    let route = [
        (2, Down),
        (2, Down),
        (2, Down),
        (4, Up),
        (1, Right),
        (1, Right),
        (1, Right),
    ];
    let (game, outcome) = play_route(2, &route);

    assert_eq!(outcome, Outcome::LevelComplete { level: 3 });
    assert_eq!(game.level(), 3);
    assert_eq!(game.moves_left(), 14);
    assert_eq!(game.blocks().len(), 5);
}

#[test]
fn builtin_third_level_is_solvable() {
    use Direction::*;
    let route = [
        (4, Right),
        (2, Up),
        (5, Down),
        (5, Down),
        (1, Right),
        (1, Right),
        (1, Right),
        (1, Right),
    ];
    let (game, outcome) = play_route(3, &route);

    assert_eq!(outcome, Outcome::LevelComplete { level: 4 });
    assert_eq!(game.level(), 4);
    assert_eq!(game.selection(), None);
}

#[test]
fn restored_state_must_be_a_legal_layout() {
    let catalog = Arc::new(LevelCatalog::builtin());
    let config = EngineConfig::default();
    let fresh = SlideState::from_template(1, &catalog.templates()[0]);

    let mut overlapping = fresh.clone();
    overlapping.blocks[0].x = 2;
    assert!(SlideGame::from_state(Arc::clone(&catalog), config, overlapping).is_err());

    let mut level_zero = fresh.clone();
    level_zero.level = 0;
    assert!(SlideGame::from_state(Arc::clone(&catalog), config, level_zero).is_err());

    let mut stray_selection = fresh.clone();
    stray_selection.selection = Some(BlockId(7));
    assert!(SlideGame::from_state(Arc::clone(&catalog), config, stray_selection).is_err());

    let game = SlideGame::from_state(catalog, config, fresh.clone()).unwrap();
    assert_eq!(game.state(), &fresh);
}

#[test]
fn restart_restores_template_and_clears_selection() {
    let mut game = builtin();
    let fresh = game.state().clone();

    game.select(BlockId(2));
    game.move_selected(Direction::Up);
    game.move_selected(Direction::Down);
    assert_eq!(game.moves_left(), 8);

    assert_eq!(game.restart(), Outcome::Applied);
    assert_eq!(game.state(), &fresh);
}

#[test]
fn overflow_policy_selects_fallback_template() {
    let catalog = Arc::new(LevelCatalog::builtin());
    let repeat = EngineConfig::default().with_level_overflow(LevelOverflow::RepeatLast);

    let game = SlideGame::at_level(Arc::clone(&catalog), repeat, 7);
    assert_eq!(game.level(), 7);
    assert_eq!(game.blocks(), catalog.templates()[2].blocks.as_slice());

    let game = SlideGame::at_level(Arc::clone(&catalog), EngineConfig::default(), 7);
    assert_eq!(game.blocks(), catalog.templates()[0].blocks.as_slice());
}

#[test]
fn unknown_selection_is_rejected() {
    let mut game = builtin();
    assert_eq!(
        game.select(BlockId(42)),
        Outcome::Rejected(RejectReason::InvalidSelection(BlockId(42)))
    );
    assert_eq!(game.selection(), None);
    assert_eq!(
        game.move_selected(Direction::Right),
        Outcome::Ignored(IgnoreReason::NoSelection)
    );
}
