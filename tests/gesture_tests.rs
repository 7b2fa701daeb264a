//! Drag gestures feeding the sliding engine.

use proptest::prelude::*;

use geo_puzzle::core::Session;
use geo_puzzle::input::{resolve_direction, DragTracker};
use geo_puzzle::types::{BlockId, Direction, GameCommand, Outcome, RejectReason};

#[test]
fn drag_moves_selected_block_until_blocked() {
    let mut session = Session::builtin();
    session.apply(GameCommand::Select(BlockId(1)));

    let mut drag = DragTracker::new(40.0);
    drag.begin(10.0, 100.0);

    let mut outcomes = Vec::new();
    for x in [30.0, 50.0, 70.0, 90.0, 110.0] {
        if let Some(direction) = drag.update(x, 104.0) {
            outcomes.push(session.apply(GameCommand::Move(direction)));
        }
    }
    drag.end();

    // 10 -> 50 -> 90: two whole cells, the second runs into post 2.
    assert_eq!(
        outcomes,
        vec![
            Outcome::Applied,
            Outcome::Rejected(RejectReason::Blocked { by: BlockId(2) })
        ]
    );
    let target = session.slide().state().target_block().unwrap();
    assert_eq!((target.x, target.y), (1, 2));
    assert_eq!(session.moves_left(), 9);
}

#[test]
fn ended_drag_ignores_pointer() {
    let mut drag = DragTracker::new(1.0);
    assert_eq!(drag.update(5.0, 0.0), None);

    drag.begin(0.0, 0.0);
    assert!(drag.is_active());
    drag.end();
    assert!(!drag.is_active());
    assert_eq!(drag.update(5.0, 0.0), None);
}

#[test]
fn vertical_drag_moves_post() {
    let mut session = Session::builtin();
    session.apply(GameCommand::Select(BlockId(2)));

    let mut drag = DragTracker::new(1.0);
    drag.begin(3.5, 1.5);
    let direction = drag.update(3.5, 3.0).unwrap();
    assert_eq!(direction, Direction::Down);

    assert_eq!(session.apply(GameCommand::Move(direction)), Outcome::Applied);
}

proptest! {
    #[test]
    fn resolved_direction_follows_dominant_axis(
        dx in -200.0f32..200.0,
        dy in -200.0f32..200.0,
        cell in 1.0f32..50.0,
    ) {
        match resolve_direction(dx, dy, cell) {
            Some(Direction::Left) => {
                prop_assert!(dx <= -cell && dx.abs() > dy.abs());
            }
            Some(Direction::Right) => {
                prop_assert!(dx >= cell && dx.abs() > dy.abs());
            }
            Some(Direction::Up) => {
                prop_assert!(dy <= -cell && dy.abs() >= dx.abs());
            }
            Some(Direction::Down) => {
                prop_assert!(dy >= cell && dy.abs() >= dx.abs());
            }
            None => {
                prop_assert!(dx.abs().max(dy.abs()) < cell);
            }
        }
    }
}
