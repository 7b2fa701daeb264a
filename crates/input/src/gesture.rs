//! Drag gestures resolved into one-cell directions.
//!
//! Pointer positions are measured in the same unit as `cell_size` (board
//! cells for the terminal front-end, pixels for a pointer-driven one).

use crate::types::Direction;

/// Resolve a pointer displacement into a direction.
///
/// The axis with the larger magnitude wins, ties go to the vertical axis.
/// Returns `None` until the dominant magnitude reaches one `cell_size`, and
/// for a non-positive or non-finite `cell_size`.
///
/// # Examples
///
/// ```
/// use geo_puzzle_input::resolve_direction;
/// use geo_puzzle_types::Direction;
///
/// assert_eq!(resolve_direction(30.0, 4.0, 20.0), Some(Direction::Right));
/// assert_eq!(resolve_direction(-5.0, 3.0, 20.0), None);
/// ```
pub fn resolve_direction(dx: f32, dy: f32, cell_size: f32) -> Option<Direction> {
    if !(cell_size.is_finite() && cell_size > 0.0) || !dx.is_finite() || !dy.is_finite() {
        return None;
    }

    if dx.abs() > dy.abs() {
        if dx.abs() < cell_size {
            return None;
        }
        Some(if dx > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        if dy.abs() < cell_size {
            return None;
        }
        Some(if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

/// Turns a stream of pointer positions into discrete moves.
///
/// Each time the pointer travels one cell away from the reference point a
/// direction is issued and the reference point jumps to the pointer.
#[derive(Debug, Clone, Default)]
pub struct DragTracker {
    cell_size: f32,
    origin: Option<(f32, f32)>,
}

impl DragTracker {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            origin: None,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    pub fn is_active(&self) -> bool {
        self.origin.is_some()
    }

    /// Start a drag at `(x, y)`
    pub fn begin(&mut self, x: f32, y: f32) {
        self.origin = Some((x, y));
    }

    /// Feed the current pointer position
    pub fn update(&mut self, x: f32, y: f32) -> Option<Direction> {
        let (ox, oy) = self.origin?;
        let direction = resolve_direction(x - ox, y - oy, self.cell_size)?;
        self.origin = Some((x, y));
        Some(direction)
    }

    /// Finish the drag; later updates are ignored until the next `begin`
    pub fn end(&mut self) {
        self.origin = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_one_cell() {
        assert_eq!(resolve_direction(19.9, 0.0, 20.0), None);
        assert_eq!(resolve_direction(20.0, 0.0, 20.0), Some(Direction::Right));
        assert_eq!(resolve_direction(0.0, -20.0, 20.0), Some(Direction::Up));
    }

    #[test]
    fn test_ties_go_vertical() {
        assert_eq!(resolve_direction(25.0, 25.0, 20.0), Some(Direction::Down));
        assert_eq!(resolve_direction(-25.0, -25.0, 20.0), Some(Direction::Up));
    }

    #[test]
    fn test_degenerate_cell_size() {
        assert_eq!(resolve_direction(50.0, 0.0, 0.0), None);
        assert_eq!(resolve_direction(50.0, 0.0, -1.0), None);
        assert_eq!(resolve_direction(f32::NAN, 0.0, 1.0), None);
    }

    #[test]
    fn test_tracker_rebases_after_each_step() {
        let mut tracker = DragTracker::new(1.0);
        assert_eq!(tracker.update(5.0, 5.0), None);

        tracker.begin(0.0, 0.0);
        assert_eq!(tracker.update(0.5, 0.0), None);
        assert_eq!(tracker.update(1.25, 0.0), Some(Direction::Right));
        assert_eq!(tracker.update(2.0, 0.25), None);
        assert_eq!(tracker.update(2.5, 0.25), Some(Direction::Right));
        assert_eq!(tracker.update(2.5, 1.75), Some(Direction::Down));

        tracker.end();
        assert!(!tracker.is_active());
        assert_eq!(tracker.update(9.0, 9.0), None);
    }
}
