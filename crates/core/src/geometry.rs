//! Geometry module - axis-aligned rectangles on the integer grid
//!
//! Coordinates: (x, y) is the top-left corner, x grows to the right and
//! y grows downward. A rectangle covers the half-open ranges
//! `[x, x + width)` and `[y, y + height)`.

/// Axis-aligned rectangle in grid cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Copy of this rectangle moved by `(dx, dy)`
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Bounding-box overlap test
    ///
    /// Two rectangles overlap iff both their x-extents and their y-extents
    /// overlap. Touching edges do not count.
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Whether the rectangle lies inside `[0, grid_size) x [0, grid_size)`
    #[inline]
    pub fn fits_in_grid(&self, grid_size: i32) -> bool {
        self.x >= 0 && self.y >= 0 && self.right() <= grid_size && self.bottom() <= grid_size
    }

    /// Whether the cell `(x, y)` lies inside the rectangle
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }

    /// Whether the rectangle reaches the right edge of the grid (the exit)
    #[inline]
    pub fn reaches_exit(&self, grid_size: i32) -> bool {
        self.right() >= grid_size
    }
}
