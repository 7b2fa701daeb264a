//! Levels module - immutable level templates and level generation
//!
//! Sliding-block levels come from an ordered [`LevelCatalog`] of validated
//! [`SlideLevel`] templates. Shape-transform levels are computed from the
//! level number by [`ShapeLevel::generate`].
//!
//! Levels are numbered from 1. A level past the end of the catalog resolves
//! through a [`LevelOverflow`] policy instead of failing.

use std::collections::HashSet;

use derive_more::{Display, Error};

use crate::shape_game::TargetDescriptor;
use crate::slide_game::Block;
use crate::types::{
    BlockId, LevelOverflow, ShapeKind, ShapeSize, DEFAULT_GRID_SIZE, ROTATION_STEP_DEGREES,
    SHAPE_MOVE_BUDGET,
};

/// Reasons a level template is refused by [`LevelCatalog::new`]
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum CatalogError {
    #[display("level catalog is empty")]
    Empty,
    #[display("level {level}: grid size must be positive")]
    ZeroGridSize { level: u32 },
    #[display("level {level}: move budget must be positive")]
    ZeroMoveBudget { level: u32 },
    #[display("level {level}: expected exactly one target block, found {count}")]
    TargetCount { level: u32, count: usize },
    #[display("level {level}: duplicate block id {id}")]
    DuplicateBlock { level: u32, id: BlockId },
    #[display("level {level}: block {id} has a non-positive extent")]
    EmptyExtent { level: u32, id: BlockId },
    #[display("level {level}: block {id} lies outside the {grid_size}x{grid_size} grid")]
    OutOfBounds {
        level: u32,
        id: BlockId,
        grid_size: i32,
    },
    #[display("level {level}: blocks {first} and {second} overlap")]
    Overlap {
        level: u32,
        first: BlockId,
        second: BlockId,
    },
    #[display("level {level}: target block already touches the exit")]
    TargetAtExit { level: u32 },
    #[display("levels are numbered from 1")]
    ZeroLevel,
    #[display("level {level}: selection {id} is not a block")]
    UnknownSelection { level: u32, id: BlockId },
}

/// Initial layout of one sliding-block level
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SlideLevel {
    pub grid_size: u8,
    pub move_budget: u32,
    pub blocks: Vec<Block>,
}

impl SlideLevel {
    pub fn new(grid_size: u8, move_budget: u32, blocks: Vec<Block>) -> Self {
        Self {
            grid_size,
            move_budget,
            blocks,
        }
    }

    /// The block that must reach the exit
    pub fn target(&self) -> Option<&Block> {
        self.blocks.iter().find(|b| b.is_target)
    }

    /// Check the template invariants; `level` only labels the error
    pub fn validate(&self, level: u32) -> Result<(), CatalogError> {
        if self.grid_size == 0 {
            return Err(CatalogError::ZeroGridSize { level });
        }
        if self.move_budget == 0 {
            return Err(CatalogError::ZeroMoveBudget { level });
        }
        validate_layout(level, self.grid_size as i32, &self.blocks)
    }
}

/// Layout invariants shared by templates and caller-built states
///
/// Positive grid, exactly one target, unique ids, positive extents, every
/// block inside the grid, no overlaps, target not yet at the exit.
pub(crate) fn validate_layout(
    level: u32,
    grid_size: i32,
    blocks: &[Block],
) -> Result<(), CatalogError> {
    if grid_size <= 0 {
        return Err(CatalogError::ZeroGridSize { level });
    }

    let targets = blocks.iter().filter(|b| b.is_target).count();
    if targets != 1 {
        return Err(CatalogError::TargetCount {
            level,
            count: targets,
        });
    }

    let mut seen = HashSet::with_capacity(blocks.len());
    for block in blocks {
        if !seen.insert(block.id) {
            return Err(CatalogError::DuplicateBlock {
                level,
                id: block.id,
            });
        }
        if block.width <= 0 || block.height <= 0 {
            return Err(CatalogError::EmptyExtent {
                level,
                id: block.id,
            });
        }
        if !block.rect().fits_in_grid(grid_size) {
            return Err(CatalogError::OutOfBounds {
                level,
                id: block.id,
                grid_size,
            });
        }
    }

    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            if a.rect().overlaps(&b.rect()) {
                return Err(CatalogError::Overlap {
                    level,
                    first: a.id,
                    second: b.id,
                });
            }
        }
    }

    // A win is only detected after a committed move.
    if blocks
        .iter()
        .any(|b| b.is_target && b.rect().reaches_exit(grid_size))
    {
        return Err(CatalogError::TargetAtExit { level });
    }

    Ok(())
}

/// Ordered, immutable, non-empty list of sliding-block templates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelCatalog {
    templates: Vec<SlideLevel>,
}

impl LevelCatalog {
    /// Build a catalog, validating every template
    pub fn new(templates: Vec<SlideLevel>) -> Result<Self, CatalogError> {
        if templates.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, template) in templates.iter().enumerate() {
            template.validate(i as u32 + 1)?;
        }
        Ok(Self { templates })
    }

    /// The three built-in 6x6 levels
    pub fn builtin() -> Self {
        Self {
            templates: builtin_levels(),
        }
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn templates(&self) -> &[SlideLevel] {
        &self.templates
    }

    /// Strict lookup: `None` for level 0 or past the end
    pub fn get(&self, level: u32) -> Option<&SlideLevel> {
        let index = (level as usize).checked_sub(1)?;
        self.templates.get(index)
    }

    /// Template for `level`, falling back per `overflow` past the end
    pub fn template_for(&self, level: u32, overflow: LevelOverflow) -> &SlideLevel {
        if let Some(template) = self.get(level) {
            return template;
        }
        // Non-empty by construction.
        match overflow {
            LevelOverflow::WrapToFirst => &self.templates[0],
            LevelOverflow::RepeatLast => &self.templates[self.templates.len() - 1],
        }
    }
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn builtin_levels() -> Vec<SlideLevel> {
    let size = DEFAULT_GRID_SIZE;
    vec![
        // Lift the post at x=3, then drive through.
        SlideLevel::new(
            size,
            10,
            vec![
                Block::target(1, 0, 2, 2, 1),
                Block::new(2, 3, 1, 1, 2),
                Block::new(3, 5, 3, 1, 3),
            ],
        ),
        // One post goes down three cells, the other up one.
        SlideLevel::new(
            size,
            12,
            vec![
                Block::target(1, 1, 2, 2, 1),
                Block::new(2, 3, 0, 1, 3),
                Block::new(3, 4, 3, 2, 1),
                Block::new(4, 5, 1, 1, 2),
            ],
        ),
        // The lid must slide right before the post can rise.
        SlideLevel::new(
            size,
            14,
            vec![
                Block::target(1, 0, 2, 2, 1),
                Block::new(2, 2, 1, 1, 2),
                Block::new(3, 2, 3, 3, 1),
                Block::new(4, 2, 0, 3, 1),
                Block::new(5, 5, 1, 1, 2),
            ],
        ),
    ]
}

/// Layout of one shape-transform level, derived from its number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShapeLevel {
    pub level: u32,
    pub start_kind: ShapeKind,
    pub start_size: ShapeSize,
    pub start_rotation: i64,
    pub move_budget: u32,
    pub target: TargetDescriptor,
}

impl ShapeLevel {
    /// Deterministic level generator
    ///
    /// The kind cycles triangle, square, circle. The player starts from a
    /// medium piece at 0° and must reach a large piece rotated `90 * level`.
    pub fn generate(level: u32) -> Self {
        let level = level.max(1);
        let kind = ShapeKind::ALL[((level - 1) as usize) % ShapeKind::ALL.len()];
        Self {
            level,
            start_kind: kind,
            start_size: ShapeSize::Medium,
            start_rotation: 0,
            move_budget: SHAPE_MOVE_BUDGET,
            target: TargetDescriptor {
                kind,
                size: ShapeSize::Large,
                rotation_degrees: ROTATION_STEP_DEGREES * level as i64,
            },
        }
    }
}
