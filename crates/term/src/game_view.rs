//! GameView: maps engine state into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{Piece, ShapeState, SlideState};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{
    IgnoreReason, Outcome, RejectReason, ShapeKind, ShapeSize, Variant, FULL_TURN_DEGREES,
};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where the sliding grid landed on screen; used for pointer hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardLayout {
    /// Terminal column of grid cell `(0, 0)`.
    pub left: u16,
    /// Terminal row of grid cell `(0, 0)`.
    pub top: u16,
    pub cell_w: u16,
    pub cell_h: u16,
    pub grid_size: u16,
}

impl BoardLayout {
    /// Grid cell under a terminal position, if any.
    pub fn cell_at(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        let dx = column.checked_sub(self.left)?;
        let dy = row.checked_sub(self.top)?;
        let (cx, cy) = (dx / self.cell_w.max(1), dy / self.cell_h.max(1));
        (cx < self.grid_size && cy < self.grid_size).then_some((cx as i32, cy as i32))
    }

    /// Terminal position of the top-left corner of a grid cell.
    pub fn cell_origin(&self, x: u16, y: u16) -> (u16, u16) {
        (
            self.left.saturating_add(x.saturating_mul(self.cell_w)),
            self.top.saturating_add(y.saturating_mul(self.cell_h)),
        )
    }

    /// Pointer position in grid-cell units, for drag tracking.
    pub fn to_cell_units(&self, column: u16, row: u16) -> (f32, f32) {
        (
            (column as f32 - self.left as f32) / self.cell_w.max(1) as f32,
            (row as f32 - self.top as f32) / self.cell_h.max(1) as f32,
        )
    }
}

/// Side panel width in columns, including its left gap.
const PANEL_W: u16 = 24;
/// Rows reserved under the board for the status and help lines.
const FOOTER_H: u16 = 2;
/// A shape piece is drawn inside a square of this many cells.
const PIECE_BOX: u16 = 3;

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const TARGET_COLOR: Rgb = Rgb::new(220, 70, 70);
const BLOCK_COLORS: [Rgb; 6] = [
    Rgb::new(80, 120, 220),
    Rgb::new(100, 200, 120),
    Rgb::new(230, 200, 80),
    Rgb::new(180, 110, 220),
    Rgb::new(80, 200, 210),
    Rgb::new(240, 150, 60),
];

/// A lightweight terminal renderer for both puzzle variants.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Where a `grid_size` board is placed inside `viewport`.
    pub fn slide_layout(&self, grid_size: i32, viewport: Viewport) -> BoardLayout {
        let grid = grid_size.clamp(0, u16::MAX as i32) as u16;
        let frame_w = grid.saturating_mul(self.cell_w).saturating_add(2);
        let frame_h = grid.saturating_mul(self.cell_h).saturating_add(2);
        let (x, y) = self.frame_origin(frame_w, frame_h, viewport);
        BoardLayout {
            left: x + 1,
            top: y + 1,
            cell_w: self.cell_w,
            cell_h: self.cell_h,
            grid_size: grid,
        }
    }

    /// Render a sliding-block state into an existing framebuffer.
    pub fn render_slide_into(
        &self,
        state: &SlideState,
        status: &str,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let layout = self.slide_layout(state.grid_size, viewport);
        let inner_w = layout.grid_size * self.cell_w;
        let inner_h = layout.grid_size * self.cell_h;
        let (frame_x, frame_y) = (layout.left - 1, layout.top - 1);

        fb.fill_rect(layout.left, layout.top, inner_w, inner_h, ' ', board_style());
        draw_border(fb, frame_x, frame_y, inner_w + 2, inner_h + 2, border_style());

        for y in 0..layout.grid_size {
            for x in 0..layout.grid_size {
                let (px, py) = layout.cell_origin(x, y);
                let dot = CellStyle::fg_on(Rgb::new(90, 90, 100), BOARD_BG).dim();
                fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', board_style());
                fb.put_char(px, py, '·', dot);
            }
        }

        for block in &state.blocks {
            let selected = state.selection == Some(block.id);
            let mut color = if block.is_target {
                TARGET_COLOR
            } else {
                BLOCK_COLORS[(block.id.0 as usize).wrapping_sub(1) % BLOCK_COLORS.len()]
            };
            if selected {
                color = color.lighten(50);
            }
            let fill = CellStyle::fg_on(Rgb::new(10, 10, 10), color);
            let fill = if selected { fill.bold() } else { fill };

            for cy in block.y..block.y + block.height {
                for cx in block.x..block.x + block.width {
                    if cx < 0 || cy < 0 {
                        continue;
                    }
                    let (px, py) = layout.cell_origin(cx as u16, cy as u16);
                    fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', fill);
                }
            }
            if block.x >= 0 && block.y >= 0 {
                let (px, py) = layout.cell_origin(block.x as u16, block.y as u16);
                let label = if block.is_target { '*' } else { ' ' };
                fb.put_char(px, py, label, fill);
                if block.id.0 < 10 {
                    fb.put_u32(px + 1, py, block.id.0, fill);
                }
            }
        }

        // Exit marker on the right border, level with the target block.
        if let Some(target) = state.target_block() {
            let exit = CellStyle::fg_on(TARGET_COLOR, Rgb::new(0, 0, 0)).bold();
            for cy in target.y.max(0)..(target.y + target.height).max(0) {
                let (_, py) = layout.cell_origin(0, cy as u16);
                for dy in 0..self.cell_h {
                    fb.put_char(layout.left + inner_w, py + dy, '▶', exit);
                }
            }
        }

        if let Some(mut panel) = Panel::new(fb, layout.left + inner_w + 3, frame_y) {
            panel.title("SLIDE");
            panel.value_u32("LEVEL", state.level);
            panel.value_u32("MOVES", state.moves_left);
            panel.label("SELECTED");
            match state.selected_block() {
                Some(block) => {
                    let x = panel.put_str("#");
                    let x = panel.put_u32_at(x, block.id.0);
                    if block.is_target {
                        panel.put_str_at(x, " (target)");
                    }
                }
                None => {
                    panel.put_str("-");
                }
            }
            panel.next_line(2);
            panel.label("GOAL");
            panel.put_str("red block to ▶");
        }

        if state.moves_left == 0 {
            draw_overlay_text(fb, frame_x, frame_y, inner_w + 2, inner_h + 2, "OUT OF MOVES");
        }

        draw_footer(fb, viewport, status, Variant::Slide);
    }

    pub fn render_slide(&self, state: &SlideState, status: &str, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_slide_into(state, status, viewport, &mut fb);
        fb
    }

    /// Render a shape-transform state into an existing framebuffer.
    pub fn render_shape_into(
        &self,
        state: &ShapeState,
        status: &str,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let slot_w = PIECE_BOX * self.cell_w + 2;
        let slots = state.pieces.len().max(1) as u16;
        let inner_w = slots.saturating_mul(slot_w);
        let inner_h = PIECE_BOX * self.cell_h + 2;
        let (frame_x, frame_y) = self.frame_origin(inner_w + 2, inner_h + 2, viewport);

        fb.fill_rect(frame_x + 1, frame_y + 1, inner_w, inner_h, ' ', board_style());
        draw_border(fb, frame_x, frame_y, inner_w + 2, inner_h + 2, border_style());

        for (i, piece) in state.pieces.iter().enumerate() {
            let x = frame_x + 2 + (i as u16).saturating_mul(slot_w);
            let y = frame_y + 1;
            let matched = i == 0 && state.target.matches(piece);
            self.draw_piece(fb, x, y, piece, matched);
        }

        if let Some(mut panel) = Panel::new(fb, frame_x + inner_w + 4, frame_y) {
            panel.title("SHAPE");
            panel.value_u32("LEVEL", state.level);
            panel.value_u32("MOVES", state.moves_left);
            panel.value_u32("PIECES", state.pieces.len() as u32);
            panel.label("TARGET");
            panel.describe_piece(
                state.target.kind,
                state.target.size,
                state.target.rotation_degrees,
            );
            if let Some(first) = state.pieces.first() {
                panel.label("FIRST");
                panel.describe_piece(first.kind, first.size, first.rotation_degrees);
            }
        }

        if state.moves_left == 0 {
            draw_overlay_text(fb, frame_x, frame_y, inner_w + 2, inner_h + 2, "OUT OF MOVES");
        }

        draw_footer(fb, viewport, status, Variant::Shape);
    }

    pub fn render_shape(&self, state: &ShapeState, status: &str, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_shape_into(state, status, viewport, &mut fb);
        fb
    }

    /// Top-left corner of a frame of the given size, with room for the panel.
    fn frame_origin(&self, frame_w: u16, frame_h: u16, viewport: Viewport) -> (u16, u16) {
        let content_w = frame_w.saturating_add(PANEL_W);
        let x = viewport.width.saturating_sub(content_w) / 2;
        let y = viewport
            .height
            .saturating_sub(FOOTER_H)
            .saturating_sub(frame_h)
            / 2;
        (x, y)
    }

    fn draw_piece(&self, fb: &mut FrameBuffer, x: u16, y: u16, piece: &Piece, matched: bool) {
        let side = match piece.size {
            ShapeSize::Small => 1,
            ShapeSize::Medium => 2,
            ShapeSize::Large => 3,
        };
        let offset = (PIECE_BOX - side) / 2;
        let color = if matched {
            Rgb::new(120, 230, 120)
        } else {
            kind_color(piece.kind)
        };
        let style = CellStyle::fg_on(color, BOARD_BG).bold();
        let glyph = glyph(piece.kind, piece.rotation_degrees);

        for cy in 0..side {
            for cx in 0..side {
                let px = x + (offset + cx) * self.cell_w;
                let py = y + (offset + cy) * self.cell_h;
                fb.fill_rect(px, py, self.cell_w, self.cell_h, glyph, style);
            }
        }

        let caption = CellStyle::fg_on(Rgb::new(170, 170, 180), BOARD_BG);
        let cy = y + PIECE_BOX * self.cell_h;
        let cx = fb.put_str(x, cy, size_abbrev(piece.size), caption);
        let cx = fb.put_u32(cx + 1, cy, piece.normalized_rotation() as u32, caption);
        fb.put_str(cx, cy, "°", caption);
    }
}

/// Human readable description of a command outcome, for the status line.
pub fn describe(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Applied => String::from("ok"),
        Outcome::LevelComplete { level } => format!("Level complete! Now playing level {level}"),
        Outcome::Rejected(RejectReason::Blocked { by }) => format!("Blocked by block {by}"),
        Outcome::Rejected(RejectReason::InvalidSelection(id)) => format!("There is no block {id}"),
        Outcome::Rejected(RejectReason::NoMatch) => String::from("Not a match yet"),
        Outcome::Ignored(IgnoreReason::NoMovesLeft) => {
            String::from("No moves left, press r to restart")
        }
        Outcome::Ignored(IgnoreReason::NoSelection) => {
            String::from("Select a block first (Tab, 1-9 or click)")
        }
        Outcome::Ignored(IgnoreReason::AtBoundary) => String::from("That block is at the edge"),
        Outcome::Ignored(IgnoreReason::AtCeiling) => String::from("Pieces are already large"),
        Outcome::Ignored(IgnoreReason::NothingToDuplicate) => String::from("Nothing to duplicate"),
    }
}

/// Panel cursor: writes label/value rows top to bottom.
struct Panel<'a> {
    fb: &'a mut FrameBuffer,
    x: u16,
    y: u16,
}

impl<'a> Panel<'a> {
    /// `None` when the viewport leaves no room right of the board.
    fn new(fb: &'a mut FrameBuffer, x: u16, y: u16) -> Option<Self> {
        if x.saturating_add(12) > fb.width() {
            return None;
        }
        Some(Self { fb, x, y })
    }

    fn title(&mut self, text: &str) {
        let style = CellStyle::fg_on(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
        self.fb.put_str(self.x, self.y, text, style);
        self.next_line(2);
    }

    fn label(&mut self, text: &str) {
        self.fb.put_str(self.x, self.y, text, label_style());
        self.next_line(1);
    }

    fn value_u32(&mut self, label: &str, value: u32) {
        self.label(label);
        self.put_u32_at(self.x, value);
        self.next_line(2);
    }

    fn describe_piece(&mut self, kind: ShapeKind, size: ShapeSize, rotation_degrees: i64) {
        let glyph_style = CellStyle::fg_on(kind_color(kind), Rgb::new(0, 0, 0)).bold();
        self.fb
            .put_char(self.x, self.y, glyph(kind, rotation_degrees), glyph_style);
        let x = self.put_str_at(self.x + 2, size.as_str());
        let x = self.put_str_at(x + 1, kind.as_str());
        let x = self.put_u32_at(x + 1, rotation_degrees.rem_euclid(FULL_TURN_DEGREES) as u32);
        self.put_str_at(x, "°");
        self.next_line(2);
    }

    fn put_str(&mut self, text: &str) -> u16 {
        self.put_str_at(self.x, text)
    }

    fn put_str_at(&mut self, x: u16, text: &str) -> u16 {
        self.fb.put_str(x, self.y, text, value_style())
    }

    fn put_u32_at(&mut self, x: u16, value: u32) -> u16 {
        self.fb.put_u32(x, self.y, value, value_style())
    }

    fn next_line(&mut self, rows: u16) {
        self.y = self.y.saturating_add(rows);
    }
}

fn label_style() -> CellStyle {
    CellStyle::fg_on(Rgb::new(220, 220, 220), Rgb::new(0, 0, 0)).bold()
}

fn value_style() -> CellStyle {
    CellStyle::fg_on(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0))
}

fn board_style() -> CellStyle {
    CellStyle::fg_on(Rgb::new(80, 80, 90), BOARD_BG)
}

fn border_style() -> CellStyle {
    CellStyle::fg_on(Rgb::new(200, 200, 200), Rgb::new(0, 0, 0))
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
    if w < 2 || h < 2 {
        return;
    }

    fb.put_char(x, y, '┌', style);
    fb.put_char(x + w - 1, y, '┐', style);
    fb.put_char(x, y + h - 1, '└', style);
    fb.put_char(x + w - 1, y + h - 1, '┘', style);

    for dx in 1..w - 1 {
        fb.put_char(x + dx, y, '─', style);
        fb.put_char(x + dx, y + h - 1, '─', style);
    }
    for dy in 1..h - 1 {
        fb.put_char(x, y + dy, '│', style);
        fb.put_char(x + w - 1, y + dy, '│', style);
    }
}

fn draw_overlay_text(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, text: &str) {
    let text_w = text.chars().count() as u16;
    let tx = x.saturating_add(w.saturating_sub(text_w) / 2);
    let style = CellStyle::fg_on(Rgb::new(255, 255, 255), Rgb::new(0, 0, 0)).bold();
    fb.put_str(tx, y.saturating_add(h / 2), text, style);
}

fn draw_footer(fb: &mut FrameBuffer, viewport: Viewport, status: &str, variant: Variant) {
    if viewport.height < FOOTER_H {
        return;
    }
    let status_style = CellStyle::fg_on(Rgb::new(240, 220, 120), Rgb::new(0, 0, 0));
    let help_style = CellStyle::default().dim();
    let help = match variant {
        Variant::Slide => "arrows/drag move  tab/1-9 select  r restart  v shapes  q quit",
        Variant::Shape => "←/→ rotate  e expand  d duplicate  enter check  r restart  v blocks  q quit",
    };
    fb.put_str(1, viewport.height - 2, status, status_style);
    fb.put_str(1, viewport.height - 1, help, help_style);
}

fn size_abbrev(size: ShapeSize) -> &'static str {
    match size {
        ShapeSize::Small => "sm",
        ShapeSize::Medium => "md",
        ShapeSize::Large => "lg",
    }
}

fn kind_color(kind: ShapeKind) -> Rgb {
    match kind {
        ShapeKind::Triangle => Rgb::new(240, 200, 80),
        ShapeKind::Square => Rgb::new(80, 160, 240),
        ShapeKind::Circle => Rgb::new(220, 110, 200),
    }
}

/// Glyph for a piece; triangles point in the direction of their rotation.
fn glyph(kind: ShapeKind, rotation_degrees: i64) -> char {
    match kind {
        ShapeKind::Square => '■',
        ShapeKind::Circle => '●',
        ShapeKind::Triangle => match rotation_degrees.rem_euclid(FULL_TURN_DEGREES) / 90 {
            0 => '▲',
            1 => '▶',
            2 => '▼',
            _ => '◀',
        },
    }
}
