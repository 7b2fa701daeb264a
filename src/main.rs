//! Terminal puzzle runner (default binary).
//!
//! Uses crossterm for keyboard and mouse input and the framebuffer-based
//! renderer from the `term` crate. The loop is event driven: the engine has
//! no timers, so the screen is only redrawn after input or a resize.

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use tracing::{debug, info};

use geo_puzzle::config::{engine_config_from_env, log_path_from_env};
use geo_puzzle::core::{LevelCatalog, Session, SlideGame};
use geo_puzzle::input::{handle_key_event, should_quit, DragTracker, KeyAction};
use geo_puzzle::logging;
use geo_puzzle::term::{describe, FrameBuffer, GameView, TerminalRenderer, Viewport};
use geo_puzzle::types::{BlockId, GameCommand, Outcome, Variant};

fn main() -> Result<()> {
    if let Some(path) = log_path_from_env() {
        logging::init_file(&path)?;
    }

    let engine = engine_config_from_env();
    info!(?engine, "starting terminal session");
    let session = Session::new(Arc::new(LevelCatalog::builtin()), engine);

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = App::new(session).run(&mut term);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

struct App {
    session: Session,
    view: GameView,
    drag: DragTracker,
    status: String,
}

impl App {
    fn new(session: Session) -> Self {
        Self {
            session,
            view: GameView::default(),
            // Pointer positions are fed in board-cell units.
            drag: DragTracker::new(1.0),
            status: String::from("Select the red block and drive it to the exit"),
        }
    }

    fn run(mut self, term: &mut TerminalRenderer) -> Result<()> {
        let mut fb = FrameBuffer::new(0, 0);

        loop {
            let viewport = current_viewport();
            self.render(viewport, &mut fb);
            term.present(&mut fb)?;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(action) = handle_key_event(key, self.session.active()) {
                        self.on_action(action);
                    }
                }
                Event::Mouse(mouse) => self.on_mouse(mouse, viewport),
                Event::Resize(..) => term.invalidate(),
                _ => {}
            }
        }
    }

    fn render(&self, viewport: Viewport, fb: &mut FrameBuffer) {
        match self.session.active() {
            Variant::Slide => {
                self.view
                    .render_slide_into(self.session.slide().state(), &self.status, viewport, fb)
            }
            Variant::Shape => {
                self.view
                    .render_shape_into(self.session.shape().state(), &self.status, viewport, fb)
            }
        }
    }

    fn on_action(&mut self, action: KeyAction) {
        match action {
            KeyAction::Command(command) => self.apply(command),
            KeyAction::CycleSelection => {
                if let Some(id) = next_block(self.session.slide()) {
                    self.apply(GameCommand::Select(id));
                }
            }
            KeyAction::SwitchVariant => {
                let variant = self.session.toggle_active();
                self.drag.end();
                self.status = match variant {
                    Variant::Shape => String::from("Match the target: rotate, expand, then Enter"),
                    Variant::Slide => String::from("Select the red block and drive it to the exit"),
                };
            }
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent, viewport: Viewport) {
        if self.session.active() != Variant::Slide {
            return;
        }
        let layout = self
            .view
            .slide_layout(self.session.slide().grid_size(), viewport);

        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let hit = layout
                    .cell_at(mouse.column, mouse.row)
                    .and_then(|(x, y)| self.session.slide().state().block_at(x, y))
                    .map(|b| b.id);
                if let Some(id) = hit {
                    self.apply(GameCommand::Select(id));
                    let (x, y) = layout.to_cell_units(mouse.column, mouse.row);
                    self.drag.begin(x, y);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                let (x, y) = layout.to_cell_units(mouse.column, mouse.row);
                if let Some(direction) = self.drag.update(x, y) {
                    self.apply(GameCommand::Move(direction));
                }
            }
            MouseEventKind::Up(MouseButton::Left) => self.drag.end(),
            _ => {}
        }
    }

    fn apply(&mut self, command: GameCommand) {
        let outcome = self.session.apply(command);
        debug!(command = command.as_str(), ?outcome, "terminal command");
        if outcome.is_level_complete() {
            self.drag.end();
        }
        self.status = match outcome {
            Outcome::Applied => String::new(),
            other => describe(&other),
        };
    }
}

/// Next block after the current selection, wrapping around
fn next_block(slide: &SlideGame) -> Option<BlockId> {
    let blocks = slide.blocks();
    let current = slide
        .selection()
        .and_then(|id| blocks.iter().position(|b| b.id == id));
    let next = match current {
        Some(i) => (i + 1) % blocks.len(),
        None => 0,
    };
    blocks.get(next).map(|b| b.id)
}

fn current_viewport() -> Viewport {
    let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
    Viewport::new(w, h)
}
