//! Key mapping from terminal events to puzzle actions.

use crate::types::{BlockId, Direction, GameCommand, Variant};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press asks the front-end to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Forward a command to the session
    Command(GameCommand),
    /// Select the next block on the sliding grid
    CycleSelection,
    /// Flip between the shape and sliding variants
    SwitchVariant,
}

/// Map keyboard input to puzzle actions.
///
/// Arrow keys are variant-dependent: they shift the selected block on the
/// sliding grid and rotate the piece in the shape variant.
pub fn handle_key_event(key: KeyEvent, variant: Variant) -> Option<KeyAction> {
    let command = match key.code {
        // Arrows
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('H') => match variant {
            Variant::Slide => GameCommand::Move(Direction::Left),
            Variant::Shape => GameCommand::RotateLeft,
        },
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('L') => match variant {
            Variant::Slide => GameCommand::Move(Direction::Right),
            Variant::Shape => GameCommand::RotateRight,
        },
        KeyCode::Up | KeyCode::Char('k') | KeyCode::Char('K') => match variant {
            Variant::Slide => GameCommand::Move(Direction::Up),
            Variant::Shape => GameCommand::RotateRight,
        },
        KeyCode::Down | KeyCode::Char('j') | KeyCode::Char('J') => match variant {
            Variant::Slide => GameCommand::Move(Direction::Down),
            Variant::Shape => GameCommand::RotateLeft,
        },

        // Selection
        KeyCode::Tab => return Some(KeyAction::CycleSelection),
        KeyCode::Char(c @ '1'..='9') => GameCommand::Select(BlockId(c as u32 - '0' as u32)),

        // Shape actions
        KeyCode::Char('e') | KeyCode::Char('E') => GameCommand::Expand,
        KeyCode::Char('d') | KeyCode::Char('D') => GameCommand::Duplicate,
        KeyCode::Enter => GameCommand::CheckMatch,

        KeyCode::Char('v') | KeyCode::Char('V') => return Some(KeyAction::SwitchVariant),
        KeyCode::Char('r') | KeyCode::Char('R') => GameCommand::Restart,

        _ => return None,
    };
    Some(KeyAction::Command(command))
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}
