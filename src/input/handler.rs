use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Action, Direction, ModeId};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Game(Action),
    Quit,
    None,
}

pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Map a key press. `round_over` switches Space from pause to restart.
    pub fn handle_key_event(&self, key: KeyEvent, round_over: bool) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }

        let action = match key.code {
            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Direction::Up.into(),
            KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Direction::Down.into(),
            KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Direction::Left.into(),
            KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Direction::Right.into(),

            KeyCode::Char(' ') if round_over => Action::Restart,
            KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Char(' ') => Action::TogglePause,
            KeyCode::Char('r') | KeyCode::Char('R') => Action::Restart,

            // Number row picks the mode in display order
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                Action::SelectMode(ModeId::ALL[index])
            }

            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return KeyAction::Quit,
            _ => return KeyAction::None,
        };

        KeyAction::Game(action)
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
