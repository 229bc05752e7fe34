//! Main application state and key handling
//!
//! Keys map to [`Action`]s; the App applies them to the [`Model`].
//!
//! | key                 | action                          |
//! |---------------------|---------------------------------|
//! | `j` Down Space      | next state                      |
//! | `k` Up              | previous state                  |
//! | `l` Right / `h` Left| move the phrase highlight       |
//! | `+` `-` `0`         | stitch counter up, down, reset  |
//! | `]` `[` `)`         | row counter up, down, reset     |
//! | `g` / `G`           | first / last state              |
//! | `w`                 | save snapshot                   |
//! | `q` Ctrl-C          | save and quit                   |

use crate::model::{CounterOp, Model};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use knit::knit::engine::Counter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Next,
    Previous,
    First,
    Last,
    PhraseRight,
    PhraseLeft,
    Count(Counter, CounterOp),
    Save,
    Quit,
}

impl Action {
    pub fn for_key(key: KeyEvent) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') => Some(Action::Quit),
                _ => None,
            };
        }
        let action = match key.code {
            KeyCode::Char('j') | KeyCode::Down | KeyCode::Char(' ') => Action::Next,
            KeyCode::Char('k') | KeyCode::Up => Action::Previous,
            KeyCode::Char('l') | KeyCode::Right => Action::PhraseRight,
            KeyCode::Char('h') | KeyCode::Left => Action::PhraseLeft,
            KeyCode::Char('+') => Action::Count(Counter::Stitch, CounterOp::Increment),
            KeyCode::Char('-') => Action::Count(Counter::Stitch, CounterOp::Decrement),
            KeyCode::Char('0') => Action::Count(Counter::Stitch, CounterOp::Reset),
            KeyCode::Char(']') => Action::Count(Counter::Row, CounterOp::Increment),
            KeyCode::Char('[') => Action::Count(Counter::Row, CounterOp::Decrement),
            KeyCode::Char(')') => Action::Count(Counter::Row, CounterOp::Reset),
            KeyCode::Char('g') => Action::First,
            KeyCode::Char('G') => Action::Last,
            KeyCode::Char('w') => Action::Save,
            KeyCode::Char('q') => Action::Quit,
            _ => return None,
        };
        Some(action)
    }
}

pub struct App {
    pub model: Model,
    pub should_quit: bool,
}

impl App {
    pub fn new(model: Model) -> Self {
        App {
            model,
            should_quit: false,
        }
    }

    /// Handle a keyboard event
    ///
    /// Returns whether anything changed. Quitting only raises
    /// `should_quit`; the caller writes the final snapshot.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match Action::for_key(key) {
            Some(action) => {
                self.model.status = None;
                self.apply(action);
                true
            }
            None => false,
        }
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Next => self.model.next(),
            Action::Previous => self.model.previous(),
            Action::First => self.model.first(),
            Action::Last => self.model.last(),
            Action::PhraseRight => self.model.phrase_right(),
            Action::PhraseLeft => self.model.phrase_left(),
            Action::Count(counter, op) => self.model.count(counter, op),
            Action::Save => self.model.save(),
            Action::Quit => self.should_quit = true,
        }
    }
}
