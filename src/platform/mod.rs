//! Platform abstraction layer
//!
//! The game sees a 2D pointer with press/release, a handful of keys and a
//! quit request. Hosts translate whatever their window or test harness
//! produces into these events, one batch per tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Keyboard keys the game cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Escape,
    Char(char),
}

impl Key {
    /// P or Escape toggles pause
    pub fn is_pause(self) -> bool {
        matches!(self, Key::Escape | Key::Char('p' | 'P'))
    }

    /// Q quits a paused round
    pub fn is_quit(self) -> bool {
        matches!(self, Key::Char('q' | 'Q'))
    }
}

/// One input event, in receipt order
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputEvent {
    /// Primary button pressed
    PointerDown,
    /// Primary button released
    PointerUp,
    /// Pointer moved to a position in play-area pixels
    PointerMove(Vec2),
    KeyDown(Key),
    /// Window closed
    Quit,
}

/// Collapse every run of consecutive moves into its last position.
///
/// Order between moves and other events is kept, so a press in the middle of
/// a drag still splits it in two.
pub fn coalesce(events: &[InputEvent]) -> Vec<InputEvent> {
    let mut out: Vec<InputEvent> = Vec::with_capacity(events.len());
    for event in events {
        match (event, out.last_mut()) {
            (InputEvent::PointerMove(pos), Some(InputEvent::PointerMove(last))) => *last = *pos,
            _ => out.push(*event),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(x: f32, y: f32) -> InputEvent {
        InputEvent::PointerMove(Vec2::new(x, y))
    }

    #[test]
    fn test_coalesce_runs() {
        let events = [
            mv(0.0, 0.0),
            mv(1.0, 1.0),
            mv(2.0, 2.0),
            InputEvent::PointerDown,
            mv(3.0, 3.0),
            mv(4.0, 4.0),
            InputEvent::PointerUp,
            mv(5.0, 5.0),
        ];
        assert_eq!(
            coalesce(&events),
            vec![
                mv(2.0, 2.0),
                InputEvent::PointerDown,
                mv(4.0, 4.0),
                InputEvent::PointerUp,
                mv(5.0, 5.0),
            ]
        );
    }

    #[test]
    fn test_coalesce_keeps_other_events() {
        let events = [
            InputEvent::KeyDown(Key::Char('p')),
            InputEvent::KeyDown(Key::Char('p')),
            InputEvent::Quit,
        ];
        assert_eq!(coalesce(&events), events.to_vec());
        assert!(coalesce(&[]).is_empty());
    }

    #[test]
    fn test_key_roles() {
        assert!(Key::Escape.is_pause());
        assert!(Key::Char('P').is_pause());
        assert!(!Key::Char('q').is_pause());
        assert!(Key::Char('q').is_quit());
    }
}
