/// Keyboard input tracker.
///
/// Movement in this game is edge-driven: every key-down is one discrete
/// action (one tile step, one jump, one menu move), so each terminal
/// Press or Repeat event counts as a press. Holding a key walks at the
/// OS key-repeat rate. Release events carry no information here and are
/// ignored.
///
/// Call `drain_events` once per loop iteration, then query.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

pub struct InputState {
    /// Key codes of every Press/Repeat event this frame, in order.
    presses: Vec<KeyCode>,

    /// Raw events this frame, for meta-key and text-entry handling.
    pub raw_events: Vec<KeyEvent>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) {
        self.presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.raw_events.push(key);
                if key.kind != KeyEventKind::Release {
                    self.presses.push(key.code);
                }
            }
        }
    }

    /// How many times this key was pressed this frame.
    pub fn press_count(&self, code: KeyCode) -> usize {
        self.presses.iter().filter(|c| **c == code).count()
    }

    pub fn was_pressed(&self, code: KeyCode) -> bool {
        self.presses.contains(&code)
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.was_pressed(*c))
    }

    /// Characters typed this frame, for name entry.
    pub fn typed_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.raw_events.iter().filter_map(|k| {
            if k.kind == KeyEventKind::Release || k.modifiers.contains(KeyModifiers::CONTROL) {
                return None;
            }
            match k.code {
                KeyCode::Char(c) => Some(c),
                _ => None,
            }
        })
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }
}
