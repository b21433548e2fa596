/// Page-based frontend state.
///
/// One page is active at a time; the game loop routes input by page and
/// the renderer composes by page. The running `GameSession` survives
/// page switches (Playing ↔ pause, Playing → LevelClear) until a new
/// level is started.

use crate::sim::save::{HighScores, Options};
use crate::sim::session::GameSession;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Page {
    Menu,
    NamePrompt,
    LevelSelect,
    HighScores,
    Options,
    Playing,
    LevelClear,
    GameOver,
}

/// Outcome of the most recent completed attempt, for the result pages.
#[derive(Clone, Copy, Debug)]
pub struct LastResult {
    pub stars: u8,
    pub score: u32,
    pub new_best: bool,
}

pub struct App {
    pub page: Page,
    pub session: Option<GameSession>,
    pub paused: bool,

    pub scores: HighScores,
    pub options: Options,
    pub player_name: String,
    pub name_input: String,

    pub menu_cursor: usize,
    pub level_cursor: usize,
    pub options_cursor: usize,

    pub last_result: Option<LastResult>,
    pub final_score: u32,

    pub message: String,
    pub message_timer: u32,
    pub anim_tick: u32,
}

impl App {
    pub fn new(scores: HighScores, options: Options, player_name: Option<String>) -> Self {
        let page = if player_name.is_some() {
            Page::Menu
        } else {
            Page::NamePrompt
        };
        App {
            page,
            session: None,
            paused: false,
            scores,
            options,
            player_name: player_name.unwrap_or_default(),
            name_input: String::new(),
            menu_cursor: 0,
            level_cursor: 0,
            options_cursor: 0,
            last_result: None,
            final_score: 0,
            message: String::new(),
            message_timer: 0,
            anim_tick: 0,
        }
    }

    /// Transient status line. `ticks == 0` keeps it until cleared.
    pub fn set_message(&mut self, text: &str, ticks: u32) {
        self.message = text.to_string();
        self.message_timer = ticks;
    }

    pub fn tick_message(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message.clear();
            }
        }
    }
}
