/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::Duration;

use crossterm::event::KeyCode;

use config::{GameConfig, TimingConfig};
use domain::player::Facing;
use domain::rules::BestResult;
use sim::event::GameEvent;
use sim::level::{self, LEVEL_COUNT};
use sim::save::{self, HighScores, Options};
use sim::session::GameSession;
use sim::step;
use ui::app::{App, LastResult, Page};
use ui::input::InputState;
use ui::renderer::{Renderer, MENU_ITEMS};
use ui::sound::SoundEngine;
use ui::timer::IntervalTimer;

const FRAME_SLEEP: Duration = Duration::from_millis(5);

/// Name entry length cap.
const MAX_NAME_LEN: usize = 12;

fn main() {
    let config = GameConfig::load();

    let scores = HighScores::load(&config.saves_dir).unwrap_or_else(|e| {
        eprintln!("Warning: could not load high scores: {e}");
        HighScores::default()
    });
    let options = Options::load(&config.saves_dir).unwrap_or_else(|e| {
        eprintln!("Warning: could not load options: {e}");
        Options::default()
    });
    let current = save::load_current_player(&config.saves_dir);
    let mut app = App::new(scores, options, current);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let mut sound = SoundEngine::new();
    if let Some(sfx) = sound.as_mut() {
        sfx.set_music_enabled(app.options.music);
        sfx.set_sfx_enabled(app.options.sound_effects);
    }

    let result = game_loop(&mut app, &mut renderer, &mut sound, &config);

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Tilebound!");
}

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_JUMP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char(' '), KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter];
const KEYS_PAUSE: &[KeyCode] = &[KeyCode::Char('p'), KeyCode::Char('P')];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];

/// The three sim clocks, paused and resumed as a unit.
struct Timers {
    physics: IntervalTimer,
    anim: IntervalTimer,
    sprite: IntervalTimer,
}

impl Timers {
    fn new(timing: &TimingConfig) -> Self {
        Timers {
            physics: IntervalTimer::from_millis(timing.physics_tick_ms),
            anim: IntervalTimer::from_millis(timing.anim_tick_ms),
            sprite: IntervalTimer::from_millis(timing.sprite_tick_ms),
        }
    }

    fn reset(&mut self, timing: &TimingConfig) {
        *self = Timers::new(timing);
    }

    fn pause_all(&mut self) {
        self.physics.pause();
        self.anim.pause();
        self.sprite.pause();
    }

    fn resume_all(&mut self) {
        self.physics.resume();
        self.anim.resume();
        self.sprite.resume();
    }
}

fn game_loop(
    app: &mut App,
    renderer: &mut Renderer,
    sound: &mut Option<SoundEngine>,
    config: &GameConfig,
) -> std::io::Result<()> {
    let mut kb = InputState::new();
    let mut timers = Timers::new(&config.timing);

    loop {
        kb.drain_events();
        if kb.ctrl_c_pressed() {
            break;
        }
        app.anim_tick = app.anim_tick.wrapping_add(1);
        app.tick_message();

        let mut events: Vec<GameEvent> = Vec::new();

        match app.page {
            Page::Menu => {
                move_cursor(&kb, &mut app.menu_cursor, MENU_ITEMS.len());
                if kb.any_pressed(KEYS_CONFIRM) {
                    match app.menu_cursor {
                        0 => start_level(app, config, &mut timers, app.level_cursor + 1),
                        1 => app.page = Page::LevelSelect,
                        2 => app.page = Page::HighScores,
                        3 => app.page = Page::Options,
                        4 => {
                            app.name_input.clear();
                            app.page = Page::NamePrompt;
                        }
                        _ => break,
                    }
                }
                if kb.was_pressed(KeyCode::Esc) {
                    break;
                }
            }

            Page::NamePrompt => handle_name_prompt(app, &kb, config),

            Page::LevelSelect => {
                move_cursor(&kb, &mut app.level_cursor, LEVEL_COUNT);
                if kb.any_pressed(KEYS_CONFIRM) {
                    start_level(app, config, &mut timers, app.level_cursor + 1);
                }
                if kb.was_pressed(KeyCode::Esc) {
                    app.page = Page::Menu;
                }
            }

            Page::HighScores => {
                if kb.was_pressed(KeyCode::Esc) || kb.any_pressed(KEYS_CONFIRM) {
                    app.page = Page::Menu;
                }
            }

            Page::Options => handle_options(app, &kb, sound, config),

            Page::Playing => {
                if kb.any_pressed(KEYS_PAUSE) {
                    app.paused = !app.paused;
                    if app.paused {
                        timers.pause_all();
                    } else {
                        timers.resume_all();
                    }
                }
                if kb.was_pressed(KeyCode::Esc) {
                    app.session = None;
                    app.paused = false;
                    app.page = Page::Menu;
                } else if !app.paused {
                    if let Some(s) = app.session.as_mut() {
                        // One tile per key-down; held keys repeat at the
                        // OS key-repeat rate.
                        for _ in 0..press_total(&kb, KEYS_LEFT) {
                            step::walk(s, Facing::Left);
                        }
                        for _ in 0..press_total(&kb, KEYS_RIGHT) {
                            step::walk(s, Facing::Right);
                        }
                        if kb.any_pressed(KEYS_JUMP) {
                            events.extend(step::jump(s));
                        }
                    }
                }
            }

            Page::LevelClear => {
                if kb.any_pressed(KEYS_CONFIRM) {
                    let next = app
                        .session
                        .as_ref()
                        .map(|s| s.level_number + 1)
                        .unwrap_or(1);
                    if next > LEVEL_COUNT {
                        app.session = None;
                        app.page = Page::Menu;
                        app.set_message("All levels complete!", 400);
                    } else {
                        app.level_cursor = next - 1;
                        start_level(app, config, &mut timers, next);
                    }
                } else if kb.any_pressed(KEYS_RESTART) {
                    let level = app.session.as_ref().map(|s| s.level_number).unwrap_or(1);
                    start_level(app, config, &mut timers, level);
                } else if kb.was_pressed(KeyCode::Esc) {
                    app.session = None;
                    app.page = Page::Menu;
                }
            }

            Page::GameOver => {
                if kb.any_pressed(KEYS_RESTART) || kb.any_pressed(KEYS_CONFIRM) {
                    let level = app.session.as_ref().map(|s| s.level_number).unwrap_or(1);
                    start_level(app, config, &mut timers, level);
                } else if kb.was_pressed(KeyCode::Esc) {
                    app.session = None;
                    app.page = Page::Menu;
                }
            }
        }

        // Sim clocks, only while actually playing.
        if app.page == Page::Playing && !app.paused {
            if let Some(s) = app.session.as_mut() {
                for _ in 0..timers.physics.poll() {
                    events.extend(step::physics_tick(s));
                    if events.iter().any(is_terminal) {
                        break;
                    }
                }
                for _ in 0..timers.anim.poll() {
                    step::animation_tick(s);
                }
                for _ in 0..timers.sprite.poll() {
                    step::sprite_tick(s);
                }
            }
        }

        process_events(app, sound, config, &events);

        renderer.render(app)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

fn is_terminal(event: &GameEvent) -> bool {
    matches!(
        event,
        GameEvent::LevelComplete { .. } | GameEvent::GameOver { .. }
    )
}

fn press_total(kb: &InputState, codes: &[KeyCode]) -> usize {
    codes.iter().map(|c| kb.press_count(*c)).sum()
}

fn move_cursor(kb: &InputState, cursor: &mut usize, len: usize) {
    if kb.any_pressed(KEYS_UP) {
        *cursor = (*cursor + len - 1) % len;
    }
    if kb.any_pressed(KEYS_DOWN) {
        *cursor = (*cursor + 1) % len;
    }
}

/// Load the level and enter Playing. A load failure (no disk level, no
/// built-in) stays on the current page with a message.
fn start_level(app: &mut App, config: &GameConfig, timers: &mut Timers, number: usize) {
    match level::load_or_builtin(&config.levels_dir, number) {
        Ok(data) => {
            app.session = Some(GameSession::start(number, data, config.tuning()));
            app.paused = false;
            app.page = Page::Playing;
            timers.reset(&config.timing);
        }
        Err(e) => {
            app.set_message(&format!("Level {number} failed to load: {e}"), 600);
        }
    }
}

fn handle_name_prompt(app: &mut App, kb: &InputState, config: &GameConfig) {
    for c in kb.typed_chars() {
        if c.is_ascii_alphanumeric() && app.name_input.len() < MAX_NAME_LEN {
            app.name_input.push(c.to_ascii_lowercase());
        }
    }
    if kb.was_pressed(KeyCode::Backspace) {
        app.name_input.pop();
    }
    if kb.any_pressed(KEYS_CONFIRM) && !app.name_input.is_empty() {
        app.player_name = app.name_input.clone();
        if let Err(e) = save::save_current_player(&config.saves_dir, &app.player_name) {
            app.set_message(&format!("Could not remember player: {e}"), 400);
        }
        app.page = Page::Menu;
    }
    // Esc backs out only if there already is a player to fall back to.
    if kb.was_pressed(KeyCode::Esc) && !app.player_name.is_empty() {
        app.page = Page::Menu;
    }
}

fn handle_options(
    app: &mut App,
    kb: &InputState,
    sound: &mut Option<SoundEngine>,
    config: &GameConfig,
) {
    move_cursor(kb, &mut app.options_cursor, 2);
    let toggle = kb.any_pressed(KEYS_CONFIRM)
        || kb.any_pressed(KEYS_LEFT)
        || kb.any_pressed(KEYS_RIGHT);
    if toggle {
        match app.options_cursor {
            0 => app.options.music = !app.options.music,
            _ => app.options.sound_effects = !app.options.sound_effects,
        }
        if let Some(sfx) = sound.as_mut() {
            sfx.set_music_enabled(app.options.music);
            sfx.set_sfx_enabled(app.options.sound_effects);
        }
        if let Err(e) = app.options.save(&config.saves_dir) {
            app.set_message(&format!("Could not save options: {e}"), 400);
        }
    }
    if kb.was_pressed(KeyCode::Esc) {
        app.page = Page::Menu;
    }
}

fn process_events(
    app: &mut App,
    sound: &Option<SoundEngine>,
    config: &GameConfig,
    events: &[GameEvent],
) {
    if let Some(sfx) = sound.as_ref() {
        for event in events {
            match event {
                GameEvent::CoinCollected { .. } => sfx.play_coin(),
                GameEvent::DiamondCollected { .. } => sfx.play_diamond(),
                GameEvent::LifeCollected { .. } => sfx.play_life(),
                GameEvent::TrapHit { .. } => sfx.play_trap(),
                GameEvent::PlayerJumped => sfx.play_jump(),
                GameEvent::LevelComplete { .. } => sfx.play_clear(),
                GameEvent::GameOver { .. } => sfx.play_game_over(),
                GameEvent::PlayerLanded => {}
            }
        }
    }

    for event in events {
        match *event {
            GameEvent::LevelComplete { stars, score } => {
                let level = app.session.as_ref().map(|s| s.level_number).unwrap_or(1);
                let new_best =
                    app.scores
                        .record(&app.player_name, level, BestResult::new(stars, score));
                if new_best {
                    if let Err(e) = app.scores.save(&config.saves_dir) {
                        app.set_message(&format!("Could not save scores: {e}"), 400);
                    }
                }
                app.last_result = Some(LastResult {
                    stars,
                    score,
                    new_best,
                });
                app.page = Page::LevelClear;
            }
            GameEvent::GameOver { score } => {
                app.final_score = score;
                app.paused = false;
                app.page = Page::GameOver;
            }
            _ => {}
        }
    }
}
