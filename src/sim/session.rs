use crate::domain::player::Player;
use crate::sim::ledger::CollectibleLedger;
use crate::sim::level::LevelData;

pub const MAX_LIVES: u32 = 3;

/// Physics tuning shared by every tick. Defaults match the stock feel;
/// the config file can override them.
#[derive(Clone, Copy, Debug)]
pub struct Tuning {
    pub gravity: f64,
    pub dt: f64,
    pub jump_velocity: f64,
    /// Pixels the visual x closes toward target_x per animation tick.
    pub walk_step: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Tuning {
            gravity: 40.0,
            dt: 0.08,
            jump_velocity: 100.0,
            walk_step: 8.0,
        }
    }
}

/// Everything one play-through of one level needs, in one place.
///
/// Entering a level (first time or replay) goes through `start` /
/// `restart`, which rebuild the whole transient state: player at spawn,
/// empty ledger, zero score, full lives. Nothing carries over between
/// attempts except the loaded level data itself.
#[derive(Clone, Debug)]
pub struct GameSession {
    pub level: LevelData,
    pub level_number: usize,
    pub player: Player,
    pub ledger: CollectibleLedger,
    pub score: u32,
    pub lives: u32,
    pub tuning: Tuning,
}

impl GameSession {
    pub fn start(level_number: usize, level: LevelData, tuning: Tuning) -> Self {
        let mut session = GameSession {
            level,
            level_number,
            player: Player::new(),
            ledger: CollectibleLedger::default(),
            score: 0,
            lives: MAX_LIVES,
            tuning,
        };
        session.restart();
        session
    }

    /// Fresh attempt at the already-loaded level.
    pub fn restart(&mut self) {
        self.player.reset_to_spawn();
        self.ledger.reset(
            self.level.coin_total,
            self.level.diamond_total,
            self.level.life_total,
        );
        self.score = 0;
        self.lives = MAX_LIVES;
    }
}
