/// Tick and input handlers for a running session.
///
/// Three independent clocks drive a session:
///   - `physics_tick`  — gravity, vertical collision, pickups, traps,
///     the win check. The only place game state changes on its own.
///   - `animation_tick` — visual x approaching target_x.
///   - `sprite_tick`   — jump animation frame counter.
///
/// Input is applied immediately (`walk`, `jump`), not queued for the
/// next tick: a legal step moves `target_x` the instant the key lands.

use crate::domain::physics::{self, VerticalHit};
use crate::domain::player::{Facing, JUMP_FRAMES};
use crate::domain::rules::star_rating;
use crate::domain::{COLUMNS, ROWS, TILE_SIZE, WIDTH};
use crate::sim::event::GameEvent;
use crate::sim::ledger::Kind;
use crate::sim::session::{GameSession, MAX_LIVES};

pub const COIN_SCORE: u32 = 10;
pub const DIAMOND_SCORE: u32 = 50;

/// One physics tick. Returns whatever happened, in order.
pub fn physics_tick(s: &mut GameSession) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let was_airborne = s.player.in_air;

    s.player.velocity_y -= s.tuning.gravity * s.tuning.dt;
    let dy = s.player.velocity_y * s.tuning.dt;
    let hit = physics::resolve_vertical(&mut s.player, &s.level.collide, dy);
    if hit == VerticalHit::Floor && was_airborne && !s.player.in_air {
        events.push(GameEvent::PlayerLanded);
    }

    check_cell(s, &mut events);

    // Past the right edge wins the level.
    if s.player.target_x + TILE_SIZE > WIDTH {
        let stars = star_rating(
            s.lives,
            s.ledger.all_collected(Kind::Coin),
            s.ledger.all_collected(Kind::Diamond),
        );
        events.push(GameEvent::LevelComplete {
            stars,
            score: s.score,
        });
    }

    events
}

/// Pickups and traps at the cell the player is committed to.
/// The ledger makes pickups fire once per attempt no matter how many
/// ticks the player spends overlapping the cell.
fn check_cell(s: &mut GameSession, events: &mut Vec<GameEvent>) {
    let col = s.player.target_x / TILE_SIZE;
    let row = physics::row_at(s.player.y);
    if !(0..ROWS as i32).contains(&row) || !(0..COLUMNS as i32).contains(&col) {
        return;
    }
    let (row, col) = (row as usize, col as usize);

    if s.level.trap[row][col] {
        s.player.reset_to_spawn();
        s.lives = s.lives.saturating_sub(1);
        events.push(GameEvent::TrapHit {
            lives_left: s.lives,
        });
        if s.lives == 0 {
            events.push(GameEvent::GameOver { score: s.score });
            s.restart();
        }
        return;
    }

    if s.level.coin[row][col] && s.ledger.try_collect(Kind::Coin, row, col) {
        s.score += COIN_SCORE;
        events.push(GameEvent::CoinCollected { row, col });
    }
    if s.level.diamond[row][col] && s.ledger.try_collect(Kind::Diamond, row, col) {
        s.score += DIAMOND_SCORE;
        events.push(GameEvent::DiamondCollected { row, col });
    }
    if s.level.life[row][col] && s.ledger.try_collect(Kind::Life, row, col) {
        if s.lives < MAX_LIVES {
            s.lives += 1;
        }
        events.push(GameEvent::LifeCollected { row, col });
    }
}

/// One-tile step. Moves `target_x` immediately when legal; the visual
/// x catches up over the next few animation ticks.
pub fn walk(s: &mut GameSession, dir: Facing) -> bool {
    s.player.facing = dir;
    let row = physics::row_at(s.player.y);
    match physics::horizontal_step(&s.level.collide, s.player.target_x, row, dir) {
        Some(next) => {
            s.player.target_x = next;
            true
        }
        None => false,
    }
}

/// Jump, only from the ground. Mid-air presses do nothing.
pub fn jump(s: &mut GameSession) -> Option<GameEvent> {
    if s.player.in_air {
        return None;
    }
    s.player.velocity_y = s.tuning.jump_velocity;
    s.player.in_air = true;
    s.player.jumping = true;
    s.player.jump_frame = 0;
    Some(GameEvent::PlayerJumped)
}

/// Visual x closes on target_x; never overshoots.
pub fn animation_tick(s: &mut GameSession) {
    s.player.x = physics::approach(s.player.x, s.player.target_x, s.tuning.walk_step);
}

/// Jump sprite cycle. Runs on its own, slower clock.
pub fn sprite_tick(s: &mut GameSession) {
    if s.player.jumping {
        s.player.jump_frame += 1;
        if s.player.jump_frame >= JUMP_FRAMES {
            s.player.jumping = false;
            s.player.jump_frame = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::physics::{tile_top, EMPTY_MASK};
    use crate::domain::player::SPAWN_X;
    use crate::sim::level::LevelData;
    use crate::sim::session::Tuning;

    fn empty_level() -> LevelData {
        LevelData {
            background: "test".to_string(),
            layers: Vec::new(),
            collide: EMPTY_MASK,
            coin: EMPTY_MASK,
            diamond: EMPTY_MASK,
            life: EMPTY_MASK,
            trap: EMPTY_MASK,
            coin_total: 0,
            diamond_total: 0,
            life_total: 0,
        }
    }

    fn session_with(build: impl FnOnce(&mut LevelData)) -> GameSession {
        let mut data = empty_level();
        build(&mut data);
        GameSession::start(1, data, Tuning::default())
    }

    fn run_ticks(s: &mut GameSession, n: usize) -> Vec<GameEvent> {
        let mut all = Vec::new();
        for _ in 0..n {
            all.extend(physics_tick(s));
        }
        all
    }

    /// Put the player on the ground at a given column.
    fn stand_at(s: &mut GameSession, col: usize, y: f64) {
        s.player.target_x = col as i32 * TILE_SIZE;
        s.player.x = s.player.target_x as f64;
        s.player.y = y;
        s.player.velocity_y = 0.0;
        s.player.in_air = false;
    }

    #[test]
    fn falls_from_spawn_and_lands_once() {
        // Platform under the spawn column, top edge at tile_top(15) = 120.
        let mut s = session_with(|d| d.collide[15][5] = true);
        s.player.in_air = true;
        let events = run_ticks(&mut s, 100);
        assert_eq!(s.player.y, tile_top(15));
        assert!(!s.player.in_air);
        let landings = events
            .iter()
            .filter(|e| **e == GameEvent::PlayerLanded)
            .count();
        assert_eq!(landings, 1);
    }

    #[test]
    fn coin_collected_once_per_attempt() {
        // Coin in the spawn cell (row 14, col 5), ground right below it.
        let mut s = session_with(|d| {
            d.collide[15][5] = true;
            d.coin[14][5] = true;
            d.coin_total = 1;
        });
        let events = run_ticks(&mut s, 50);
        assert_eq!(
            events
                .iter()
                .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
                .count(),
            1
        );
        assert_eq!(s.score, COIN_SCORE);
        assert!(s.ledger.all_collected(Kind::Coin));

        // A fresh attempt makes the cell collectible again.
        s.restart();
        let events = run_ticks(&mut s, 50);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::CoinCollected { .. })));
        assert_eq!(s.score, COIN_SCORE);
    }

    #[test]
    fn diamond_scores_more_than_coin() {
        let mut s = session_with(|d| {
            d.collide[15][5] = true;
            d.diamond[14][5] = true;
            d.diamond_total = 1;
        });
        run_ticks(&mut s, 20);
        assert_eq!(s.score, DIAMOND_SCORE);
    }

    #[test]
    fn trap_sends_back_to_spawn_and_costs_a_life() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
            d.trap[16][8] = true;
        });
        stand_at(&mut s, 8, tile_top(17));
        let events = physics_tick(&mut s);
        assert!(events.contains(&GameEvent::TrapHit { lives_left: 2 }));
        assert_eq!(s.lives, 2);
        assert_eq!(s.player.target_x, SPAWN_X);
        // Standing at spawn afterwards is safe.
        let events = run_ticks(&mut s, 50);
        assert!(!events
            .iter()
            .any(|e| matches!(e, GameEvent::TrapHit { .. })));
        assert_eq!(s.lives, 2);
    }

    #[test]
    fn third_trap_hit_is_game_over_and_resets_the_attempt() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
            d.trap[16][8] = true;
            d.coin[16][2] = true;
            d.coin_total = 1;
        });
        s.lives = 1;
        s.score = 70;
        assert!(s.ledger.try_collect(Kind::Coin, 16, 2));

        stand_at(&mut s, 8, tile_top(17));
        let events = physics_tick(&mut s);
        assert!(events.contains(&GameEvent::TrapHit { lives_left: 0 }));
        assert!(events.contains(&GameEvent::GameOver { score: 70 }));
        // Attempt state is rebuilt for the next run.
        assert_eq!(s.lives, 3);
        assert_eq!(s.score, 0);
        assert!(!s.ledger.is_collected(Kind::Coin, 16, 2));
    }

    #[test]
    fn extra_life_caps_at_three() {
        let mut s = session_with(|d| {
            d.collide[15][5] = true;
            d.life[14][5] = true;
            d.life_total = 1;
        });
        s.lives = 3;
        let events = run_ticks(&mut s, 20);
        assert!(events
            .iter()
            .any(|e| matches!(e, GameEvent::LifeCollected { .. })));
        assert_eq!(s.lives, 3, "pickup never exceeds the cap");
        assert_eq!(s.score, 0, "lives are not worth points");

        s.restart();
        s.lives = 1;
        run_ticks(&mut s, 20);
        assert_eq!(s.lives, 2);
    }

    #[test]
    fn walking_off_the_right_edge_completes_the_level() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
        });
        stand_at(&mut s, COLUMNS - 1, tile_top(17));
        assert!(walk(&mut s, Facing::Right));
        let events = physics_tick(&mut s);
        // Nothing left to collect, full lives: three stars.
        assert!(events.contains(&GameEvent::LevelComplete { stars: 3, score: 0 }));
    }

    #[test]
    fn walk_into_a_wall_does_nothing() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
            d.collide[16][9] = true;
        });
        stand_at(&mut s, 8, tile_top(17));
        assert!(!walk(&mut s, Facing::Right));
        assert_eq!(s.player.target_x, 8 * TILE_SIZE);
        // The other way is open.
        assert!(walk(&mut s, Facing::Left));
        assert_eq!(s.player.target_x, 7 * TILE_SIZE);
        assert_eq!(s.player.facing, Facing::Left);
    }

    #[test]
    fn jump_only_works_from_the_ground() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
        });
        stand_at(&mut s, 5, tile_top(17));
        assert_eq!(jump(&mut s), Some(GameEvent::PlayerJumped));
        assert_eq!(s.player.velocity_y, s.tuning.jump_velocity);
        assert!(s.player.in_air);
        assert!(s.player.jumping);
        assert_eq!(jump(&mut s), None, "no mid-air jumps");
    }

    #[test]
    fn sprite_cycle_ends_the_jump_animation() {
        let mut s = session_with(|_| {});
        s.player.jumping = true;
        s.player.jump_frame = 0;
        for _ in 0..JUMP_FRAMES {
            sprite_tick(&mut s);
        }
        assert!(!s.player.jumping);
        assert_eq!(s.player.jump_frame, 0);
        // Idle once the cycle is over.
        sprite_tick(&mut s);
        assert!(!s.player.jumping);
    }

    #[test]
    fn visual_x_approaches_target() {
        let mut s = session_with(|d| {
            for c in 0..COLUMNS {
                d.collide[17][c] = true;
            }
        });
        stand_at(&mut s, 5, tile_top(17));
        assert!(walk(&mut s, Facing::Right));
        assert!(!s.player.settled());
        for _ in 0..10 {
            animation_tick(&mut s);
            assert!(s.player.x <= s.player.target_x as f64);
        }
        assert!(s.player.settled());
    }
}
