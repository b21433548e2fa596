/// Player state.
///
/// Two horizontal positions are kept on purpose:
///   - `target_x` — the authoritative destination, always a multiple of
///     TILE_SIZE. Moves by exactly one tile the instant a legal step is
///     requested. All collision and pickup lookups use this.
///   - `x` — the visual position, animated toward `target_x` by a fixed
///     pixel step each animation tick. Never used for game decisions.
///
/// Invariant: once the approach completes, `x == target_x as f64`.

use super::TILE_SIZE;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

/// Fixed spawn point. x is tile-aligned (200 = 5 * TILE_SIZE).
pub const SPAWN_X: i32 = 200;
pub const SPAWN_Y: f64 = 150.0;

/// Frames in the jump animation cycle.
pub const JUMP_FRAMES: u8 = 5;

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f64,
    pub y: f64,
    pub target_x: i32,
    pub velocity_y: f64,
    pub in_air: bool,
    pub jumping: bool,
    pub jump_frame: u8,
    pub facing: Facing,
    pub width: f64,
    pub height: f64,
}

impl Player {
    pub fn new() -> Self {
        Player {
            x: SPAWN_X as f64,
            y: SPAWN_Y,
            target_x: SPAWN_X,
            velocity_y: 0.0,
            in_air: false,
            jumping: false,
            jump_frame: 0,
            facing: Facing::Right,
            width: TILE_SIZE as f64,
            height: TILE_SIZE as f64,
        }
    }

    /// Back to spawn: position, velocity, and animation flags.
    /// Used on trap hit and on level (re)entry.
    pub fn reset_to_spawn(&mut self) {
        self.x = SPAWN_X as f64;
        self.y = SPAWN_Y;
        self.target_x = SPAWN_X;
        self.velocity_y = 0.0;
        self.in_air = false;
        self.jumping = false;
        self.jump_frame = 0;
        self.facing = Facing::Right;
    }

    /// Has the visual position caught up with the authoritative one?
    pub fn settled(&self) -> bool {
        self.x == self.target_x as f64
    }
}

impl Default for Player {
    fn default() -> Self {
        Player::new()
    }
}
