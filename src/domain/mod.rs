/// Core game domain: tile codec, player state, collision physics,
/// progression rules. Pure logic — no I/O, no terminal.

pub mod physics;
pub mod player;
pub mod rules;
pub mod tile;

// ── World geometry ──
//
// The screen is a fixed 1280×720 pixel space divided into 40px tiles.
// y grows upward from the bottom of the screen; grid row 0 is the TOP
// row, so `row = (ROWS - 1) - y / TILE_SIZE`.

pub const WIDTH: i32 = 1280;
pub const HEIGHT: i32 = 720;
pub const COLUMNS: usize = 32;
pub const ROWS: usize = 18;
pub const TILE_SIZE: i32 = WIDTH / COLUMNS as i32;
