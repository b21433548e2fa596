/// Collision resolution against the collide mask.
///
/// Movement model is hybrid:
///   - VERTICAL is continuous: velocity integrated under gravity each
///     physics tick, then resolved one tile-step at a time against the
///     screen bounds and the collide mask.
///   - HORIZONTAL is discrete: a directional key press either advances
///     the authoritative `target_x` by exactly one tile or does nothing.
///     The visual `x` catches up separately (`approach`).
///
/// Column lookups always use `target_x`, never the interpolated `x`, so
/// collision decisions are based on the tile the player is committed to
/// occupying, not a transient visual position.

use super::player::{Facing, Player};
use super::{COLUMNS, HEIGHT, ROWS, TILE_SIZE};

/// Boolean per-cell grid derived from the level layers.
pub type CellMask = [[bool; COLUMNS]; ROWS];

pub const EMPTY_MASK: CellMask = [[false; COLUMNS]; ROWS];

/// Grid row (0 = top) containing the pixel height `y`.
/// Out-of-range for y outside [0, HEIGHT).
pub fn row_at(y: f64) -> i32 {
    (ROWS as i32 - 1) - (y / TILE_SIZE as f64) as i32
}

/// Bottom pixel edge of a grid row.
pub fn tile_bottom(row: usize) -> f64 {
    ((ROWS - row - 1) as i32 * TILE_SIZE) as f64
}

/// Top pixel edge of a grid row.
pub fn tile_top(row: usize) -> f64 {
    tile_bottom(row) + TILE_SIZE as f64
}

/// Outcome of one vertical resolution step.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum VerticalHit {
    Clear,
    Floor,
    Ceiling,
}

/// Move the player vertically by `delta_y`, clamping against the screen
/// bounds first and then the collide mask.
///
/// Cell below colliding: snap `y` to that tile's top edge, zero the
/// velocity, clear `in_air`. Cell above colliding: symmetric clamp to
/// its bottom edge without clearing `in_air`. Otherwise commit the move.
pub fn resolve_vertical(p: &mut Player, collide: &CellMask, delta_y: f64) -> VerticalHit {
    // Screen bounds first.
    if p.y + delta_y < 0.0 {
        p.y = 0.0;
        p.velocity_y = 0.0;
        p.in_air = false;
        return VerticalHit::Floor;
    }
    if p.y + p.height + delta_y > HEIGHT as f64 {
        p.y = HEIGHT as f64 - p.height;
        p.velocity_y = 0.0;
        return VerticalHit::Ceiling;
    }

    let next = p.y + delta_y;
    let col = p.target_x / TILE_SIZE;
    let row = row_at(next);
    if !(0..ROWS as i32).contains(&row) || !(0..COLUMNS as i32).contains(&col) {
        // Past the right boundary (level exit run-out): nothing to hit.
        p.y = next;
        return VerticalHit::Clear;
    }
    let (row, col) = (row as usize, col as usize);

    if collide[row][col] {
        let top = tile_top(row);
        if next < top {
            p.y = top;
            p.velocity_y = 0.0;
            p.in_air = false;
            return VerticalHit::Floor;
        }
    } else if row > 0 && collide[row - 1][col] {
        // Head entering the cell above.
        let limit = tile_bottom(row);
        if next > limit {
            p.y = limit;
            p.velocity_y = 0.0;
            return VerticalHit::Ceiling;
        }
    }

    p.y = next;
    VerticalHit::Clear
}

/// Legality of a one-tile horizontal step from `target_x` in `dir`,
/// checked against the collide mask at grid row `row`.
///
/// Returns the new target on success. Stepping past the left screen
/// edge is refused; stepping past the RIGHT edge is allowed — that is
/// how the level exit is reached.
pub fn horizontal_step(
    collide: &CellMask,
    target_x: i32,
    row: i32,
    dir: Facing,
) -> Option<i32> {
    let next = match dir {
        Facing::Left => target_x - TILE_SIZE,
        Facing::Right => target_x + TILE_SIZE,
    };
    if next < 0 {
        return None;
    }
    let col = next / TILE_SIZE;
    if col >= COLUMNS as i32 {
        return Some(next);
    }
    if (0..ROWS as i32).contains(&row) && collide[row as usize][col as usize] {
        return None;
    }
    Some(next)
}

/// One animation step of the visual `x` toward `target_x`.
/// Clamps at the target — never overshoots.
pub fn approach(x: f64, target_x: i32, step: f64) -> f64 {
    let t = target_x as f64;
    if (t - x).abs() <= step {
        t
    } else if x < t {
        x + step
    } else {
        x - step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask_with(cells: &[(usize, usize)]) -> CellMask {
        let mut m = EMPTY_MASK;
        for &(r, c) in cells {
            m[r][c] = true;
        }
        m
    }

    fn falling_player(y: f64, target_x: i32) -> Player {
        let mut p = Player::new();
        p.y = y;
        p.x = target_x as f64;
        p.target_x = target_x;
        p.in_air = true;
        p
    }

    #[test]
    fn row_col_geometry() {
        assert_eq!(row_at(0.0), 17);
        assert_eq!(row_at(39.9), 17);
        assert_eq!(row_at(40.0), 16);
        assert_eq!(row_at(679.9), 1);
        // Row 5 spans [480, 520).
        assert_eq!(tile_bottom(5), 480.0);
        assert_eq!(tile_top(5), 520.0);
    }

    #[test]
    fn snaps_to_collider_top() {
        // Collider at row 5, col 0; player falling into it.
        let m = mask_with(&[(5, 0)]);
        let mut p = falling_player(560.0, 0);
        p.velocity_y = -60.0;
        let hit = resolve_vertical(&mut p, &m, -50.0);
        assert_eq!(hit, VerticalHit::Floor);
        assert_eq!(p.y, tile_top(5));
        assert_eq!(p.velocity_y, 0.0);
        assert!(!p.in_air);
    }

    #[test]
    fn gravity_settles_exactly_on_tile_top() {
        // Collider at row 5, col 0; player one tile above, falling under
        // gravity. y must settle at (ROWS-5-1)*TILE_SIZE + TILE_SIZE.
        let m = mask_with(&[(5, 0)]);
        let mut p = falling_player(560.0, 0);
        for _ in 0..200 {
            p.velocity_y -= 40.0 * 0.08;
            let dy = p.velocity_y * 0.08;
            resolve_vertical(&mut p, &m, dy);
        }
        assert_eq!(p.y, ((ROWS - 5 - 1) as i32 * TILE_SIZE + TILE_SIZE) as f64);
        assert_eq!(p.velocity_y, 0.0);
        assert!(!p.in_air);
    }

    #[test]
    fn ceiling_clamp_keeps_in_air() {
        // Collider at row 3, col 0; player jumping into it from below.
        let m = mask_with(&[(3, 0)]);
        let mut p = falling_player(500.0, 0);
        p.velocity_y = 80.0;
        let hit = resolve_vertical(&mut p, &m, 30.0);
        assert_eq!(hit, VerticalHit::Ceiling);
        assert_eq!(p.y, tile_bottom(4));
        assert_eq!(p.velocity_y, 0.0);
        assert!(p.in_air, "hitting a ceiling does not end the jump");
    }

    #[test]
    fn floor_bound_clamps_and_grounds() {
        let mut p = falling_player(10.0, 0);
        p.velocity_y = -50.0;
        let hit = resolve_vertical(&mut p, &EMPTY_MASK, -20.0);
        assert_eq!(hit, VerticalHit::Floor);
        assert_eq!(p.y, 0.0);
        assert_eq!(p.velocity_y, 0.0);
        assert!(!p.in_air);
    }

    #[test]
    fn ceiling_bound_clamps() {
        let mut p = falling_player(660.0, 0);
        p.velocity_y = 90.0;
        let hit = resolve_vertical(&mut p, &EMPTY_MASK, 40.0);
        assert_eq!(hit, VerticalHit::Ceiling);
        assert_eq!(p.y, HEIGHT as f64 - p.height);
        assert_eq!(p.velocity_y, 0.0);
    }

    #[test]
    fn free_fall_commits_delta() {
        let mut p = falling_player(400.0, 0);
        let hit = resolve_vertical(&mut p, &EMPTY_MASK, -25.0);
        assert_eq!(hit, VerticalHit::Clear);
        assert_eq!(p.y, 375.0);
    }

    #[test]
    fn collision_column_uses_target_not_visual_x() {
        // Visual x is over col 1 but target is col 0 — only col 0 matters.
        let m = mask_with(&[(5, 1)]);
        let mut p = falling_player(530.0, 0);
        p.x = 50.0;
        let hit = resolve_vertical(&mut p, &m, -20.0);
        assert_eq!(hit, VerticalHit::Clear);
        assert_eq!(p.y, 510.0);
    }

    #[test]
    fn horizontal_step_blocked_by_collider() {
        let m = mask_with(&[(5, 6)]);
        assert_eq!(horizontal_step(&m, 5 * TILE_SIZE, 5, Facing::Right), None);
        // Same step is fine on a different row.
        assert_eq!(
            horizontal_step(&m, 5 * TILE_SIZE, 6, Facing::Right),
            Some(6 * TILE_SIZE)
        );
    }

    #[test]
    fn horizontal_step_clamped_at_left_edge() {
        assert_eq!(horizontal_step(&EMPTY_MASK, 0, 10, Facing::Left), None);
    }

    #[test]
    fn horizontal_step_allowed_past_right_edge() {
        // Walking off the right edge is the level exit.
        let last_col = (COLUMNS as i32 - 1) * TILE_SIZE;
        assert_eq!(
            horizontal_step(&EMPTY_MASK, last_col, 10, Facing::Right),
            Some(COLUMNS as i32 * TILE_SIZE)
        );
    }

    #[test]
    fn approach_never_overshoots() {
        let mut x = 80.0;
        let target = 120;
        for _ in 0..100 {
            x = approach(x, target, 6.0);
            assert!(x <= target as f64);
        }
        assert_eq!(x, 120.0);
        // And from the right.
        assert_eq!(approach(123.0, 120, 6.0), 120.0);
    }
}
