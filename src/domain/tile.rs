/// Packed tile id codec.
///
/// Level layer CSVs store one signed 32-bit integer per cell, with the
/// editor's flip flags packed into the high bits:
///
///   bit 31 — flipped horizontally
///   bit 30 — flipped vertically
///   bit 28 — collider (player-blocking)
///   rest   — base tile id into the tilesheet
///
/// `-1` marks an empty cell. Any other value is accepted as-is: an id
/// outside the tilesheet is treated as a normal tile, never rejected.
///
/// Tile semantics (which ids are coins, traps, ...) are queried via
/// methods here, not stored as flags, so they stay centralized.

pub const FLIP_H_FLAG: u32 = 0x8000_0000;
pub const FLIP_V_FLAG: u32 = 0x4000_0000;
pub const COLLIDE_FLAG: u32 = 0x1000_0000;
const FLAG_MASK: u32 = FLIP_H_FLAG | FLIP_V_FLAG | COLLIDE_FLAG;

/// Raw value of an empty cell.
pub const EMPTY_SENTINEL: i32 = -1;

// ── Special base ids in the tilesheet ──

pub const COIN_ID: i32 = 151;
pub const DIAMOND_ID: i32 = 152;
pub const LIFE_ID: i32 = 153;

/// Hazard tiles (spike variants). Compiled-in id set.
pub const TRAP_IDS: &[i32] = &[160, 161, 162, 163];

/// One decoded grid cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileCell {
    #[default]
    Empty,
    Tile(TileRef),
}

/// A placed tile: base id plus render/collision flags.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TileRef {
    pub id: i32,
    pub flip_h: bool,
    pub flip_v: bool,
    pub collides: bool,
}

impl TileCell {
    /// Decode a raw packed id from a layer file.
    pub fn decode(raw: i32) -> Self {
        if raw == EMPTY_SENTINEL {
            return TileCell::Empty;
        }
        let bits = raw as u32;
        TileCell::Tile(TileRef {
            id: (bits & !FLAG_MASK) as i32,
            flip_h: bits & FLIP_H_FLAG != 0,
            flip_v: bits & FLIP_V_FLAG != 0,
            collides: bits & COLLIDE_FLAG != 0,
        })
    }

    /// Re-pack into a raw id. The collider bit is derived data in the
    /// level pipeline and is not re-emitted.
    pub fn encode(self) -> i32 {
        match self {
            TileCell::Empty => EMPTY_SENTINEL,
            TileCell::Tile(t) => {
                let mut bits = t.id as u32;
                if t.flip_h {
                    bits |= FLIP_H_FLAG;
                }
                if t.flip_v {
                    bits |= FLIP_V_FLAG;
                }
                bits as i32
            }
        }
    }

    pub fn is_empty(self) -> bool {
        self == TileCell::Empty
    }

    /// Does this cell block the player?
    pub fn collides(self) -> bool {
        matches!(self, TileCell::Tile(t) if t.collides)
    }

    pub fn is_coin(self) -> bool {
        matches!(self, TileCell::Tile(t) if t.id == COIN_ID)
    }

    pub fn is_diamond(self) -> bool {
        matches!(self, TileCell::Tile(t) if t.id == DIAMOND_ID)
    }

    pub fn is_life(self) -> bool {
        matches!(self, TileCell::Tile(t) if t.id == LIFE_ID)
    }

    pub fn is_trap(self) -> bool {
        matches!(self, TileCell::Tile(t) if TRAP_IDS.contains(&t.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sentinel_round_trip() {
        assert_eq!(TileCell::decode(-1), TileCell::Empty);
        assert_eq!(TileCell::Empty.encode(), -1);
    }

    #[test]
    fn decode_extracts_flags_and_id() {
        let raw = (42u32 | FLIP_H_FLAG | COLLIDE_FLAG) as i32;
        match TileCell::decode(raw) {
            TileCell::Tile(t) => {
                assert_eq!(t.id, 42);
                assert!(t.flip_h);
                assert!(!t.flip_v);
                assert!(t.collides);
            }
            TileCell::Empty => panic!("expected a tile"),
        }
    }

    #[test]
    fn round_trip_drops_collider_bit() {
        // Any raw id other than the sentinel: decode then re-encode must
        // reproduce base id + flip flags, with the collider bit gone.
        let cases = [
            7,
            (7u32 | FLIP_H_FLAG) as i32,
            (150u32 | FLIP_V_FLAG) as i32,
            (89u32 | FLIP_H_FLAG | FLIP_V_FLAG) as i32,
            (12u32 | COLLIDE_FLAG) as i32,
            (12u32 | FLIP_H_FLAG | FLIP_V_FLAG | COLLIDE_FLAG) as i32,
        ];
        for raw in cases {
            let cell = TileCell::decode(raw);
            let expected = (raw as u32 & !COLLIDE_FLAG) as i32;
            assert_eq!(cell.encode(), expected, "raw = {raw:#x}");
        }
    }

    #[test]
    fn unknown_ids_are_accepted() {
        // Malformed ids are silently treated as normal tiles.
        let cell = TileCell::decode(999_999);
        assert!(!cell.is_empty());
        assert!(!cell.collides());
        assert!(!cell.is_coin());
    }

    #[test]
    fn category_queries() {
        assert!(TileCell::decode(COIN_ID).is_coin());
        assert!(TileCell::decode(DIAMOND_ID).is_diamond());
        assert!(TileCell::decode(LIFE_ID).is_life());
        assert!(TileCell::decode(TRAP_IDS[0]).is_trap());
        assert!(!TileCell::decode(COIN_ID).is_trap());
        assert!(!TileCell::Empty.is_coin());
    }
}
