/// Level store.
///
/// ## On-disk format
///   `levels/level<N>/metadata.txt`
///       `<layerCount> <backgroundThemeName>` (whitespace-separated)
///   `levels/level<N>/layer_<L>_customized.csv`
///       ROWS lines, each COLUMNS comma-separated packed tile ids
///       (see `domain::tile` for the bit layout).
///
/// A level stacks up to MAX_LAYERS layers (background decoration under
/// collidable terrain, etc.). Loading rebuilds everything from scratch —
/// grids, derived masks, totals — and never patches state incrementally.
/// A missing or malformed file fails the whole load; the caller keeps
/// whatever level it had before.
///
/// Wrong-shape layer files (row/column count mismatch) fail fast with a
/// shape error rather than silently under/over-populating the grid.
///
/// ## Built-in fallback
/// Five levels are embedded as ASCII maps and encoded through the same
/// codec + parser as disk levels, so the game runs without a `levels/`
/// directory and the fallback path exercises the real pipeline.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::physics::{CellMask, EMPTY_MASK};
use crate::domain::tile::{self, TileCell};
use crate::domain::{COLUMNS, ROWS};

pub const MAX_LAYERS: usize = 10;
pub const LEVEL_COUNT: usize = 5;

/// One decoded layer grid. Row 0 is the top of the screen.
pub type Grid = [[TileCell; COLUMNS]; ROWS];

const EMPTY_GRID: Grid = [[TileCell::Empty; COLUMNS]; ROWS];

/// A fully loaded level: decoded layers plus the five derived masks.
///
/// The masks are derived data, never the source of truth; they are
/// recomputed from the layers on every load.
#[derive(Clone, Debug)]
pub struct LevelData {
    pub background: String,
    pub layers: Vec<Grid>,

    pub collide: CellMask,
    pub coin: CellMask,
    pub diamond: CellMask,
    pub life: CellMask,
    pub trap: CellMask,

    pub coin_total: usize,
    pub diamond_total: usize,
    pub life_total: usize,
}

impl LevelData {
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Topmost non-empty cell across layers, for rendering.
    pub fn top_cell(&self, row: usize, col: usize) -> TileCell {
        for layer in self.layers.iter().rev() {
            let cell = layer[row][col];
            if !cell.is_empty() {
                return cell;
            }
        }
        TileCell::Empty
    }

    /// Derive the five masks by OR-ing categories across all layers.
    fn assemble(background: String, layers: Vec<Grid>) -> Self {
        let mut data = LevelData {
            background,
            layers,
            collide: EMPTY_MASK,
            coin: EMPTY_MASK,
            diamond: EMPTY_MASK,
            life: EMPTY_MASK,
            trap: EMPTY_MASK,
            coin_total: 0,
            diamond_total: 0,
            life_total: 0,
        };
        for layer in &data.layers {
            for (r, row) in layer.iter().enumerate() {
                for (c, &cell) in row.iter().enumerate() {
                    if cell.collides() {
                        data.collide[r][c] = true;
                    }
                    if cell.is_coin() {
                        data.coin[r][c] = true;
                    }
                    if cell.is_diamond() {
                        data.diamond[r][c] = true;
                    }
                    if cell.is_life() {
                        data.life[r][c] = true;
                    }
                    if cell.is_trap() {
                        data.trap[r][c] = true;
                    }
                }
            }
        }
        data.coin_total = count_mask(&data.coin);
        data.diamond_total = count_mask(&data.diamond);
        data.life_total = count_mask(&data.life);
        data
    }
}

fn count_mask(mask: &CellMask) -> usize {
    mask.iter().flatten().filter(|&&b| b).count()
}

// ══════════════════════════════════════════════════════════════
// Loading
// ══════════════════════════════════════════════════════════════

/// Load a level from disk. Fails caller-visibly (missing file, bad
/// metadata, wrong-shape layer) without touching any prior state.
pub fn load(levels_dir: &Path, level: usize) -> Result<LevelData, String> {
    let dir = levels_dir.join(format!("level{level}"));

    let meta_path = dir.join("metadata.txt");
    let meta = fs::read_to_string(&meta_path)
        .map_err(|e| format!("{}: {e}", meta_path.display()))?;
    let (layer_count, background) = parse_metadata(&meta)?;

    let mut layers = Vec::with_capacity(layer_count);
    for l in 0..layer_count {
        let path = dir.join(format!("layer_{l}_customized.csv"));
        let text = fs::read_to_string(&path)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        let grid = parse_layer(&text).map_err(|e| format!("{}: {e}", path.display()))?;
        layers.push(grid);
    }

    Ok(LevelData::assemble(background, layers))
}

/// Disk first, built-in fallback. The fallback keeps the game playable
/// with no `levels/` directory at all.
pub fn load_or_builtin(levels_dir: &Path, level: usize) -> Result<LevelData, String> {
    match load(levels_dir, level) {
        Ok(data) => Ok(data),
        Err(disk_err) => match builtin(level) {
            Some(data) => {
                eprintln!("level {level}: {disk_err}; using built-in level");
                Ok(data)
            }
            None => Err(disk_err),
        },
    }
}

/// `<layerCount> <backgroundThemeName>`
fn parse_metadata(text: &str) -> Result<(usize, String), String> {
    let mut parts = text.split_whitespace();
    let layer_count: usize = parts
        .next()
        .ok_or("metadata: missing layer count")?
        .parse()
        .map_err(|e| format!("metadata: bad layer count: {e}"))?;
    if layer_count == 0 || layer_count > MAX_LAYERS {
        return Err(format!(
            "metadata: layer count {layer_count} outside 1..={MAX_LAYERS}"
        ));
    }
    let background = parts
        .next()
        .ok_or("metadata: missing background theme")?
        .to_string();
    Ok((layer_count, background))
}

/// Parse one layer CSV into a decoded grid.
/// The shape is validated strictly: exactly ROWS lines of COLUMNS cells.
fn parse_layer(text: &str) -> Result<Grid, String> {
    let mut grid = EMPTY_GRID;
    let mut rows = 0usize;

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        if rows >= ROWS {
            return Err(format!("more than {ROWS} rows"));
        }
        let mut cols = 0usize;
        for cell in line.split(',') {
            if cols >= COLUMNS {
                return Err(format!("row {}: more than {COLUMNS} columns", lineno + 1));
            }
            let raw: i32 = cell
                .trim()
                .parse()
                .map_err(|e| format!("row {}: bad cell {cell:?}: {e}", lineno + 1))?;
            grid[rows][cols] = TileCell::decode(raw);
            cols += 1;
        }
        if cols != COLUMNS {
            return Err(format!(
                "row {}: {cols} columns, expected {COLUMNS}",
                lineno + 1
            ));
        }
        rows += 1;
    }

    if rows != ROWS {
        return Err(format!("{rows} rows, expected {ROWS}"));
    }
    Ok(grid)
}

// ══════════════════════════════════════════════════════════════
// Built-in levels
// ══════════════════════════════════════════════════════════════
//
// ASCII legend:
//   '#' collider terrain    'o' coin      'd' diamond
//   '+' extra life          '^' trap      ' ' empty
//
// The maps are encoded to packed-id CSV and fed through parse_layer,
// so they travel the same path as disk levels.

/// Built-in level for a 1-based level number, if one exists.
pub fn builtin(level: usize) -> Option<LevelData> {
    let (theme, map) = builtin_map(level)?;
    let csv = map_to_csv(map);
    // The maps are compile-time constants; a parse failure here is a bug.
    let grid = match parse_layer(&csv) {
        Ok(g) => g,
        Err(e) => {
            eprintln!("built-in level {level} failed to parse: {e}");
            return None;
        }
    };
    Some(LevelData::assemble(theme.to_string(), vec![grid]))
}

fn char_to_raw(c: char) -> i32 {
    match c {
        '#' => (1u32 | tile::COLLIDE_FLAG) as i32,
        'o' => tile::COIN_ID,
        'd' => tile::DIAMOND_ID,
        '+' => tile::LIFE_ID,
        '^' => tile::TRAP_IDS[0],
        _ => tile::EMPTY_SENTINEL,
    }
}

fn map_to_csv(map: [&str; ROWS]) -> String {
    let mut out = String::new();
    for row in map {
        let mut cells = row.chars().map(char_to_raw).collect::<Vec<_>>();
        cells.resize(COLUMNS, tile::EMPTY_SENTINEL);
        cells.truncate(COLUMNS);
        for (i, raw) in cells.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            let _ = write!(out, "{raw}");
        }
        out.push('\n');
    }
    out
}

#[rustfmt::skip]
fn builtin_map(level: usize) -> Option<(&'static str, [&'static str; ROWS])> {
    // Spawn is row 14, col 5 (x = 200, y = 150): keep that cell clear
    // and give it ground to land on. A jump clears about three rows, so
    // platform tiers are spaced three rows apart (14, 11, 8, 5).
    match level {
        1 => Some(("meadow", [
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "        oo d",
            "       #####",
            "",
            "                  o  o",
            "                 ######",
            "",
            "   o       o      ^    o     o",
            "################################",
        ])),
        2 => Some(("cavern", [
            "",
            "",
            "",
            "",
            "",
            "",
            "",
            "             d",
            "            #####",
            "",
            "      o o",
            "     #####",
            "",
            "                    o o",
            "                   ######",
            "",
            "  o    ^     o    ^     o   +",
            "################################",
        ])),
        3 => Some(("summit", [
            "",
            "",
            "",
            "",
            "                      o d",
            "                     #####",
            "",
            "                o o",
            "               ####",
            "",
            "          o o",
            "         ####",
            "",
            " o o",
            " ###",
            "",
            "                  ^       ^  o",
            "################################",
        ])),
        4 => Some(("ruins", [
            "",
            "",
            "",
            "",
            "     +",
            "    #####",
            "",
            "           o d",
            "          ####",
            "",
            "                 o  o",
            "                ####",
            "",
            "                        o o",
            "                        ####",
            "",
            "  o   ^    o   ^    o   ^   o",
            "################################",
        ])),
        5 => Some(("night", [
            "",
            "",
            "",
            "",
            "         d  +",
            "        ######",
            "",
            "                     o o",
            "                    #####",
            "",
            "               o o",
            "              ####",
            "",
            "         o o",
            "        ####",
            "",
            " o  ^   o   ^   o   ^   o   ^ o",
            "################################",
        ])),
        _ => None,
    }
}
