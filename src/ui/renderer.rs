/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// Each frame is composed into the `front` buffer, diffed against the
/// `back` buffer (previous frame), and only changed cells are emitted,
/// batched with `queue!` and flushed once. Full redraws flicker on slow
/// terminals; this does not.
///
/// The 1280x720 world maps onto a 64x18 character grid: one 40px tile
/// is two terminal columns wide and one row tall.

use std::io::{self, BufWriter, Stdout, Write};

use crossterm::{
    cursor::{self, MoveTo},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::player::Facing;
use crate::domain::tile::TileCell;
use crate::domain::{COLUMNS, ROWS, TILE_SIZE};
use crate::sim::ledger::Kind;
use crate::sim::level::LEVEL_COUNT;
use crate::sim::session::{GameSession, MAX_LIVES};
use crate::ui::app::{App, Page};

/// Screen buffer dimensions in terminal cells.
const BUF_W: usize = 64;
const BUF_H: usize = 22;

/// Buffer row of grid row 0.
const GRID_TOP: usize = 2;
const MESSAGE_ROW: usize = 20;
const HELP_ROW: usize = 21;

const BASE_BG: Color = Color::Rgb { r: 18, g: 18, b: 28 };

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::White,
    bg: BASE_BG,
};

/// Different from any real cell, so a full diff follows.
const INVALID: Cell = Cell {
    ch: '?',
    fg: Color::Magenta,
    bg: Color::Magenta,
};

struct Buffer {
    cells: Vec<Cell>,
}

impl Buffer {
    fn new(fill: Cell) -> Self {
        Buffer {
            cells: vec![fill; BUF_W * BUF_H],
        }
    }

    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < BUF_W && y < BUF_H {
            self.cells[y * BUF_W + x] = cell;
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color, bg: Color) {
        for (i, ch) in s.chars().enumerate() {
            self.set(x + i, y, Cell { ch, fg, bg });
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color, bg: Color) {
        let len = s.chars().count();
        let x = (BUF_W.saturating_sub(len)) / 2;
        self.put_str(x, y, s, fg, bg);
    }
}

pub struct Renderer {
    out: BufWriter<Stdout>,
    front: Buffer,
    back: Buffer,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            out: BufWriter::new(io::stdout()),
            front: Buffer::new(BLANK),
            back: Buffer::new(INVALID),
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        queue!(
            self.out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All),
        )?;
        self.out.flush()
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen,
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, app: &App) -> io::Result<()> {
        self.front.clear();
        match app.page {
            Page::Menu => self.compose_menu(app),
            Page::NamePrompt => self.compose_name_prompt(app),
            Page::LevelSelect => self.compose_level_select(app),
            Page::HighScores => self.compose_high_scores(app),
            Page::Options => self.compose_options(app),
            Page::Playing => self.compose_game(app),
            Page::LevelClear => self.compose_level_clear(app),
            Page::GameOver => self.compose_game_over(app),
        }
        if !app.message.is_empty() {
            self.front
                .put_centered(MESSAGE_ROW, &app.message, Color::Yellow, BASE_BG);
        }
        self.flush_diff()
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::Reset;
        let mut last_bg = Color::Reset;
        let mut cursor_at: Option<(usize, usize)> = None;

        for y in 0..BUF_H {
            for x in 0..BUF_W {
                let idx = y * BUF_W + x;
                let cell = self.front.cells[idx];
                if cell == self.back.cells[idx] {
                    continue;
                }
                if cursor_at != Some((x, y)) {
                    queue!(self.out, MoveTo(x as u16, y as u16))?;
                }
                if cell.fg != last_fg {
                    queue!(self.out, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.out, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.out, Print(cell.ch))?;
                cursor_at = Some((x + 1, y));
            }
        }

        self.out.flush()?;
        std::mem::swap(&mut self.front.cells, &mut self.back.cells);
        Ok(())
    }

    // ══════════════════════════════════════════════════════════
    //  Game page
    // ══════════════════════════════════════════════════════════

    fn compose_game(&mut self, app: &App) {
        let s = match app.session.as_ref() {
            Some(s) => s,
            None => return,
        };

        self.compose_hud(s);
        let terrain = theme_color(&s.level.background);

        for r in 0..ROWS {
            for c in 0..COLUMNS {
                let cell = s.level.top_cell(r, c);
                let (glyphs, fg) = match tile_look(cell, r, c, s) {
                    Some(look) => look,
                    None => continue,
                };
                let fg = if cell.collides() { terrain } else { fg };
                let x = c * 2;
                let y = GRID_TOP + r;
                self.front.set(x, y, Cell { ch: glyphs.0, fg, bg: BASE_BG });
                self.front.set(x + 1, y, Cell { ch: glyphs.1, fg, bg: BASE_BG });
            }
        }

        self.compose_player(s);

        if app.paused {
            self.front.put_centered(
                GRID_TOP + ROWS / 2,
                "  P A U S E D  ",
                Color::Black,
                Color::Yellow,
            );
        }

        self.front.put_str(
            0,
            HELP_ROW,
            "arrows move  space jump  [p] pause  [esc] menu",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_hud(&mut self, s: &GameSession) {
        let hud = format!(
            "LEVEL {}  SCORE {:>5}  COINS {:>2}  GEMS {}",
            s.level_number,
            s.score,
            s.ledger.remaining(Kind::Coin),
            s.ledger.remaining(Kind::Diamond),
        );
        self.front.put_str(0, 0, &hud, Color::White, BASE_BG);

        let mut x = BUF_W - 2 * MAX_LIVES as usize;
        for i in 0..MAX_LIVES {
            let fg = if i < s.lives { Color::Red } else { Color::DarkGrey };
            self.front.set(x, 0, Cell { ch: '♥', fg, bg: BASE_BG });
            x += 2;
        }
    }

    fn compose_player(&mut self, s: &GameSession) {
        // Visual x interpolates between tiles; round to the half-tile.
        let px = ((s.player.x / (TILE_SIZE as f64 / 2.0)).round() as i32).clamp(0, BUF_W as i32 - 2);
        let row = (ROWS as i32 - 1) - (s.player.y as i32) / TILE_SIZE;
        if !(0..ROWS as i32).contains(&row) {
            return;
        }
        let y = GRID_TOP + row as usize;
        let body = if s.player.jumping { '◇' } else { '◆' };
        let (a, b) = match s.player.facing {
            Facing::Right => (body, '›'),
            Facing::Left => ('‹', body),
        };
        let fg = Color::Cyan;
        self.front.set(px as usize, y, Cell { ch: a, fg, bg: BASE_BG });
        self.front.set(px as usize + 1, y, Cell { ch: b, fg, bg: BASE_BG });
    }

    // ══════════════════════════════════════════════════════════
    //  Frontend pages
    // ══════════════════════════════════════════════════════════

    fn compose_menu(&mut self, app: &App) {
        self.front
            .put_centered(2, "T I L E B O U N D", Color::Cyan, BASE_BG);
        self.front.put_centered(
            4,
            &format!("player: {}", app.player_name),
            Color::DarkGrey,
            BASE_BG,
        );

        for (i, item) in MENU_ITEMS.iter().enumerate() {
            let y = 7 + i * 2;
            if i == app.menu_cursor {
                self.front.put_centered(
                    y,
                    &format!("> {item} <"),
                    Color::Yellow,
                    BASE_BG,
                );
            } else {
                self.front.put_centered(y, item, Color::White, BASE_BG);
            }
        }

        self.front.put_str(
            0,
            HELP_ROW,
            "↑/↓ select  enter confirm  [esc] quit",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_name_prompt(&mut self, app: &App) {
        self.front
            .put_centered(6, "Who is playing?", Color::White, BASE_BG);
        // Blinking underscore caret.
        let caret = if app.anim_tick / 30 % 2 == 0 { "_" } else { " " };
        self.front.put_centered(
            9,
            &format!("[ {}{caret} ]", app.name_input),
            Color::Yellow,
            BASE_BG,
        );
        self.front.put_centered(
            12,
            "letters and digits, enter to confirm",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_level_select(&mut self, app: &App) {
        self.front
            .put_centered(2, "SELECT LEVEL", Color::Cyan, BASE_BG);
        let record = app.scores.best_for(&app.player_name);
        for level in 1..=LEVEL_COUNT {
            let best = record.map(|r| r.best[level - 1]).unwrap_or_default();
            let line = format!(
                "Level {}   {}   best {:>5}",
                level,
                stars_glyph(best.stars),
                best.score,
            );
            let y = 5 + (level - 1) * 2;
            if level - 1 == app.level_cursor {
                self.front
                    .put_centered(y, &format!("> {line} <"), Color::Yellow, BASE_BG);
            } else {
                self.front.put_centered(y, &line, Color::White, BASE_BG);
            }
        }
        self.front.put_str(
            0,
            HELP_ROW,
            "↑/↓ select  enter play  [esc] back",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_high_scores(&mut self, app: &App) {
        self.front
            .put_centered(1, "HIGH SCORES", Color::Cyan, BASE_BG);
        self.front.put_str(
            4,
            3,
            "PLAYER        STARS   TOTAL   PER LEVEL",
            Color::DarkGrey,
            BASE_BG,
        );

        // Best players first.
        let mut players: Vec<_> = app.scores.players().iter().collect();
        players.sort_by_key(|p| {
            let stars: u32 = p.best.iter().map(|b| b.stars as u32).sum();
            let score: u32 = p.best.iter().map(|b| b.score).sum();
            std::cmp::Reverse((stars, score))
        });

        for (i, p) in players.iter().take(14).enumerate() {
            let stars: u32 = p.best.iter().map(|b| b.stars as u32).sum();
            let total: u32 = p.best.iter().map(|b| b.score).sum();
            let per_level = p
                .best
                .iter()
                .map(|b| format!("{}", b.stars))
                .collect::<Vec<_>>()
                .join(" ");
            let line = format!("{:<12}  {:>5}  {:>6}   {}", p.name, stars, total, per_level);
            let fg = if p.name == app.player_name {
                Color::Yellow
            } else {
                Color::White
            };
            self.front.put_str(4, 5 + i, &line, fg, BASE_BG);
        }
        if players.is_empty() {
            self.front
                .put_centered(8, "no scores yet", Color::DarkGrey, BASE_BG);
        }

        self.front
            .put_str(0, HELP_ROW, "[esc] back", Color::DarkGrey, BASE_BG);
    }

    fn compose_options(&mut self, app: &App) {
        self.front.put_centered(3, "OPTIONS", Color::Cyan, BASE_BG);
        let rows = [
            ("Music", app.options.music),
            ("Sound effects", app.options.sound_effects),
        ];
        for (i, (label, on)) in rows.iter().enumerate() {
            let line = format!("{:<14} [{}]", label, if *on { "ON " } else { "OFF" });
            let y = 7 + i * 2;
            if i == app.options_cursor {
                self.front
                    .put_centered(y, &format!("> {line} <"), Color::Yellow, BASE_BG);
            } else {
                self.front.put_centered(y, &line, Color::White, BASE_BG);
            }
        }
        self.front.put_str(
            0,
            HELP_ROW,
            "↑/↓ select  enter toggle  [esc] back",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_level_clear(&mut self, app: &App) {
        self.front
            .put_centered(5, "LEVEL CLEAR!", Color::Green, BASE_BG);
        if let Some(result) = app.last_result {
            self.front
                .put_centered(8, &stars_glyph(result.stars), Color::Yellow, BASE_BG);
            self.front.put_centered(
                10,
                &format!("score {}", result.score),
                Color::White,
                BASE_BG,
            );
            if result.new_best {
                self.front
                    .put_centered(12, "NEW BEST!", Color::Cyan, BASE_BG);
            }
        }
        self.front.put_str(
            0,
            HELP_ROW,
            "enter continue  [r] replay  [esc] menu",
            Color::DarkGrey,
            BASE_BG,
        );
    }

    fn compose_game_over(&mut self, app: &App) {
        self.front
            .put_centered(6, "G A M E  O V E R", Color::Red, BASE_BG);
        self.front.put_centered(
            9,
            &format!("final score {}", app.final_score),
            Color::White,
            BASE_BG,
        );
        self.front.put_str(
            0,
            HELP_ROW,
            "[r] retry  [esc] menu",
            Color::DarkGrey,
            BASE_BG,
        );
    }
}

pub const MENU_ITEMS: &[&str] = &[
    "Play",
    "Select Level",
    "High Scores",
    "Options",
    "Change Player",
    "Quit",
];

/// Two glyphs + color for a grid cell, or None to leave it blank.
fn tile_look(cell: TileCell, r: usize, c: usize, s: &GameSession) -> Option<((char, char), Color)> {
    if cell.is_empty() {
        return None;
    }
    if cell.collides() {
        return Some((('█', '█'), Color::Green));
    }
    if cell.is_coin() {
        if s.ledger.is_collected(Kind::Coin, r, c) {
            return None;
        }
        return Some((('(', ')'), Color::Yellow));
    }
    if cell.is_diamond() {
        if s.ledger.is_collected(Kind::Diamond, r, c) {
            return None;
        }
        return Some((('◆', ' '), Color::Cyan));
    }
    if cell.is_life() {
        if s.ledger.is_collected(Kind::Life, r, c) {
            return None;
        }
        return Some((('♥', ' '), Color::Red));
    }
    if cell.is_trap() {
        return Some((('▲', '▲'), Color::Red));
    }
    // Decorative tile from a background layer.
    Some((('░', '░'), Color::DarkGrey))
}

fn theme_color(background: &str) -> Color {
    match background {
        "meadow" => Color::Green,
        "cavern" => Color::Grey,
        "summit" => Color::White,
        "ruins" => Color::DarkYellow,
        "night" => Color::DarkBlue,
        _ => Color::Green,
    }
}

fn stars_glyph(stars: u8) -> String {
    (1..=3)
        .map(|i| if i <= stars { '★' } else { '☆' })
        .collect::<String>()
        .chars()
        .flat_map(|c| [c, ' '])
        .collect::<String>()
        .trim_end()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stars_glyph_fills_left_to_right() {
        assert_eq!(stars_glyph(0), "☆ ☆ ☆");
        assert_eq!(stars_glyph(2), "★ ★ ☆");
        assert_eq!(stars_glyph(3), "★ ★ ★");
    }

    #[test]
    fn buffer_writes_are_bounds_checked() {
        let mut buf = Buffer::new(BLANK);
        // Off-screen writes are dropped, not panics.
        buf.set(BUF_W, 0, INVALID);
        buf.set(0, BUF_H, INVALID);
        buf.put_str(BUF_W - 2, 0, "long past the edge", Color::White, BASE_BG);
        assert_eq!(buf.cells[0], BLANK);
        assert_eq!(buf.cells[BUF_W - 1].ch, 'o');
    }
}
