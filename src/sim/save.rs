/// Flat-file persistence under the saves directory.
///
///   `high_scores.txt`    player count, then per player a lowercase
///                        name line followed by one `stars,score` line
///                        per level.
///   `options.txt`        two 0/1 ints: music, sound effects.
///   `current_player.txt` one name line.
///
/// Every save is a full rewrite of the file. Loads are strict about
/// format and fail with a message rather than guessing; a missing file
/// is not an error, it just yields the defaults.

use std::fs;
use std::path::Path;

use crate::domain::rules::BestResult;
use crate::sim::level::LEVEL_COUNT;

pub const HIGH_SCORES_FILE: &str = "high_scores.txt";
pub const OPTIONS_FILE: &str = "options.txt";
pub const CURRENT_PLAYER_FILE: &str = "current_player.txt";

/// Roster cap. A new name past this is silently not recorded.
pub const MAX_PLAYERS: usize = 30;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayerRecord {
    pub name: String,
    pub best: [BestResult; LEVEL_COUNT],
}

impl PlayerRecord {
    fn new(name: String) -> Self {
        PlayerRecord {
            name,
            best: [BestResult::new(0, 0); LEVEL_COUNT],
        }
    }
}

/// All players' per-level bests. Names are stored lowercase; lookups
/// normalize, so "Ada" and "ada" are the same player.
#[derive(Clone, Debug, Default)]
pub struct HighScores {
    players: Vec<PlayerRecord>,
}

impl HighScores {
    pub fn load(saves_dir: &Path) -> Result<HighScores, String> {
        let path = saves_dir.join(HIGH_SCORES_FILE);
        if !path.exists() {
            return Ok(HighScores::default());
        }
        let text =
            fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        parse_high_scores(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn save(&self, saves_dir: &Path) -> Result<(), String> {
        fs::create_dir_all(saves_dir).map_err(|e| format!("{}: {e}", saves_dir.display()))?;
        let path = saves_dir.join(HIGH_SCORES_FILE);
        let mut out = format!("{}\n", self.players.len());
        for p in &self.players {
            out.push_str(&p.name);
            out.push('\n');
            for b in &p.best {
                out.push_str(&format!("{},{}\n", b.stars, b.score));
            }
        }
        fs::write(&path, out).map_err(|e| format!("{}: {e}", path.display()))
    }

    /// Record a level result for a player, keeping only strict
    /// improvements (more stars, or equal stars and more score).
    /// Returns whether the stored best changed. Unknown names join the
    /// roster unless it is full.
    pub fn record(&mut self, name: &str, level: usize, result: BestResult) -> bool {
        if level == 0 || level > LEVEL_COUNT {
            return false;
        }
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return false;
        }
        let idx = match self.players.iter().position(|p| p.name == name) {
            Some(i) => i,
            None => {
                if self.players.len() >= MAX_PLAYERS {
                    return false;
                }
                self.players.push(PlayerRecord::new(name));
                self.players.len() - 1
            }
        };
        let slot = &mut self.players[idx].best[level - 1];
        if result.beats(*slot) {
            *slot = result;
            true
        } else {
            false
        }
    }

    pub fn best_for(&self, name: &str) -> Option<&PlayerRecord> {
        let name = name.trim().to_lowercase();
        self.players.iter().find(|p| p.name == name)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }
}

fn parse_high_scores(text: &str) -> Result<HighScores, String> {
    let mut lines = text.lines();
    let count: usize = lines
        .next()
        .ok_or("empty file")?
        .trim()
        .parse()
        .map_err(|e| format!("bad player count: {e}"))?;

    let mut players = Vec::with_capacity(count.min(MAX_PLAYERS));
    for i in 0..count {
        let name = lines
            .next()
            .ok_or_else(|| format!("player {i}: missing name"))?
            .trim()
            .to_lowercase();
        let mut record = PlayerRecord::new(name);
        for level in 0..LEVEL_COUNT {
            let line = lines
                .next()
                .ok_or_else(|| format!("player {i}: missing level {} entry", level + 1))?;
            let (stars, score) = line
                .trim()
                .split_once(',')
                .ok_or_else(|| format!("player {i}: bad entry {line:?}"))?;
            record.best[level] = BestResult::new(
                stars
                    .trim()
                    .parse()
                    .map_err(|e| format!("player {i}: bad stars: {e}"))?,
                score
                    .trim()
                    .parse()
                    .map_err(|e| format!("player {i}: bad score: {e}"))?,
            );
        }
        if players.len() < MAX_PLAYERS {
            players.push(record);
        }
    }
    Ok(HighScores { players })
}

/// Audio toggles. Both on by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Options {
    pub music: bool,
    pub sound_effects: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            music: true,
            sound_effects: true,
        }
    }
}

impl Options {
    pub fn load(saves_dir: &Path) -> Result<Options, String> {
        let path = saves_dir.join(OPTIONS_FILE);
        if !path.exists() {
            return Ok(Options::default());
        }
        let text =
            fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))?;
        let mut parts = text.split_whitespace();
        let mut flag = |label: &str| -> Result<bool, String> {
            match parts.next() {
                Some("0") => Ok(false),
                Some("1") => Ok(true),
                other => Err(format!("{}: bad {label} flag {other:?}", path.display())),
            }
        };
        let music = flag("music")?;
        let sound_effects = flag("sound")?;
        Ok(Options {
            music,
            sound_effects,
        })
    }

    pub fn save(&self, saves_dir: &Path) -> Result<(), String> {
        fs::create_dir_all(saves_dir).map_err(|e| format!("{}: {e}", saves_dir.display()))?;
        let path = saves_dir.join(OPTIONS_FILE);
        let text = format!(
            "{} {}\n",
            self.music as u8, self.sound_effects as u8
        );
        fs::write(&path, text).map_err(|e| format!("{}: {e}", path.display()))
    }
}

/// Last selected player name, if any.
pub fn load_current_player(saves_dir: &Path) -> Option<String> {
    let text = fs::read_to_string(saves_dir.join(CURRENT_PLAYER_FILE)).ok()?;
    let name = text.trim().to_lowercase();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}

pub fn save_current_player(saves_dir: &Path, name: &str) -> Result<(), String> {
    fs::create_dir_all(saves_dir).map_err(|e| format!("{}: {e}", saves_dir.display()))?;
    let path = saves_dir.join(CURRENT_PLAYER_FILE);
    fs::write(&path, format!("{}\n", name.trim().to_lowercase()))
        .map_err(|e| format!("{}: {e}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_saves_dir(name: &str) -> PathBuf {
        let dir =
            std::env::temp_dir().join(format!("tilebound_save_{}_{name}", std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn record_keeps_only_strict_improvements() {
        let mut scores = HighScores::default();
        assert!(scores.record("Ada", 1, BestResult::new(2, 500)));
        // Same stars, more score: better.
        assert!(scores.record("ada", 1, BestResult::new(2, 600)));
        // Fewer stars, more score: not better.
        assert!(!scores.record("ada", 1, BestResult::new(1, 900)));
        // Equal on both axes: not better.
        assert!(!scores.record("ada", 1, BestResult::new(2, 600)));
        // More stars, less score: better.
        assert!(scores.record("ada", 1, BestResult::new(3, 100)));
        let best = scores.best_for("ADA").unwrap().best[0];
        assert_eq!((best.stars, best.score), (3, 100));
    }

    #[test]
    fn record_rejects_bad_input() {
        let mut scores = HighScores::default();
        assert!(!scores.record("ada", 0, BestResult::new(1, 10)));
        assert!(!scores.record("ada", LEVEL_COUNT + 1, BestResult::new(1, 10)));
        assert!(!scores.record("   ", 1, BestResult::new(1, 10)));
        assert!(scores.players().is_empty());
    }

    #[test]
    fn roster_is_capped() {
        let mut scores = HighScores::default();
        for i in 0..MAX_PLAYERS {
            assert!(scores.record(&format!("p{i}"), 1, BestResult::new(1, 1)));
        }
        assert!(!scores.record("overflow", 1, BestResult::new(3, 999)));
        assert_eq!(scores.players().len(), MAX_PLAYERS);
        // Existing players still update fine.
        assert!(scores.record("p0", 1, BestResult::new(2, 1)));
    }

    #[test]
    fn high_scores_round_trip() {
        let dir = temp_saves_dir("roundtrip");
        let mut scores = HighScores::default();
        scores.record("ada", 1, BestResult::new(3, 210));
        scores.record("ada", 5, BestResult::new(1, 40));
        scores.record("bob", 2, BestResult::new(2, 90));
        scores.save(&dir).unwrap();

        let loaded = HighScores::load(&dir).unwrap();
        assert_eq!(loaded.players().len(), 2);
        let ada = loaded.best_for("ada").unwrap();
        assert_eq!((ada.best[0].stars, ada.best[0].score), (3, 210));
        assert_eq!((ada.best[4].stars, ada.best[4].score), (1, 40));
        assert_eq!((ada.best[1].stars, ada.best[1].score), (0, 0));
        let bob = loaded.best_for("bob").unwrap();
        assert_eq!((bob.best[1].stars, bob.best[1].score), (2, 90));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = temp_saves_dir("missing");
        assert!(HighScores::load(&dir).unwrap().players().is_empty());
        assert_eq!(Options::load(&dir).unwrap(), Options::default());
        assert_eq!(load_current_player(&dir), None);
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn malformed_high_scores_file_is_an_error() {
        let dir = temp_saves_dir("malformed");
        fs::write(dir.join(HIGH_SCORES_FILE), "1\nada\n3;210\n").unwrap();
        assert!(HighScores::load(&dir).is_err());
        fs::write(dir.join(HIGH_SCORES_FILE), "2\nada\n").unwrap();
        assert!(HighScores::load(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn options_round_trip() {
        let dir = temp_saves_dir("options");
        let opts = Options {
            music: false,
            sound_effects: true,
        };
        opts.save(&dir).unwrap();
        assert_eq!(Options::load(&dir).unwrap(), opts);

        fs::write(dir.join(OPTIONS_FILE), "1 2\n").unwrap();
        assert!(Options::load(&dir).is_err());
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn current_player_round_trip() {
        let dir = temp_saves_dir("player");
        save_current_player(&dir, "  Ada ").unwrap();
        assert_eq!(load_current_player(&dir).as_deref(), Some("ada"));
        let _ = fs::remove_dir_all(&dir);
    }
}
