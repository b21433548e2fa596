/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

use crate::sim::session::Tuning;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub timing: TimingConfig,
    pub levels_dir: PathBuf,
    pub saves_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    pub gravity: f64,
    pub time_step: f64,      // seconds integrated per physics tick
    pub jump_velocity: f64,
    pub walk_step: f64,      // pixels of visual catch-up per anim tick
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub physics_tick_ms: u64,
    pub anim_tick_ms: u64,
    pub sprite_tick_ms: u64,
}

impl GameConfig {
    pub fn tuning(&self) -> Tuning {
        Tuning {
            gravity: self.physics.gravity,
            dt: self.physics.time_step,
            jump_velocity: self.physics.jump_velocity,
            walk_step: self.physics.walk_step,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_gravity")]
    gravity: f64,
    #[serde(default = "default_time_step")]
    time_step: f64,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f64,
    #[serde(default = "default_walk_step")]
    walk_step: f64,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_physics_tick")]
    physics_tick_ms: u64,
    #[serde(default = "default_anim_tick")]
    anim_tick_ms: u64,
    #[serde(default = "default_sprite_tick")]
    sprite_tick_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_levels_dir")]
    levels_dir: String,
    #[serde(default = "default_saves_dir")]
    saves_dir: String,
}

// ── Defaults ──

fn default_gravity() -> f64 { 40.0 }
fn default_time_step() -> f64 { 0.08 }
fn default_jump_velocity() -> f64 { 100.0 }
fn default_walk_step() -> f64 { 8.0 }

fn default_physics_tick() -> u64 { 10 }
fn default_anim_tick() -> u64 { 10 }
fn default_sprite_tick() -> u64 { 200 }

fn default_levels_dir() -> String { "levels".into() }
fn default_saves_dir() -> String { "saves".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            gravity: default_gravity(),
            time_step: default_time_step(),
            jump_velocity: default_jump_velocity(),
            walk_step: default_walk_step(),
        }
    }
}

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            physics_tick_ms: default_physics_tick(),
            anim_tick_ms: default_anim_tick(),
            sprite_tick_ms: default_sprite_tick(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            levels_dir: default_levels_dir(),
            saves_dir: default_saves_dir(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        let toml_cfg = load_toml(&search_dirs);

        GameConfig {
            physics: PhysicsConfig {
                gravity: toml_cfg.physics.gravity,
                time_step: toml_cfg.physics.time_step,
                jump_velocity: toml_cfg.physics.jump_velocity,
                walk_step: toml_cfg.physics.walk_step,
            },
            timing: TimingConfig {
                physics_tick_ms: toml_cfg.timing.physics_tick_ms,
                anim_tick_ms: toml_cfg.timing.anim_tick_ms,
                sprite_tick_ms: toml_cfg.timing.sprite_tick_ms,
            },
            levels_dir: resolve_dir(&search_dirs, &toml_cfg.general.levels_dir),
            saves_dir: resolve_dir(&search_dirs, &toml_cfg.general.saves_dir),
        }
    }
}

/// Absolute paths pass through; relative paths are searched for in the
/// candidate dirs, falling back to CWD-relative (the saves dir usually
/// does not exist until the first save).
fn resolve_dir(search_dirs: &[PathBuf], dir: &str) -> PathBuf {
    let path = PathBuf::from(dir);
    if path.is_absolute() {
        return path;
    }
    search_dirs
        .iter()
        .map(|d| d.join(dir))
        .find(|p| p.is_dir())
        .unwrap_or(path)
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        // Resolve symlinks so data is found relative to the real binary.
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        eprintln!("Warning: config.toml parse error: {e}");
                        eprintln!("Using default settings.");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    eprintln!("Warning: could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let cfg: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.physics.gravity, 40.0);
        assert_eq!(cfg.physics.time_step, 0.08);
        assert_eq!(cfg.timing.physics_tick_ms, 10);
        assert_eq!(cfg.timing.sprite_tick_ms, 200);
        assert_eq!(cfg.general.levels_dir, "levels");
        assert_eq!(cfg.general.saves_dir, "saves");
    }

    #[test]
    fn partial_toml_overrides_only_named_keys() {
        let cfg: TomlConfig = toml::from_str(
            "[physics]\njump_velocity = 120.0\n\n[timing]\nsprite_tick_ms = 150\n",
        )
        .unwrap();
        assert_eq!(cfg.physics.jump_velocity, 120.0);
        assert_eq!(cfg.physics.gravity, 40.0);
        assert_eq!(cfg.timing.sprite_tick_ms, 150);
        assert_eq!(cfg.timing.anim_tick_ms, 10);
    }
}
