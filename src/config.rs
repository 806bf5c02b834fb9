/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.
///
/// The physics numbers are tuned game-feel constants, not derived
/// quantities. They are carried as configuration precisely so nobody
/// "corrects" them in code: changing them changes feel, not correctness.

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub physics: PhysicsConfig,
    pub playfield: PlayfieldConfig,
    pub maps_dir: PathBuf,
}

#[derive(Clone, Debug)]
pub struct PhysicsConfig {
    /// Horizontal speed scale applied to the intent unit.
    pub run_speed: f32,
    /// Per-frame vertical acceleration.
    pub gravity: f32,
    /// Terminal fall speed.
    pub max_fall_speed: f32,
    /// Upward velocity set by the jump command (negative = up).
    pub jump_velocity: f32,
    /// Dash speed of an armed spike, pixels per frame.
    pub spike_speed: f32,
    /// Disappearing-block trigger radius, in tile lengths.
    pub block_vanish_radius: f32,
}

/// Visible playfield size in pixels. The actor is clamped to its width
/// and dies past its height; spikes despawn one tile beyond it.
#[derive(Clone, Copy, Debug)]
pub struct PlayfieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        PhysicsConfig {
            run_speed: default_run_speed(),
            gravity: default_gravity(),
            max_fall_speed: default_max_fall_speed(),
            jump_velocity: default_jump_velocity(),
            spike_speed: default_spike_speed(),
            block_vanish_radius: default_block_vanish_radius(),
        }
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        PlayfieldConfig {
            width: default_playfield_width(),
            height: default_playfield_height(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    physics: TomlPhysics,
    #[serde(default)]
    playfield: TomlPlayfield,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlPhysics {
    #[serde(default = "default_run_speed")]
    run_speed: f32,
    #[serde(default = "default_gravity")]
    gravity: f32,
    #[serde(default = "default_max_fall_speed")]
    max_fall_speed: f32,
    #[serde(default = "default_jump_velocity")]
    jump_velocity: f32,
    #[serde(default = "default_spike_speed")]
    spike_speed: f32,
    #[serde(default = "default_block_vanish_radius")]
    block_vanish_radius: f32,
}

#[derive(Deserialize, Debug)]
struct TomlPlayfield {
    #[serde(default = "default_playfield_width")]
    width: f32,
    #[serde(default = "default_playfield_height")]
    height: f32,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_maps_dir")]
    maps_dir: String,
}

// ── Defaults ──

fn default_run_speed() -> f32 { 1.6 }
fn default_gravity() -> f32 { 0.2 }
fn default_max_fall_speed() -> f32 { 5.0 }
fn default_jump_velocity() -> f32 { -4.0 }
fn default_spike_speed() -> f32 { 7.0 }
fn default_block_vanish_radius() -> f32 { 1.2 }

fn default_playfield_width() -> f32 { 480.0 }
fn default_playfield_height() -> f32 { 400.0 }

fn default_maps_dir() -> String { "data/maps".into() }

impl Default for TomlPhysics {
    fn default() -> Self {
        TomlPhysics {
            run_speed: default_run_speed(),
            gravity: default_gravity(),
            max_fall_speed: default_max_fall_speed(),
            jump_velocity: default_jump_velocity(),
            spike_speed: default_spike_speed(),
            block_vanish_radius: default_block_vanish_radius(),
        }
    }
}

impl Default for TomlPlayfield {
    fn default() -> Self {
        TomlPlayfield {
            width: default_playfield_width(),
            height: default_playfield_height(),
        }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            maps_dir: default_maps_dir(),
        }
    }
}

// ── Loading ──

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig::from_toml(TomlConfig::default())
    }
}

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let search_dirs = candidate_dirs();
        GameConfig::from_toml(load_toml(&search_dirs))
    }

    /// Load config from a specific TOML file, defaulting on any failure.
    pub fn load_from(path: &Path) -> Self {
        let toml_cfg = match std::fs::read_to_string(path) {
            Ok(text) => parse_toml(&text, path),
            Err(_) => TomlConfig::default(),
        };
        GameConfig::from_toml(toml_cfg)
    }

    fn from_toml(toml_cfg: TomlConfig) -> Self {
        let maps_dir_str = &toml_cfg.general.maps_dir;
        let maps_dir = if PathBuf::from(maps_dir_str).is_absolute() {
            PathBuf::from(maps_dir_str)
        } else {
            candidate_dirs()
                .iter()
                .map(|d| d.join(maps_dir_str))
                .find(|p| p.is_dir())
                .unwrap_or_else(|| PathBuf::from(maps_dir_str))
        };

        GameConfig {
            physics: PhysicsConfig {
                run_speed: toml_cfg.physics.run_speed,
                gravity: toml_cfg.physics.gravity,
                max_fall_speed: toml_cfg.physics.max_fall_speed,
                jump_velocity: toml_cfg.physics.jump_velocity,
                spike_speed: toml_cfg.physics.spike_speed,
                block_vanish_radius: toml_cfg.physics.block_vanish_radius,
            },
            playfield: PlayfieldConfig {
                width: toml_cfg.playfield.width,
                height: toml_cfg.playfield.height,
            },
            maps_dir,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable (resolve symlinks)
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
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
                Ok(text) => return parse_toml(&text, &path),
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}

fn parse_toml(text: &str, path: &Path) -> TomlConfig {
    match toml::from_str::<TomlConfig>(text) {
        Ok(cfg) => cfg,
        Err(e) => {
            log::warn!("{} parse error: {e}; using default settings", path.display());
            TomlConfig::default()
        }
    }
}
