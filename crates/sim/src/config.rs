//! Simulation configuration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use tracing::info;

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub field: FieldConfig,
}

impl Config {
    /// Load configuration from `path`, writing the defaults there if the file
    /// does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            info!("No {} found, creating default config", path.display());
            let default_config = Self::default();
            std::fs::write(path, toml::to_string_pretty(&default_config)?)?;
            Ok(default_config)
        }
    }

    /// Parse and validate a TOML document.
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(self.field.extent > 0, "field.extent must be positive");
        anyhow::ensure!(self.game.players > 0, "game.players must be positive");
        anyhow::ensure!(self.game.max_speed > 0, "game.max_speed must be positive");
        Ok(())
    }
}

/// Which tag variant to play.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeKind {
    #[default]
    Tag,
    Zombie,
    Elimination,
}

impl fmt::Display for ModeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModeKind::Tag => "tag",
            ModeKind::Zombie => "zombie",
            ModeKind::Elimination => "elimination",
        })
    }
}

/// Game rules and pacing.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GameConfig {
    #[serde(default)]
    pub mode: ModeKind,
    /// Number of players spawned at start.
    #[serde(default = "default_players")]
    pub players: usize,
    /// Ticks between winner checks.
    #[serde(default = "default_duration")]
    pub duration: u64,
    /// Upper bound for a player's random speed (at least 1).
    #[serde(default = "default_max_speed")]
    pub max_speed: u32,
    /// Upper bound for a player's random vision.
    #[serde(default = "default_max_vision")]
    pub max_vision: u32,
    /// Stop after this many ticks (0 = no limit).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,
    /// Tick interval in milliseconds (0 = run ticks back to back).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,
    /// Players this close on both axes collide.
    #[serde(default = "default_collision_distance")]
    pub collision_distance: u32,
    /// Fixed RNG seed for reproducible games.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: ModeKind::default(),
            players: default_players(),
            duration: default_duration(),
            max_speed: default_max_speed(),
            max_vision: default_max_vision(),
            max_ticks: default_max_ticks(),
            tick_interval_ms: default_tick_interval(),
            collision_distance: default_collision_distance(),
            seed: None,
        }
    }
}

fn default_players() -> usize {
    10
}
fn default_duration() -> u64 {
    50
}
fn default_max_speed() -> u32 {
    5
}
fn default_max_vision() -> u32 {
    50
}
fn default_max_ticks() -> u64 {
    10_000
}
fn default_tick_interval() -> u64 {
    40
}
fn default_collision_distance() -> u32 {
    2
}

/// Which index backs the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    #[default]
    Quad,
    Point,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FieldKind::Quad => "quad",
            FieldKind::Point => "point",
        })
    }
}

/// Playing field configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldConfig {
    #[serde(default)]
    pub kind: FieldKind,
    /// The field is `[0, extent] x [0, extent]`.
    #[serde(default = "default_extent")]
    pub extent: i32,
    /// Ticks between point tree rebalances (0 = never).
    #[serde(default = "default_rebalance_interval")]
    pub rebalance_interval: u64,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            kind: FieldKind::default(),
            extent: default_extent(),
            rebalance_interval: default_rebalance_interval(),
        }
    }
}

fn default_extent() -> i32 {
    500
}
fn default_rebalance_interval() -> u64 {
    100
}
