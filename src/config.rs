//=========================================================================
// Game Configuration
//
// Externally supplied constants: frame rate, arena geometry, per-role
// speeds and start positions, round length. Loaded from a TOML file
// with per-field fallbacks, so a partial (or missing) file yields a
// playable configuration.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::math::Vec2;
use crate::core::player::Role;

//=== ConfigError =========================================================

/// Failure to obtain a usable configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML (or has mistyped fields).
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// The values parsed fine but cannot drive a game.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

//=== GameConfig ==========================================================

/// All tunable constants consumed by the engine.
///
/// Every field has a serde default, so any subset may be given in the
/// TOML file. [`GameConfig::default`] is always valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Target frames (ticks) per second of the main loop.
    pub fps: u32,

    /// Arena width in world units; positions clamp to `[0, arena_width]`.
    pub arena_width: f32,

    /// Arena height in world units; positions clamp to `[0, arena_height]`.
    pub arena_height: f32,

    /// Collision radius of a player. Two players overlap when their
    /// distance drops below twice this value.
    pub player_radius: f32,

    /// Speed of the attacking player, world units per second.
    pub attack_speed: f32,

    /// Speed of the defending player, world units per second.
    pub defense_speed: f32,

    /// Round length in ticks; when the countdown hits zero the players
    /// swap roles.
    pub game_length: u64,

    // The table-valued fields come last so the struct serializes to
    // valid TOML without reordering.
    /// Start position for the attack role.
    pub attack_start: Vec2,

    /// Start position for the defense role.
    pub defense_start: Vec2,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fps: 60,
            arena_width: 800.0,
            arena_height: 600.0,
            player_radius: 10.0,
            attack_speed: 180.0,
            defense_speed: 120.0,
            game_length: 600,
            attack_start: Vec2::new(600.0, 300.0),
            defense_start: Vec2::new(200.0, 300.0),
        }
    }
}

impl GameConfig {
    //--- Loading ----------------------------------------------------------

    /// Loads a configuration from a TOML file.
    ///
    /// Missing keys fall back to their defaults; a missing or unreadable
    /// file is an error (callers wanting pure defaults use
    /// `GameConfig::default()`). The loaded values are validated before
    /// being returned.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the values can actually drive a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fps == 0 {
            return Err(ConfigError::Invalid("fps must be positive".into()));
        }
        if self.game_length == 0 {
            return Err(ConfigError::Invalid("game_length must be positive".into()));
        }
        if self.arena_width <= 0.0 || self.arena_height <= 0.0 {
            return Err(ConfigError::Invalid("arena dimensions must be positive".into()));
        }
        if self.player_radius < 0.0 {
            return Err(ConfigError::Invalid("player_radius must not be negative".into()));
        }
        if self.attack_speed < 0.0 || self.defense_speed < 0.0 {
            return Err(ConfigError::Invalid("speeds must not be negative".into()));
        }
        for (name, start) in [("attack_start", self.attack_start), ("defense_start", self.defense_start)] {
            if start != start.clamp(Vec2::ZERO, self.arena_max()) {
                return Err(ConfigError::Invalid(format!("{name} lies outside the arena")));
            }
        }
        Ok(())
    }

    //--- Derived Accessors ------------------------------------------------

    /// The far corner of the arena; `(0, 0)` is the near one.
    #[inline]
    pub fn arena_max(&self) -> Vec2 {
        Vec2::new(self.arena_width, self.arena_height)
    }

    /// Speed for a role, world units per second.
    #[inline]
    pub fn speed(&self, role: Role) -> f32 {
        match role {
            Role::Attack => self.attack_speed,
            Role::Defense => self.defense_speed,
        }
    }

    /// Start position for a role.
    #[inline]
    pub fn start_position(&self, role: Role) -> Vec2 {
        match role {
            Role::Attack => self.attack_start,
            Role::Defense => self.defense_start,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
