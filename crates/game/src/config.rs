//! Simulation configuration.
//!
//! Everything has a default, so a TOML file only needs the keys it
//! changes:
//!
//! ```toml
//! tick_rate = 60
//!
//! [controller]
//! max_speed = 12.0
//! jump_height = 3.0
//! ```

use std::path::{Path, PathBuf};

use gravwalk_physics::movement::ControllerConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Game simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Simulation tick rate (ticks per second).
    pub tick_rate: u32,

    /// Character movement configuration.
    pub controller: ControllerConfig,

    /// Radius of the character's sphere.
    pub character_radius: f32,

    /// Mass of the character's body.
    pub character_mass: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_rate: 50,
            controller: ControllerConfig::default(),
            character_radius: 0.5,
            character_mass: 1.0,
        }
    }
}

impl SimulationConfig {
    /// Get the time step per tick in seconds.
    pub fn delta_time(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Parse a TOML document. Out-of-range values are clamped.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        Ok(config.validated())
    }

    /// Load a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("loaded simulation config from {}", path.display());
        Ok(config)
    }

    pub fn validated(mut self) -> Self {
        self.tick_rate = self.tick_rate.max(1);
        self.controller = self.controller.validated();
        self.character_radius = self.character_radius.max(0.01);
        self.character_mass = self.character_mass.max(0.0);
        self
    }
}
