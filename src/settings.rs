//! Tuning and course settings
//!
//! Loaded from a JSON file on native; every field falls back to its default
//! when omitted.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{PathParams, PhysicsTuning};

/// Error type for loading or validating settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the settings file.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value that would break generation or stepping.
    #[error("invalid {field}: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

impl ConfigError {
    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        Self::Invalid { field, reason }
    }
}

/// All tunable values for a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub physics: PhysicsTuning,
    pub path: PathParams,
}

impl Settings {
    /// Environment variable naming the settings file
    pub const CONFIG_ENV: &'static str = "SPIRAL_RUN_CONFIG";
    /// Settings file used when the variable is unset
    pub const DEFAULT_PATH: &'static str = "config/spiral-run.json";

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.path.validate()
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read and validate a settings file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults on any error
    ///
    /// A missing file is expected and silent; anything else is logged.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load_from(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Failed to load {}: {e}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Load from `$SPIRAL_RUN_CONFIG`, or the default path
    pub fn load() -> Self {
        let path = std::env::var(Self::CONFIG_ENV)
            .unwrap_or_else(|_| Self::DEFAULT_PATH.to_string());
        Self::load_or_default(path)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
