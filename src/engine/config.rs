/*
  Minuet, a bitboard chess engine with a neural evaluation boundary.
  Copyright (C) 2024 The Minuet Authors.

  Minuet is free software: you can redistribute it and/or modify
  it under the terms of the GNU General Public License as published by
  the Free Software Foundation, either version 3 of the License, or
  (at your option) any later version.

  Minuet is distributed in the hope that it will be useful,
  but WITHOUT ANY WARRANTY; without even the implied warranty of
  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
  GNU General Public License for more details.

  You should have received a copy of the GNU General Public License
  along with this program.  If not, see <http://www.gnu.org/licenses/>.
*/

//! Engine configuration: the knobs the search driver honors, loadable from
//! a TOML file with per-field defaults.

use serde::{Deserialize, Serialize};

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
/// Errors that can occur when loading or validating a configuration.
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A field value is outside its permitted range.
    #[error("invalid config value: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Configuration for the search driver.
/// Every field has a default, so an empty file (or no file) is a valid
/// configuration.
pub struct EngineConfig {
    /// The number of transposition-table entries.
    /// Rounded down to a power of two at table construction.
    #[serde(default = "default_tt_entries")]
    pub tt_entries: usize,

    /// The maximum depth iterative deepening will reach.
    #[serde(default = "default_max_depth")]
    pub max_depth: i16,

    /// The half-width of the aspiration window, in the evaluator's score
    /// scale.
    #[serde(default = "default_aspiration_window")]
    pub aspiration_window: f32,

    /// The fraction of the wall-clock budget actually spent searching,
    /// leaving the rest as a safety margin. Must be in (0, 1].
    #[serde(default = "default_time_buffer")]
    pub time_buffer: f64,

    /// The number of search worker threads.
    #[serde(default = "default_thread_count")]
    pub thread_count: usize,

    /// The path of the evaluation model weights.
    /// When absent, the built-in material evaluator is used.
    #[serde(default)]
    pub model_path: Option<PathBuf>,
}

fn default_tt_entries() -> usize {
    1 << 20
}

fn default_max_depth() -> i16 {
    30
}

fn default_aspiration_window() -> f32 {
    0.25
}

fn default_time_buffer() -> f64 {
    0.8
}

fn default_thread_count() -> usize {
    num_cpus::get()
}

impl Default for EngineConfig {
    fn default() -> EngineConfig {
        EngineConfig {
            tt_entries: default_tt_entries(),
            max_depth: default_max_depth(),
            aspiration_window: default_aspiration_window(),
            time_buffer: default_time_buffer(),
            thread_count: default_thread_count(),
            model_path: None,
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a TOML file, validating the result.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the file cannot be read or parsed, or if
    /// a value is out of range.
    pub fn load(path: &Path) -> Result<EngineConfig, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: EngineConfig = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field against its permitted range.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::Invalid`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tt_entries == 0 {
            return Err(ConfigError::Invalid("tt_entries must be positive"));
        }
        if !(1..=crate::engine::MAX_PLY as i16).contains(&self.max_depth) {
            return Err(ConfigError::Invalid("max_depth out of range"));
        }
        if !(self.aspiration_window > 0.0) {
            return Err(ConfigError::Invalid("aspiration_window must be positive"));
        }
        if !(self.time_buffer > 0.0 && self.time_buffer <= 1.0) {
            return Err(ConfigError::Invalid("time_buffer must be in (0, 1]"));
        }
        if self.thread_count == 0 {
            return Err(ConfigError::Invalid("thread_count must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tt_entries, 1 << 20);
        assert_eq!(config.max_depth, 30);
        assert!((config.aspiration_window - 0.25).abs() < f32::EPSILON);
        assert!((config.time_buffer - 0.8).abs() < f64::EPSILON);
        assert!(config.thread_count >= 1);
        assert!(config.model_path.is_none());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: EngineConfig = toml::from_str("max_depth = 12").unwrap();
        assert_eq!(config.max_depth, 12);
        assert_eq!(config.tt_entries, 1 << 20);
    }

    #[test]
    fn bad_values_are_rejected() {
        let config: EngineConfig = toml::from_str("time_buffer = 1.5").unwrap();
        assert!(config.validate().is_err());
        let config: EngineConfig = toml::from_str("thread_count = 0").unwrap();
        assert!(config.validate().is_err());
        let config: EngineConfig = toml::from_str("max_depth = 100").unwrap();
        assert!(config.validate().is_err());
    }
}
