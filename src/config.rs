//! User configuration
//!
//! Read from `<config_dir>/bingo-roulette/config.toml` unless a path is given
//! on the command line. Every field has a default, so a partial file (or no
//! file at all) is fine.
//!
//! ```toml
//! [audio]
//! enabled = true
//! gain = 0.8
//!
//! [roulette]
//! spin_ms = 3000
//! settle_ms = 500
//!
//! [display]
//! frame_ms = 33
//! backdrop = true
//! confirm_quit = true
//! ```

use crate::roulette::PhaseTable;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub audio: AudioConfig,
    pub roulette: RouletteConfig,
    pub display: DisplayConfig,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Try to open the output device at all
    pub enabled: bool,
    /// Master gain 0.0-1.0
    pub gain: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            gain: 0.8,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouletteConfig {
    /// Length of the spin before the number lands
    pub spin_ms: u64,
    /// Hold on the landed number before the draw completes
    pub settle_ms: u64,
}

impl Default for RouletteConfig {
    fn default() -> Self {
        Self {
            spin_ms: 3000,
            settle_ms: 500,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Redraw interval while idle
    pub frame_ms: u64,
    /// Falling logos behind the board
    pub backdrop: bool,
    /// Ask before quitting or restarting a game in progress
    pub confirm_quit: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_ms: 33,
            backdrop: true,
            confirm_quit: true,
        }
    }
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("bingo-roulette").join("config.toml"))
    }

    /// Load from `path`, or from the default location if `path` is `None`.
    ///
    /// An explicit path must exist; a missing default file yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        match path {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    debug!("No config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
        let config = Self::from_toml(&text)?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Config = toml::from_str(text)?;
        Ok(config.sanitized())
    }

    pub fn to_toml(&self) -> Result<String, Box<dyn std::error::Error>> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Clamp out-of-range values instead of rejecting the file
    fn sanitized(mut self) -> Self {
        self.audio.gain = self.audio.gain.clamp(0.0, 1.0);
        self.roulette.spin_ms = self.roulette.spin_ms.clamp(100, 60_000);
        self.roulette.settle_ms = self.roulette.settle_ms.min(10_000);
        self.display.frame_ms = self.display.frame_ms.clamp(10, 1000);
        self
    }

    pub fn phase_table(&self) -> PhaseTable {
        PhaseTable::new(
            Duration::from_millis(self.roulette.spin_ms),
            Duration::from_millis(self.roulette.settle_ms),
        )
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.display.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.phase_table(), PhaseTable::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = Config::from_toml("[audio]\nenabled = false\n").unwrap();
        assert!(!config.audio.enabled);
        assert_eq!(config.audio.gain, 0.8);
        assert_eq!(config.roulette.spin_ms, 3000);
        assert!(config.display.backdrop);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let config =
            Config::from_toml("[audio]\ngain = 4.0\n[roulette]\nspin_ms = 1\n[display]\nframe_ms = 0\n")
                .unwrap();
        assert_eq!(config.audio.gain, 1.0);
        assert_eq!(config.roulette.spin_ms, 100);
        assert_eq!(config.display.frame_ms, 10);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(Config::from_toml("[audio\nenabled = yes").is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(Config::load(Some(&missing)).is_err());
    }

    #[test]
    fn test_load_from_file_and_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "[roulette]\nspin_ms = 1500\nsettle_ms = 250").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.roulette.spin_ms, 1500);
        assert_eq!(config.phase_table().settle(), Duration::from_millis(250));

        let text = config.to_toml().unwrap();
        assert_eq!(Config::from_toml(&text).unwrap(), config);
    }
}
