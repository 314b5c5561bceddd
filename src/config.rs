//! Configuration management for refunge.
//!
//! Configuration is loaded from multiple sources in priority order:
//! 1. Command-line flags (applied by the binary)
//! 2. Environment variables (REFUNGE_NUL, etc.)
//! 3. Project-local config file (`./refunge.toml`)
//! 4. User config file (`~/.config/refunge/config.toml`)
//! 5. Built-in defaults
//!
//! # Config File Format
//!
//! ```toml
//! # refunge.toml
//!
//! # Source character loaded as a 0 cell
//! nul_char = "."
//!
//! # Enable the `*` clear instruction
//! clear_mode = true
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

use crate::debug::DEFAULT_FAST_TICKS;
use crate::interpreter::{Features, Options};

/// Global cached configuration.
static CONFIG: OnceLock<Config> = OnceLock::new();

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// `nul_char` is not exactly one single-byte character.
    #[error("nul_char must be a single ASCII character, got {0:?}")]
    InvalidNul(String),
}

/// refunge configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Source character stored as 0 when loading a program.
    pub nul_char: Option<String>,

    /// Enable the `*` clear instruction.
    pub clear_mode: Option<bool>,

    /// Ticks per fast debugger batch.
    pub fast_ticks: Option<u64>,
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables
    /// 2. Project-local `refunge.toml`
    /// 3. User config `~/.config/refunge/config.toml`
    /// 4. Defaults
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load user config first (lowest priority of file configs)
        if let Some(user_config) = Self::load_user_config() {
            config.merge(user_config);
        }

        // Load project-local config (higher priority)
        if let Some(local_config) = Self::load_from_file(Path::new("refunge.toml")) {
            config.merge(local_config);
        }

        // Environment variables override everything
        config.apply_overrides_from(|key| std::env::var(key).ok());

        config
    }

    /// Get the cached global configuration.
    ///
    /// Loads configuration on first call and caches it.
    pub fn get() -> &'static Config {
        CONFIG.get_or_init(|| {
            let config = Self::load();
            log::debug!("Loaded configuration: {:?}", config);
            config
        })
    }

    /// The NUL substitution byte, if configured.
    pub fn nul_byte(&self) -> Result<Option<u8>, ConfigError> {
        self.nul_char.as_deref().map(parse_nul).transpose()
    }

    /// Whether clear mode is enabled (default off).
    pub fn clear_mode(&self) -> bool {
        self.clear_mode.unwrap_or(false)
    }

    /// Ticks per fast debugger batch.
    pub fn fast_ticks(&self) -> u64 {
        self.fast_ticks.unwrap_or(DEFAULT_FAST_TICKS)
    }

    /// Interpreter options described by this configuration.
    pub fn options(&self) -> Result<Options, ConfigError> {
        self.options_with(None)
    }

    /// Interpreter options with `nul` taking precedence over `nul_char`.
    ///
    /// The configured character is only validated when it is actually used.
    pub fn options_with(&self, nul: Option<u8>) -> Result<Options, ConfigError> {
        let mut options = Options::default();
        options.nul = match nul {
            Some(byte) => Some(byte),
            None => self.nul_byte()?,
        };
        if self.clear_mode() {
            options = options.with_features(Features::CLEAR_MODE);
        }
        Ok(options)
    }

    /// Load user configuration from ~/.config/refunge/config.toml
    fn load_user_config() -> Option<Self> {
        let config_path = Self::user_config_path()?;
        Self::load_from_file(&config_path)
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Option<Self> {
        if !path.exists() {
            return None;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    Some(config)
                }
                Err(e) => {
                    log::warn!("Failed to parse {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Merge another config into this one.
    /// Only overrides fields that are Some in the other config.
    fn merge(&mut self, other: Self) {
        if other.nul_char.is_some() {
            self.nul_char = other.nul_char;
        }
        if other.clear_mode.is_some() {
            self.clear_mode = other.clear_mode;
        }
        if other.fast_ticks.is_some() {
            self.fast_ticks = other.fast_ticks;
        }
    }

    /// Apply variable overrides, looking each name up with `lookup`.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(nul) = lookup("REFUNGE_NUL") {
            log::info!("Using REFUNGE_NUL from environment: {:?}", nul);
            self.nul_char = Some(nul);
        }
        if let Some(value) = lookup("REFUNGE_CLEAR_MODE") {
            match parse_bool(&value) {
                Some(enabled) => self.clear_mode = Some(enabled),
                None => log::warn!("Ignoring REFUNGE_CLEAR_MODE={:?}: expected a boolean", value),
            }
        }
        if let Some(value) = lookup("REFUNGE_FAST_TICKS") {
            match value.trim().parse() {
                Ok(ticks) => self.fast_ticks = Some(ticks),
                Err(e) => log::warn!("Ignoring REFUNGE_FAST_TICKS={:?}: {}", value, e),
            }
        }
    }

    /// Get the path to the user config file (for display/creation).
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("refunge").join("config.toml"))
    }

    /// Generate a sample config file content.
    pub fn sample_config() -> String {
        r#"# refunge configuration
# Place this file at ~/.config/refunge/config.toml or ./refunge.toml

# Source character loaded as a 0 cell (same as `-c`)
# nul_char = "."

# Enable the `*` clear instruction (same as `-*`)
clear_mode = false

# Ticks per fast debugger batch
fast_ticks = 10000
"#
        .to_string()
    }
}

/// Parse a NUL substitution character.
pub fn parse_nul(value: &str) -> Result<u8, ConfigError> {
    match value.as_bytes() {
        [byte] => Ok(*byte),
        _ => Err(ConfigError::InvalidNul(value.to_string())),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.nul_byte().unwrap(), None);
        assert!(!config.clear_mode());
        assert_eq!(config.fast_ticks(), 10_000);
        assert_eq!(config.options().unwrap(), Options::default());
    }

    #[test]
    fn test_config_merge() {
        let mut base = Config {
            nul_char: Some(".".to_string()),
            clear_mode: None,
            fast_ticks: Some(5),
        };

        let overlay = Config {
            nul_char: None,
            clear_mode: Some(true),
            fast_ticks: Some(7),
        };

        base.merge(overlay);

        // nul_char unchanged (overlay was None)
        assert_eq!(base.nul_char.as_deref(), Some("."));
        // clear_mode set from overlay
        assert_eq!(base.clear_mode, Some(true));
        // fast_ticks overridden by overlay
        assert_eq!(base.fast_ticks, Some(7));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("REFUNGE_NUL", "_"),
            ("REFUNGE_CLEAR_MODE", "yes"),
            ("REFUNGE_FAST_TICKS", " 42 "),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_overrides_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.nul_byte().unwrap(), Some(b'_'));
        assert!(config.clear_mode());
        assert_eq!(config.fast_ticks(), 42);

        let options = config.options().unwrap();
        assert_eq!(options.nul, Some(b'_'));
        assert!(options.features.contains(Features::CLEAR_MODE));
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = Config {
            clear_mode: Some(true),
            fast_ticks: Some(3),
            ..Config::default()
        };
        config.apply_overrides_from(|key| match key {
            "REFUNGE_CLEAR_MODE" => Some("maybe".to_string()),
            "REFUNGE_FAST_TICKS" => Some("-1".to_string()),
            _ => None,
        });
        assert_eq!(config.clear_mode, Some(true));
        assert_eq!(config.fast_ticks, Some(3));
    }

    #[test]
    fn test_invalid_nul() {
        let config = Config {
            nul_char: Some("ab".to_string()),
            ..Config::default()
        };
        assert_eq!(config.nul_byte(), Err(ConfigError::InvalidNul("ab".to_string())));
        assert!(config.options().is_err());
        assert!(parse_nul("").is_err());
        assert!(parse_nul("é").is_err());
    }

    #[test]
    fn test_nul_override_skips_configured_nul() {
        let config = Config {
            nul_char: Some("ab".to_string()),
            clear_mode: Some(true),
            ..Config::default()
        };
        let options = config.options_with(Some(b'.')).unwrap();
        assert_eq!(options.nul, Some(b'.'));
        assert!(options.features.contains(Features::CLEAR_MODE));
        assert!(config.options_with(None).is_err());

        let config = Config {
            nul_char: Some("_".to_string()),
            ..Config::default()
        };
        assert_eq!(config.options_with(Some(b'.')).unwrap().nul, Some(b'.'));
        assert_eq!(config.options_with(None).unwrap().nul, Some(b'_'));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();

        let good = dir.path().join("refunge.toml");
        std::fs::write(&good, "nul_char = \"#\"\nfast_ticks = 9\n").unwrap();
        let config = Config::load_from_file(&good).unwrap();
        assert_eq!(config.nul_byte().unwrap(), Some(b'#'));
        assert_eq!(config.fast_ticks(), 9);
        assert_eq!(config.clear_mode, None);

        let bad = dir.path().join("bad.toml");
        std::fs::write(&bad, "clear_mode = \"sometimes\"").unwrap();
        assert!(Config::load_from_file(&bad).is_none());

        assert!(Config::load_from_file(&dir.path().join("missing.toml")).is_none());
    }

    #[test]
    fn test_sample_config_parses() {
        let sample = Config::sample_config();
        let config: Config = toml::from_str(&sample).expect("Sample config should parse");
        assert_eq!(config.clear_mode, Some(false));
        assert_eq!(config.fast_ticks(), DEFAULT_FAST_TICKS);
    }
}
