//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Mode durations and labels
//! - Whether a timeout advances to the next mode, and whether it starts it
//! - The tick interval
//!
//! Configuration is stored at `~/.config/pomotick/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result};
use crate::timer::{Mode, ModeId, ModeRegistry};

/// Mode durations in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModesConfig {
    #[serde(default = "default_focus")]
    pub focus: u64,
    #[serde(default = "default_short_break")]
    pub short_break: u64,
    #[serde(default = "default_long_break")]
    pub long_break: u64,
    #[serde(default = "default_true")]
    pub long_break_enabled: bool,
}

/// Display labels per mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelsConfig {
    #[serde(default = "default_focus_label")]
    pub focus: String,
    #[serde(default = "default_short_break_label")]
    pub short_break: String,
    #[serde(default = "default_long_break_label")]
    pub long_break: String,
}

/// Countdown behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    /// Start counting right after an automatic mode change.
    #[serde(default)]
    pub auto_start: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotick/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// A timeout moves on to the next mode.
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    #[serde(default)]
    pub modes: ModesConfig,
    #[serde(default)]
    pub labels: LabelsConfig,
    #[serde(default)]
    pub timer: TimerConfig,
}

// Default functions
fn default_focus() -> u64 {
    25
}
fn default_short_break() -> u64 {
    5
}
fn default_long_break() -> u64 {
    15
}
fn default_focus_label() -> String {
    "Pomodoro".into()
}
fn default_short_break_label() -> String {
    "Short Break".into()
}
fn default_long_break_label() -> String {
    "Long Break".into()
}
fn default_tick_interval_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for ModesConfig {
    fn default() -> Self {
        Self {
            focus: default_focus(),
            short_break: default_short_break(),
            long_break: default_long_break(),
            long_break_enabled: true,
        }
    }
}

impl Default for LabelsConfig {
    fn default() -> Self {
        Self {
            focus: default_focus_label(),
            short_break: default_short_break_label(),
            long_break: default_long_break_label(),
        }
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            auto_start: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_advance: true,
            modes: ModesConfig::default(),
            labels: LabelsConfig::default(),
            timer: TimerConfig::default(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => value
                        .parse::<bool>()
                        .map(serde_json::Value::Bool)
                        .map_err(|e| invalid(e.to_string()))?,
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as a whole number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        return Err(invalid("cannot replace a whole section".into()));
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.registry()?;
                cfg.tick_interval()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key. Does not save.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value does not parse as
    /// the existing type, or the result is not a usable set of modes. The
    /// config is left unchanged on error.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        if let Err(e) = updated.registry().and_then(|_| updated.tick_interval()) {
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
            .into());
        }
        *self = updated;
        Ok(())
    }

    /// Build the mode registry described by this config.
    pub fn registry(&self) -> Result<ModeRegistry> {
        let mut modes = vec![
            Mode::new(ModeId::Focus, self.labels.focus.clone(), self.modes.focus),
            Mode::new(
                ModeId::ShortBreak,
                self.labels.short_break.clone(),
                self.modes.short_break,
            ),
        ];
        if self.modes.long_break_enabled {
            modes.push(Mode::new(
                ModeId::LongBreak,
                self.labels.long_break.clone(),
                self.modes.long_break,
            ));
        }
        ModeRegistry::new(modes)
    }

    pub fn tick_interval(&self) -> Result<Duration> {
        if self.timer.tick_interval_ms == 0 {
            return Err(CoreError::Config(ConfigError::InvalidValue {
                key: "timer.tick_interval_ms".into(),
                message: "must be greater than zero".into(),
            }));
        }
        Ok(Duration::from_millis(self.timer.tick_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert!(parsed.auto_advance);
        assert_eq!(parsed.modes.focus, 25);
        assert_eq!(parsed.labels.short_break, "Short Break");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[modes]\nfocus = 50\n").unwrap();
        assert_eq!(parsed.modes.focus, 50);
        assert_eq!(parsed.modes.short_break, 5);
        assert_eq!(parsed.timer.tick_interval_ms, 1000);
        assert!(parsed.auto_advance);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("auto_advance").as_deref(), Some("true"));
        assert_eq!(cfg.get("modes.focus").as_deref(), Some("25"));
        assert_eq!(cfg.get("labels.long_break").as_deref(), Some("Long Break"));
        assert!(cfg.get("modes.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("modes.short_break", "10").unwrap();
        cfg.set("timer.auto_start", "true").unwrap();
        cfg.set("labels.focus", "Deep Work").unwrap();
        assert_eq!(cfg.modes.short_break, 10);
        assert!(cfg.timer.auto_start);
        assert_eq!(cfg.labels.focus, "Deep Work");
    }

    #[test]
    fn set_rejects_unknown_key() {
        let mut cfg = Config::default();
        let err = cfg.set("modes.nonexistent_key", "1").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set("auto_advance", "not_a_bool").is_err());
        assert!(cfg.set("modes.focus", "-3").is_err());
        assert!(cfg.set("modes", "{}").is_err());
    }

    #[test]
    fn set_rejects_durations_the_registry_refuses() {
        let mut cfg = Config::default();
        let err = cfg.set("modes.focus", "90").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.modes.focus, 25);
    }

    #[test]
    fn registry_follows_config() {
        let mut cfg = Config::default();
        cfg.modes.long_break_enabled = false;
        cfg.labels.focus = "Focus".into();
        let reg = cfg.registry().unwrap();
        assert!(!reg.is_registered(ModeId::LongBreak));
        assert_eq!(reg.active().label, "Focus");
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let mut cfg = Config::default();
        cfg.timer.tick_interval_ms = 0;
        assert!(cfg.tick_interval().is_err());
        cfg.timer.tick_interval_ms = 250;
        assert_eq!(cfg.tick_interval().unwrap(), Duration::from_millis(250));
    }

    #[test]
    fn set_rejects_zero_tick_interval() {
        let mut cfg = Config::default();
        let err = cfg.set("timer.tick_interval_ms", "0").unwrap_err();
        assert!(matches!(err, CoreError::Config(ConfigError::InvalidValue { .. })));
        assert_eq!(cfg.timer.tick_interval_ms, 1000);
        cfg.set("timer.tick_interval_ms", "500").unwrap();
        assert_eq!(cfg.tick_interval().unwrap(), Duration::from_millis(500));
    }

    #[test]
    fn load_from_rejects_zero_tick_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[timer]\ntick_interval_ms = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn load_from_creates_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert_eq!(cfg.modes.focus, 25);
        assert!(path.exists());
    }

    #[test]
    fn load_from_reads_saved_changes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.set("modes.focus", "45").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().modes.focus, 45);
    }

    #[test]
    fn load_from_rejects_unusable_modes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[modes]\nfocus = 0\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
