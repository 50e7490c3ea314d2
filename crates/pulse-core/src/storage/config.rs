//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Breathing pattern and lead-in for the calming flow
//! - Timing of the auto-advancing flow steps
//! - Routine playback (quick mode, tick length)
//! - Sound selection behaviour
//!
//! Configuration is stored at `<data_dir>/config.toml`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::{ConfigError, Result};
use crate::routine::{BreathPattern, FlowSettings};

pub const CONFIG_FILE: &str = "config.toml";

/// Breathing pattern used by the calming flow and `breathe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathingConfig {
    #[serde(default = "default_inhale")]
    pub inhale: u64,
    #[serde(default = "default_hold")]
    pub hold: u64,
    #[serde(default = "default_exhale")]
    pub exhale: u64,
    /// "Prepare to breathe" countdown before the first inhale.
    #[serde(default = "default_lead_in")]
    pub lead_in: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowConfig {
    #[serde(default = "default_coping_secs")]
    pub coping_secs: u64,
    #[serde(default = "default_closure_secs")]
    pub closure_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutinesConfig {
    /// Play every phase for one second.
    #[serde(default)]
    pub quick: bool,
    /// Length of one tick in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub avoid_repeat: bool,
}

/// Application configuration.
///
/// Serialized to/from TOML at `<data_dir>/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub breathing: BreathingConfig,
    #[serde(default)]
    pub flow: FlowConfig,
    #[serde(default)]
    pub routines: RoutinesConfig,
    #[serde(default)]
    pub sounds: SoundsConfig,
}

// Default functions
fn default_inhale() -> u64 {
    4
}
fn default_hold() -> u64 {
    4
}
fn default_exhale() -> u64 {
    6
}
fn default_lead_in() -> u64 {
    5
}
fn default_coping_secs() -> u64 {
    4
}
fn default_closure_secs() -> u64 {
    6
}
fn default_tick_ms() -> u64 {
    1000
}
fn default_true() -> bool {
    true
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            inhale: default_inhale(),
            hold: default_hold(),
            exhale: default_exhale(),
            lead_in: default_lead_in(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            coping_secs: default_coping_secs(),
            closure_secs: default_closure_secs(),
        }
    }
}

impl Default for RoutinesConfig {
    fn default() -> Self {
        Self {
            quick: false,
            tick_ms: default_tick_ms(),
        }
    }
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self { avoid_repeat: true }
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
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join(CONFIG_FILE))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
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

    /// Persist to disk.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// # Errors
    /// See [`Config::save`].
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "using default configuration");
            Self::default()
        })
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(_) => None,
            other => Some(other.to_string()),
        }
    }

    /// Every leaf as `(dot.path, value)`, sorted by key.
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (k, v) in map {
                        let path = if prefix.is_empty() {
                            k.clone()
                        } else {
                            format!("{prefix}.{k}")
                        };
                        walk(&path, v, out);
                    }
                }
                serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
                other => out.push((prefix.to_string(), other.to_string())),
            }
        }

        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            walk("", &json, &mut out);
        }
        out
    }

    /// Set a config value in memory by dot-separated key.
    ///
    /// # Errors
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the result is not a usable configuration.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    ///
    /// # Errors
    /// Same as [`Config::set_value`], plus save failures.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.set_value(key, value)?;
        self.save()
    }

    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] for values the sequencer cannot run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.breath_pattern()
            .validate()
            .map_err(|message| ConfigError::InvalidValue {
                key: "breathing".into(),
                message,
            })?;
        if self.routines.tick_ms == 0 {
            return Err(ConfigError::InvalidValue {
                key: "routines.tick_ms".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    pub fn breath_pattern(&self) -> BreathPattern {
        BreathPattern::with_hold(self.breathing.inhale, self.breathing.hold, self.breathing.exhale)
    }

    pub fn flow_settings(&self) -> FlowSettings {
        FlowSettings {
            breath: self.breath_pattern(),
            lead_in_secs: self.breathing.lead_in,
            coping_secs: self.flow.coping_secs,
            closure_secs: self.flow.closure_secs,
        }
    }

    pub fn tick(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.routines.tick_ms.max(1))
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
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn defaults_match_flow_settings() {
        assert_eq!(Config::default().flow_settings(), FlowSettings::default());
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[breathing]\nexhale = 8\n").unwrap();
        assert_eq!(cfg.breathing.exhale, 8);
        assert_eq!(cfg.breathing.inhale, 4);
        assert_eq!(cfg.routines.tick_ms, 1000);
        assert!(cfg.sounds.avoid_repeat);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("breathing.inhale").as_deref(), Some("4"));
        assert_eq!(cfg.get("sounds.avoid_repeat").as_deref(), Some("true"));
        assert!(cfg.get("breathing.missing_key").is_none());
        assert!(cfg.get("breathing").is_none());
    }

    #[test]
    fn set_value_updates_nested_number_and_bool() {
        let mut cfg = Config::default();
        cfg.set_value("breathing.hold", "0").unwrap();
        cfg.set_value("routines.quick", "true").unwrap();
        assert_eq!(cfg.breathing.hold, 0);
        assert!(cfg.routines.quick);
    }

    #[test]
    fn set_value_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.set_value("breathing.nope", "1"),
            Err(crate::error::CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.set_value("", "1").is_err());
        assert!(cfg.set_value("flow", "1").is_err());
    }

    #[test]
    fn set_value_rejects_invalid_type() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("sounds.avoid_repeat", "sometimes").is_err());
        assert!(cfg.set_value("breathing.inhale", "-1").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_value_rejects_unrunnable_pattern() {
        let mut cfg = Config::default();
        assert!(cfg.set_value("breathing.exhale", "0").is_err());
        assert!(cfg.set_value("routines.tick_ms", "0").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn entries_list_every_leaf() {
        let keys: Vec<_> = Config::default().entries().into_iter().map(|(k, _)| k).collect();
        assert!(keys.contains(&"breathing.lead_in".to_string()));
        assert!(keys.contains(&"flow.closure_secs".to_string()));
        assert!(keys.contains(&"routines.tick_ms".to_string()));
        assert_eq!(keys.len(), 9);
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
        assert!(path.exists());

        let mut cfg = Config::default();
        cfg.set_value("flow.coping_secs", "7").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().flow.coping_secs, 7);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "breathing = 3").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(crate::error::CoreError::Config(ConfigError::LoadFailed { .. }))
        ));
    }
}
