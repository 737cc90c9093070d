//! TOML-based planner configuration.
//!
//! Stores the tunables of the timeline engine:
//! - Broadcast day target and tolerance band
//! - Gap-fill packing policy
//! - Recurrence overflow and precedence policy
//! - Default timeline anchor
//!
//! Configuration is stored at `~/.config/playout/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError};
use crate::fill::FillPolicy;
use crate::schedule::{MonthlyOverflow, Precedence, RecurrenceResolver};
use crate::validator::DayTarget;

/// Broadcast day configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayConfig {
    #[serde(default = "default_target_secs")]
    pub target_secs: f64,
    #[serde(default = "default_tolerance_ratio")]
    pub tolerance_ratio: f64,
}

/// Gap-fill configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FillConfig {
    #[serde(default = "default_overshoot")]
    pub overshoot_allowance_secs: f64,
    #[serde(default = "default_residual")]
    pub residual_threshold_secs: f64,
    #[serde(default = "default_attempts_per_filler")]
    pub attempts_per_filler: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

/// Recurrence configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default)]
    pub monthly_overflow: MonthlyOverflow,
    #[serde(default)]
    pub precedence: Precedence,
}

/// Timeline configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Where the broadcast day starts, seconds after midnight
    #[serde(default)]
    pub day_start_offset_secs: f64,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/playout/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Channel name written into exported program content.
    #[serde(default = "default_channel")]
    pub channel: String,
    #[serde(default)]
    pub day: DayConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub schedule: ScheduleConfig,
    #[serde(default)]
    pub timeline: TimelineConfig,
}

// Default functions
fn default_channel() -> String {
    "Channel 1".into()
}
fn default_target_secs() -> f64 {
    DayTarget::default().target_secs
}
fn default_tolerance_ratio() -> f64 {
    DayTarget::default().tolerance_ratio
}
fn default_overshoot() -> f64 {
    FillPolicy::default().overshoot_allowance_secs
}
fn default_residual() -> f64 {
    FillPolicy::default().residual_threshold_secs
}
fn default_attempts_per_filler() -> usize {
    FillPolicy::default().attempts_per_filler
}
fn default_max_attempts() -> usize {
    FillPolicy::default().max_attempts
}

impl Default for DayConfig {
    fn default() -> Self {
        Self {
            target_secs: default_target_secs(),
            tolerance_ratio: default_tolerance_ratio(),
        }
    }
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            overshoot_allowance_secs: default_overshoot(),
            residual_threshold_secs: default_residual(),
            attempts_per_filler: default_attempts_per_filler(),
            max_attempts: default_max_attempts(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channel: default_channel(),
            day: DayConfig::default(),
            fill: FillConfig::default(),
            schedule: ScheduleConfig::default(),
            timeline: TimelineConfig::default(),
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
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(ConfigError::UnknownKey(key.to_string()));
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current
                    .as_object_mut()
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
                let existing = obj
                    .get(part)
                    .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current
                .get_mut(part)
                .ok_or_else(|| ConfigError::UnknownKey(key.to_string()))?;
        }

        Err(ConfigError::UnknownKey(key.to_string()))
    }

    /// Location of the config file in the data directory.
    pub fn path() -> Result<PathBuf, CoreError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the data directory, writing defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, CoreError> {
        Self::load_from(&Self::path()?)
    }

    /// Load from an explicit path, writing defaults if the file is missing.
    pub fn load_from(path: &Path) -> Result<Self, CoreError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                CoreError::Config(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Persist to the data directory.
    pub fn save(&self) -> Result<(), CoreError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
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

    /// Every leaf setting as a `(dot.path, value)` pair, sorted by key.
    ///
    /// Each key is accepted by [`Config::get`] and [`Config::set`].
    pub fn entries(&self) -> Vec<(String, String)> {
        fn walk(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
            match value {
                serde_json::Value::Object(map) => {
                    for (name, child) in map {
                        let key = if prefix.is_empty() {
                            name.clone()
                        } else {
                            format!("{prefix}.{name}")
                        };
                        walk(&key, child, out);
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
        out.sort();
        out
    }

    /// Set a config value by key without persisting it.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// field's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        *self = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        Ok(())
    }

    pub fn day_target(&self) -> DayTarget {
        DayTarget {
            target_secs: self.day.target_secs,
            tolerance_ratio: self.day.tolerance_ratio,
        }
    }

    pub fn fill_policy(&self) -> FillPolicy {
        FillPolicy {
            overshoot_allowance_secs: self.fill.overshoot_allowance_secs,
            residual_threshold_secs: self.fill.residual_threshold_secs,
            attempts_per_filler: self.fill.attempts_per_filler,
            max_attempts: self.fill.max_attempts,
        }
    }

    pub fn recurrence_resolver(&self) -> RecurrenceResolver {
        RecurrenceResolver::new()
            .with_monthly_overflow(self.schedule.monthly_overflow)
            .with_precedence(self.schedule.precedence)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}
