//! Store configuration
//!
//! Every setting has a default and can be overridden by an environment
//! variable:
//!
//! | Field | Variable | Default |
//! |---|---|---|
//! | `storage_key` | `VIBES_STORAGE_KEY` | `venue-vibes-store` |
//! | `storage_dir` | `VIBES_STORAGE_DIR` | `.vibes` |
//! | `persisted_message_window` | `VIBES_PERSISTED_MESSAGES` | 50 |
//! | `cleanup_interval` | `VIBES_CLEANUP_INTERVAL_SECS` | 300 s |
//! | `cleanup_message_window` | `VIBES_CLEANUP_MESSAGES` | 50 |
//! | `notification_max_age` | `VIBES_NOTIFICATION_MAX_AGE_SECS` | 3600 s |
//! | `trace_history` | `VIBES_TRACE_HISTORY` | 200 (at most 1000) |
//! | `broadcast_capacity` | `VIBES_BROADCAST_CAPACITY` | 64 |
//! | `shutdown_timeout` | `VIBES_SHUTDOWN_TIMEOUT_SECS` | 5 s |
//!
//! # Example
//!
//! ```no_run
//! use vibes_store::config::AppConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! println!("Persisting under {}", config.storage_key);
//! # Ok(())
//! # }
//! ```

use crate::devtools::MAX_TRACE_HISTORY;
use crate::environment::RetentionPolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use vibes_runtime::StoreConfig;

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable is set but cannot be used
    #[error("invalid value {value:?} for {var}: {reason}")]
    Invalid {
        /// Variable name
        var: &'static str,
        /// Offending value
        value: String,
        /// What was expected
        reason: &'static str,
    },
}

/// Application store configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Storage key the snapshot is written under
    pub storage_key: String,
    /// Directory for file-backed storage
    pub storage_dir: PathBuf,
    /// Chat messages included in the snapshot
    pub persisted_message_window: usize,
    /// Time between cleanup sweeps
    pub cleanup_interval: Duration,
    /// Chat messages kept by the cleanup sweep
    pub cleanup_message_window: usize,
    /// Notifications at least this old are swept
    pub notification_max_age: Duration,
    /// Entries kept by the devtools action log
    pub trace_history: usize,
    /// Buffered traces per live subscriber
    pub broadcast_capacity: usize,
    /// How long shutdown waits for an in-flight action to commit
    pub shutdown_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_key: "venue-vibes-store".to_string(),
            storage_dir: PathBuf::from(".vibes"),
            persisted_message_window: 50,
            cleanup_interval: Duration::from_secs(300),
            cleanup_message_window: 50,
            notification_max_age: Duration::from_secs(3600),
            trace_history: 200,
            broadcast_capacity: 64,
            shutdown_timeout: Duration::from_secs(5),
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment variables
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unusable
    /// value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration from any variable source
    ///
    /// Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if a variable is set to an unusable
    /// value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(key) = lookup("VIBES_STORAGE_KEY") {
            config.storage_key = key;
        }
        if let Some(dir) = lookup("VIBES_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }
        if let Some(n) = parse(&lookup, "VIBES_PERSISTED_MESSAGES")? {
            config.persisted_message_window = n;
        }
        if let Some(secs) = parse(&lookup, "VIBES_CLEANUP_INTERVAL_SECS")? {
            config.cleanup_interval = Duration::from_secs(secs);
        }
        if let Some(n) = parse(&lookup, "VIBES_CLEANUP_MESSAGES")? {
            config.cleanup_message_window = n;
        }
        if let Some(secs) = parse(&lookup, "VIBES_NOTIFICATION_MAX_AGE_SECS")? {
            config.notification_max_age = Duration::from_secs(secs);
        }
        if let Some(n) = parse(&lookup, "VIBES_TRACE_HISTORY")? {
            config.trace_history = n;
        }
        if let Some(n) = parse(&lookup, "VIBES_BROADCAST_CAPACITY")? {
            config.broadcast_capacity = n;
        }
        if let Some(secs) = parse(&lookup, "VIBES_SHUTDOWN_TIMEOUT_SECS")? {
            config.shutdown_timeout = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    /// Check values that parse but cannot work
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad setting.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.storage_key.trim().is_empty() {
            return Err(invalid("VIBES_STORAGE_KEY", &self.storage_key, "must not be empty"));
        }
        if self.cleanup_interval.is_zero() {
            return Err(invalid("VIBES_CLEANUP_INTERVAL_SECS", "0", "must be at least 1"));
        }
        if self.trace_history > MAX_TRACE_HISTORY {
            return Err(invalid(
                "VIBES_TRACE_HISTORY",
                &self.trace_history.to_string(),
                "must be at most 1000",
            ));
        }
        if self.broadcast_capacity == 0 {
            return Err(invalid("VIBES_BROADCAST_CAPACITY", "0", "must be at least 1"));
        }
        if chrono::Duration::from_std(self.notification_max_age).is_err() {
            return Err(invalid(
                "VIBES_NOTIFICATION_MAX_AGE_SECS",
                &self.notification_max_age.as_secs().to_string(),
                "out of range",
            ));
        }
        Ok(())
    }

    /// Limits for the cleanup sweep
    #[must_use]
    pub fn retention(&self) -> RetentionPolicy {
        RetentionPolicy {
            message_window: self.cleanup_message_window,
            notification_max_age: chrono::Duration::from_std(self.notification_max_age)
                .unwrap_or(chrono::Duration::MAX),
        }
    }

    /// Runtime settings for the underlying store
    #[must_use]
    pub const fn store_config(&self) -> StoreConfig {
        StoreConfig::new(self.broadcast_capacity, self.shutdown_timeout)
    }
}

fn parse<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(var)
        .map(|raw| {
            raw.trim()
                .parse()
                .map_err(|_| invalid(var, &raw, "expected a non-negative integer"))
        })
        .transpose()
}

fn invalid(var: &'static str, value: &str, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        var,
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var: &str| vars.get(var).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = AppConfig::from_lookup(lookup(&[])).ok();
        assert_eq!(config, Some(AppConfig::default()));
    }

    #[test]
    fn variables_override_defaults() {
        let config = AppConfig::from_lookup(lookup(&[
            ("VIBES_STORAGE_KEY", "custom"),
            ("VIBES_PERSISTED_MESSAGES", "20"),
            ("VIBES_CLEANUP_INTERVAL_SECS", "60"),
            ("VIBES_NOTIFICATION_MAX_AGE_SECS", " 120 "),
        ]))
        .ok();

        let config = config.unwrap_or_default();
        assert_eq!(config.storage_key, "custom");
        assert_eq!(config.persisted_message_window, 20);
        assert_eq!(config.cleanup_interval, Duration::from_secs(60));
        assert_eq!(config.retention().notification_max_age, chrono::Duration::minutes(2));
    }

    #[test]
    fn rejects_non_numeric() {
        let err = AppConfig::from_lookup(lookup(&[("VIBES_TRACE_HISTORY", "lots")])).err();
        assert_eq!(
            err,
            Some(ConfigError::Invalid {
                var: "VIBES_TRACE_HISTORY",
                value: "lots".to_string(),
                reason: "expected a non-negative integer",
            })
        );
    }

    #[test]
    fn rejects_zero_interval() {
        let result = AppConfig::from_lookup(lookup(&[("VIBES_CLEANUP_INTERVAL_SECS", "0")]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { var: "VIBES_CLEANUP_INTERVAL_SECS", .. })
        ));
    }

    #[test]
    fn rejects_oversized_trace_history() {
        let result = AppConfig::from_lookup(lookup(&[("VIBES_TRACE_HISTORY", "5000")]));
        assert!(matches!(result, Err(ConfigError::Invalid { var: "VIBES_TRACE_HISTORY", .. })));
    }

    #[test]
    fn store_config_carries_runtime_settings() {
        let config = AppConfig::default();
        let store = config.store_config();
        assert_eq!(store.broadcast_capacity, 64);
        assert_eq!(store.default_shutdown_timeout, Duration::from_secs(5));
    }
}
