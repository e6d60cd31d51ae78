// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Logger configuration from environment variables or config files.
//!
//! | Variable            | Member       | Default |
//! |---------------------|--------------|---------|
//! | `DD_LOG_LEVEL`      | `log_level`  | `error` |
//! | `DD_LOG_FORMAT`     | `log_format` | `text`  |
//! | `DD_LOG_DIRECTIVES` | `directives` | none    |
//! | `DD_ENV`            | `service.environment` | empty |
//! | `DD_SERVICE`        | `service.name`        | empty |
//! | `DD_VERSION`        | `service.version`     | empty |
//! | `DD_INSTANCE_ID`    | `service.instance_id` | empty |

use std::env;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::level::Level;
use crate::service::ServiceInfo;

pub const DEFAULT_LOG_LEVEL: &str = "error";

/// Output encoding of the `tracing` backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// `LEVEL | message key=value ...`
    #[default]
    Text,
    /// One JSON object per line.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Invalid log format: '{s}'. Valid formats are: text, json")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Level token, validated when a logger is built from this config.
    pub log_level: String,
    pub log_format: LogFormat,
    pub service: ServiceInfo,
    /// Extra `EnvFilter` directives for the installed subscriber,
    /// e.g. `hyper=off,h2=off`.
    pub directives: Option<String>,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::default(),
            service: ServiceInfo::default(),
            directives: None,
        }
    }
}

impl LoggerConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Create configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).unwrap_or_default();

        let log_level = lookup("DD_LOG_LEVEL")
            .map(|val| val.trim().to_lowercase())
            .filter(|val| !val.is_empty())
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());

        let log_format = match lookup("DD_LOG_FORMAT") {
            Some(val) if !val.trim().is_empty() => {
                LogFormat::from_str(&val).map_err(Error::InvalidConfig)?
            }
            _ => LogFormat::default(),
        };

        let directives = lookup("DD_LOG_DIRECTIVES").filter(|val| !val.trim().is_empty());

        let config = Self {
            log_level,
            log_format,
            service: ServiceInfo {
                environment: var("DD_ENV"),
                name: var("DD_SERVICE"),
                version: var("DD_VERSION"),
                instance_id: var("DD_INSTANCE_ID"),
            },
            directives,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.level().map(|_| ())
    }

    pub fn level(&self) -> Result<Level> {
        Level::from_str(&self.log_level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, LoggerConfig::default());
        assert_eq!(config.level().unwrap(), Level::Error);
        assert!(config.service.is_empty());
    }

    #[test]
    fn test_from_lookup() {
        let config = LoggerConfig::from_lookup(lookup(&[
            ("DD_LOG_LEVEL", "DEBUG"),
            ("DD_LOG_FORMAT", "json"),
            ("DD_LOG_DIRECTIVES", "hyper=off"),
            ("DD_ENV", "staging"),
            ("DD_SERVICE", "payments"),
            ("DD_VERSION", "2.0.1"),
            ("DD_INSTANCE_ID", "pod-7"),
        ]))
        .unwrap();

        assert_eq!(config.level().unwrap(), Level::Debug);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.directives.as_deref(), Some("hyper=off"));
        assert_eq!(config.service.environment, "staging");
        assert_eq!(config.service.name, "payments");
        assert_eq!(config.service.version, "2.0.1");
        assert_eq!(config.service.instance_id, "pod-7");
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let err = LoggerConfig::from_lookup(lookup(&[("DD_LOG_LEVEL", "chatty")])).unwrap_err();
        assert!(matches!(err, Error::InvalidLevel(_)));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let err = LoggerConfig::from_lookup(lookup(&[("DD_LOG_FORMAT", "xml")])).unwrap_err();
        assert!(err.to_string().contains("Invalid log format: 'xml'"));
    }

    #[test]
    fn test_deserialize_config() {
        let config: LoggerConfig = serde_json::from_value(json!({
            "log_level": "info",
            "log_format": "json",
            "service": { "name": "api" }
        }))
        .unwrap();

        assert_eq!(config.level().unwrap(), Level::Info);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.service.name, "api");
        assert_eq!(config.directives, None);
    }
}
