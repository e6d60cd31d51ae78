// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Severity levels and the atomic threshold that gates emission.
//!
//! Levels are ordered from least to most severe:
//! - **DEBUG**: Diagnostic detail
//! - **INFO**: Normal operation
//! - **WARN**: Hazardous situations that may lead to errors
//! - **ERROR**: Failures of the current operation (process default)
//! - **FATAL**: Unrecoverable; the backend terminates the process after logging
//!
//! The threshold is a single atomic byte, so it can be changed at runtime
//! while other threads emit, without locking.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Deserializer};

use crate::error::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(u8)]
pub enum Level {
    Debug = 0,
    Info = 1,
    Warn = 2,
    #[default]
    Error = 3,
    Fatal = 4,
}

impl Level {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }

    const fn from_u8(value: u8) -> Self {
        match value {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            3 => Level::Error,
            _ => Level::Fatal,
        }
    }
}

impl AsRef<str> for Level {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses level tokens case-insensitively; `warning` is accepted for `warn`.
impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

/// Strict: an unknown token fails deserialization rather than falling back.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        Level::from_str(&token).map_err(serde::de::Error::custom)
    }
}

/// Shared, atomically adjustable severity threshold.
///
/// Clones share the same underlying value.
#[derive(Clone)]
pub struct AtomicLevel {
    inner: Arc<AtomicU8>,
}

impl AtomicLevel {
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[must_use]
    pub fn get(&self) -> Level {
        Level::from_u8(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Level) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }

    /// Returns true when records at `level` pass the threshold.
    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.get()
    }
}

impl Default for AtomicLevel {
    fn default() -> Self {
        Self::new(Level::default())
    }
}

impl fmt::Debug for AtomicLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AtomicLevel").field(&self.get()).finish()
    }
}

static GLOBAL_LEVEL: OnceLock<AtomicLevel> = OnceLock::new();

/// Process-wide threshold used by the default logger.
///
/// Starts at `DD_LOG_LEVEL` when it holds a valid token, `error` otherwise.
pub fn global_level() -> &'static AtomicLevel {
    GLOBAL_LEVEL.get_or_init(|| {
        let level = std::env::var("DD_LOG_LEVEL")
            .ok()
            .and_then(|token| Level::from_str(&token).ok())
            .unwrap_or_default();
        AtomicLevel::new(level)
    })
}

#[must_use]
pub fn level() -> Level {
    global_level().get()
}

pub fn set_level(level: Level) {
    global_level().set(level);
}
