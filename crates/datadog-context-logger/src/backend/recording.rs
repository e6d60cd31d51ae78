// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{extend_bound, merge_bound, Backend};
use crate::fields::Fields;
use crate::level::{AtomicLevel, Level};

/// A record as it reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub level: Level,
    pub message: String,
    pub fields: Fields,
}

/// In-memory spy backend.
///
/// Handles derived through [`Backend::with`] write to the same record list,
/// so a test can assert on everything a logger tree emitted. Fatal records
/// are captured like any other and the exit request is counted instead of
/// terminating the process.
#[derive(Debug, Clone)]
pub struct RecordingBackend {
    level: AtomicLevel,
    bound: Arc<Fields>,
    records: Arc<Mutex<Vec<Record>>>,
    fatal_exits: Arc<AtomicUsize>,
}

impl RecordingBackend {
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self::with_level(AtomicLevel::new(level))
    }

    #[must_use]
    pub fn with_level(level: AtomicLevel) -> Self {
        Self {
            level,
            bound: Arc::new(Fields::new()),
            records: Arc::new(Mutex::new(Vec::new())),
            fatal_exits: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Snapshot of every record emitted so far.
    #[must_use]
    pub fn records(&self) -> Vec<Record> {
        self.lock().clone()
    }

    #[must_use]
    pub fn last(&self) -> Option<Record> {
        self.lock().last().cloned()
    }

    /// Drains and returns the captured records.
    pub fn take(&self) -> Vec<Record> {
        std::mem::take(&mut *self.lock())
    }

    /// Number of times a logger asked this backend to terminate.
    #[must_use]
    pub fn fatal_exits(&self) -> usize {
        self.fatal_exits.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Record>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Backend for RecordingBackend {
    fn level(&self) -> &AtomicLevel {
        &self.level
    }

    fn emit(&self, level: Level, message: &str, fields: Fields) {
        let record = Record {
            level,
            message: message.to_string(),
            fields: merge_bound(&self.bound, fields),
        };
        self.lock().push(record);
    }

    fn with(&self, fields: Fields) -> Arc<dyn Backend> {
        Arc::new(Self {
            level: self.level.clone(),
            bound: extend_bound(&self.bound, fields),
            records: Arc::clone(&self.records),
            fatal_exits: Arc::clone(&self.fatal_exits),
        })
    }

    fn fatal_exit(&self) {
        self.fatal_exits.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_records_emissions() {
        let backend = RecordingBackend::new(Level::Debug);
        backend.emit(Level::Info, "one", Fields::new());
        backend.emit(Level::Warn, "two", Fields::new());

        let records = backend.take();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].level, Level::Warn);
        assert_eq!(records[1].message, "two");
        assert!(backend.records().is_empty());
    }

    #[test]
    fn test_derived_handle_shares_sink_and_level() {
        let backend = RecordingBackend::new(Level::Info);
        let derived = backend.with(Fields::from([("component".to_string(), json!("db"))]));

        derived.emit(Level::Info, "query", Fields::new());
        backend.emit(Level::Info, "plain", Fields::new());

        let records = backend.records();
        assert_eq!(records[0].fields.get("component"), Some(&json!("db")));
        assert!(records[1].fields.is_empty(), "parent handle stays unbound");

        backend.level().set(Level::Error);
        assert!(!derived.enabled(Level::Info));
    }

    #[test]
    fn test_fatal_exit_is_counted_across_handles() {
        let backend = RecordingBackend::new(Level::Debug);
        let derived = backend.with(Fields::new());

        backend.fatal_exit();
        derived.fatal_exit();
        assert_eq!(backend.fatal_exits(), 2);
    }
}
