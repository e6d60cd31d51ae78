// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Backend boundary: the engine that filters, serializes and writes records.
//!
//! The logger never formats output itself. It only needs a backend to
//! - report whether a level passes its atomic threshold,
//! - emit one record with an arbitrary field set,
//! - derive a handle with fields permanently attached,
//! - terminate the process after a fatal record.

mod noop;
mod recording;
mod tracing_backend;

use std::fmt;
use std::sync::Arc;

use crate::fields::Fields;
use crate::level::{AtomicLevel, Level};

pub use noop::NoopBackend;
pub use recording::{Record, RecordingBackend};
pub use tracing_backend::TracingBackend;

pub const FATAL_EXIT_CODE: i32 = 1;

pub trait Backend: Send + Sync + fmt::Debug {
    /// Threshold consulted before every emission.
    fn level(&self) -> &AtomicLevel;

    fn enabled(&self, level: Level) -> bool {
        self.level().enabled(level)
    }

    /// Emits one record. Fields bound through [`Backend::with`] are added
    /// underneath `fields`; on a key collision the per-call value wins.
    fn emit(&self, level: Level, message: &str, fields: Fields);

    /// Derives a handle that attaches `fields` to every record it emits.
    fn with(&self, fields: Fields) -> Arc<dyn Backend>;

    /// Called after every fatal call, whether or not the record passed the
    /// threshold. Exits the process with status 1 unless overridden.
    fn fatal_exit(&self) {
        std::process::exit(FATAL_EXIT_CODE);
    }
}

/// Layers per-call `fields` over the handle's bound fields.
pub(crate) fn merge_bound(bound: &Fields, fields: Fields) -> Fields {
    if bound.is_empty() {
        return fields;
    }
    let mut merged = bound.clone();
    merged.extend(fields);
    merged
}

/// Extends a bound field set for a derived handle.
pub(crate) fn extend_bound(bound: &Arc<Fields>, fields: Fields) -> Arc<Fields> {
    if fields.is_empty() {
        return Arc::clone(bound);
    }
    Arc::new(merge_bound(bound, fields))
}
