// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use super::Backend;
use crate::fields::Fields;
use crate::level::{AtomicLevel, Level};

/// Backend that drops every record.
///
/// Fatal calls still terminate the process through the default
/// [`Backend::fatal_exit`].
#[derive(Debug, Clone, Default)]
pub struct NoopBackend {
    level: AtomicLevel,
}

impl NoopBackend {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for NoopBackend {
    fn level(&self) -> &AtomicLevel {
        &self.level
    }

    fn enabled(&self, _level: Level) -> bool {
        false
    }

    fn emit(&self, _level: Level, _message: &str, _fields: Fields) {}

    fn with(&self, _fields: Fields) -> Arc<dyn Backend> {
        Arc::new(self.clone())
    }
}
