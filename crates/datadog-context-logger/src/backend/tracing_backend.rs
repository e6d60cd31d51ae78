// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Backend that forwards records to the `tracing` ecosystem.
//!
//! `tracing` field names are static, so the dynamic field set of a record is
//! rendered into a single `fields` value: logfmt for text output, a JSON
//! object for JSON output. [`JsonFormatter`](crate::subscriber::JsonFormatter)
//! unpacks the JSON object back into top-level record members.
//!
//! Fatal records are ERROR events carrying `fatal=true`; terminating the
//! process is left to [`Backend::fatal_exit`].
//!
//! ```text
//! INFO | order created fields=order.id=42 service.name=checkout trace.id=4bf9...
//! ```

use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde_json::Value;
use tracing::Level as TracingLevel;

use super::{extend_bound, merge_bound, Backend};
use crate::config::LogFormat;
use crate::fields::Fields;
use crate::level::{AtomicLevel, Level};

macro_rules! emit_event {
    ($level:expr, $message:ident, $fields:ident) => {
        if $fields.is_empty() {
            tracing::event!($level, "{}", $message)
        } else {
            tracing::event!($level, fields = %$fields, "{}", $message)
        }
    };
}

#[derive(Debug, Clone)]
pub struct TracingBackend {
    level: AtomicLevel,
    format: LogFormat,
    bound: Arc<Fields>,
}

impl TracingBackend {
    #[must_use]
    pub fn new(level: AtomicLevel) -> Self {
        Self {
            level,
            format: LogFormat::default(),
            bound: Arc::new(Fields::new()),
        }
    }

    #[must_use]
    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }
}

impl Backend for TracingBackend {
    fn level(&self) -> &AtomicLevel {
        &self.level
    }

    fn emit(&self, level: Level, message: &str, fields: Fields) {
        let fields = merge_bound(&self.bound, fields);
        let rendered = RenderedFields {
            fields: &fields,
            format: self.format,
        };

        match level {
            Level::Debug => emit_event!(TracingLevel::DEBUG, message, rendered),
            Level::Info => emit_event!(TracingLevel::INFO, message, rendered),
            Level::Warn => emit_event!(TracingLevel::WARN, message, rendered),
            Level::Error => emit_event!(TracingLevel::ERROR, message, rendered),
            Level::Fatal => {
                if rendered.is_empty() {
                    tracing::error!(fatal = true, "{}", message);
                } else {
                    tracing::error!(fatal = true, fields = %rendered, "{}", message);
                }
            }
        }
    }

    fn with(&self, fields: Fields) -> Arc<dyn Backend> {
        Arc::new(Self {
            level: self.level.clone(),
            format: self.format,
            bound: extend_bound(&self.bound, fields),
        })
    }
}

/// Lazily renders a field set when the subscriber records the event.
struct RenderedFields<'a> {
    fields: &'a Fields,
    format: LogFormat,
}

impl RenderedFields<'_> {
    fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for RenderedFields<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            LogFormat::Json => {
                let object: serde_json::Map<String, Value> = self
                    .fields
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect();
                write!(f, "{}", Value::Object(object))
            }
            LogFormat::Text => {
                for (i, (key, value)) in self.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_char(' ')?;
                    }
                    write!(f, "{key}=")?;
                    write_logfmt_value(f, value)?;
                }
                Ok(())
            }
        }
    }
}

/// Strings are written bare unless they need quoting; other values as JSON.
fn write_logfmt_value(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::String(s) if s.is_empty() => f.write_str("\"\""),
        Value::String(s) if s.contains(|c: char| c.is_whitespace() || c == '"' || c == '=') => {
            write!(f, "{s:?}")
        }
        Value::String(s) => f.write_str(s),
        other => write!(f, "{other}"),
    }
}
