// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Installation of the global `tracing` subscriber records are written to.
//!
//! Text output uses [`Formatter`]:
//! ```text
//! LEVEL | [span_name{span_fields}: ]message {event_fields}
//! ```
//!
//! JSON output uses [`JsonFormatter`], which lifts the record's structured
//! fields to top-level members:
//! ```text
//! {"level":"INFO","message":"order created","order.id":42,"service.name":"checkout"}
//! ```
//!
//! # Example
//!
//! ```text
//! INFO | order created fields=order.id=42 service.name=checkout
//! FATAL | handler{route="/pay"}: payment failed fatal=true fields=sender=gateway
//! ```
//!
//! Level filtering happens in the logger's atomic threshold, so the
//! subscriber accepts everything unless directives narrow it.

use std::fmt;

use serde_json::{Map, Value};
use tracing_core::field::{Field, Visit};
use tracing_core::{Event, Subscriber};
use tracing_subscriber::fmt::{
    format::{self, FormatEvent, FormatFields},
    FmtContext, FormattedFields,
};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggerConfig};
use crate::error::{Error, Result};

/// Directives applied before any configured ones.
const BASE_DIRECTIVES: &str = "trace,h2=off,hyper=off,rustls=off";

/// Event field marking a fatal record.
const FATAL_FIELD: &str = "fatal";
/// Event field holding the rendered structured fields of a record.
const RECORD_FIELDS_FIELD: &str = "fields";
const MESSAGE_FIELD: &str = "message";

/// Fatal records travel as ERROR events; they are labeled `FATAL` on output.
fn level_label(event: &Event<'_>) -> &'static str {
    let metadata = event.metadata();
    if metadata.fields().field(FATAL_FIELD).is_some() {
        "FATAL"
    } else {
        metadata.level().as_str()
    }
}

/// Plain-text event formatter.
#[derive(Debug, Clone, Copy)]
pub struct Formatter;

impl<S, N> FormatEvent<S, N> for Formatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        write!(&mut writer, "{} | ", level_label(event))?;

        if let Some(scope) = ctx.event_scope() {
            for span in scope.from_root() {
                write!(writer, "{}", span.name())?;

                let ext = span.extensions();
                if let Some(fields) = ext.get::<FormattedFields<N>>() {
                    if !fields.is_empty() {
                        write!(writer, "{{{fields}}}")?;
                    }
                }
                write!(writer, ": ")?;
            }
        }

        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

/// One JSON object per record.
///
/// The `fields` member written by the JSON backend is unpacked so every
/// structured field is a queryable top-level key. `level` and `message`
/// take precedence over fields of the same name.
#[derive(Debug, Clone, Copy)]
pub struct JsonFormatter;

impl<S, N> FormatEvent<S, N> for JsonFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = JsonVisitor::default();
        event.record(&mut visitor);

        let mut record = visitor.fields;
        if let Some(scope) = ctx.event_scope() {
            let spans: Vec<Value> = scope
                .from_root()
                .map(|span| Value::String(span.name().to_string()))
                .collect();
            record.insert("spans".to_string(), Value::Array(spans));
        }
        record.insert("level".to_string(), Value::from(level_label(event)));
        record.insert(MESSAGE_FIELD.to_string(), Value::String(visitor.message));

        let line = serde_json::to_string(&Value::Object(record)).map_err(|_| fmt::Error)?;
        writeln!(writer, "{line}")
    }
}

#[derive(Default)]
struct JsonVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl JsonVisitor {
    fn insert(&mut self, field: &Field, value: Value) {
        self.fields.insert(field.name().to_string(), value);
    }

    fn record_text(&mut self, field: &Field, text: String) {
        match field.name() {
            MESSAGE_FIELD => self.message = text,
            RECORD_FIELDS_FIELD => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(members)) => self.fields.extend(members),
                // logfmt-rendered fields stay a single string member
                _ => self.insert(field, Value::String(text)),
            },
            _ => self.insert(field, Value::String(text)),
        }
    }
}

impl Visit for JsonVisitor {
    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, Value::Bool(value));
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, Value::from(value));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.record_text(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.record_text(field, format!("{value:?}"));
    }
}

/// Builds the filter for `config`.
pub fn env_filter(config: &LoggerConfig) -> Result<EnvFilter> {
    let directives = match config.directives.as_deref() {
        Some(extra) => format!("{BASE_DIRECTIVES},{extra}"),
        None => BASE_DIRECTIVES.to_string(),
    };
    EnvFilter::try_new(&directives)
        .map_err(|e| Error::BackendInit(format!("invalid log directives '{directives}': {e}")))
}

/// Installs the global subscriber for `config`.
///
/// Fails if the directives do not parse or a global subscriber is already set.
pub fn init(config: &LoggerConfig) -> Result<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_level(true)
        .with_thread_names(false)
        .with_thread_ids(false)
        .with_line_number(false)
        .with_file(false)
        .with_target(false);

    let installed = match config.log_format {
        LogFormat::Text => builder.event_format(Formatter).try_init(),
        LogFormat::Json => builder.event_format(JsonFormatter).try_init(),
    };

    installed.map_err(|e| Error::BackendInit(e.to_string()))
}
