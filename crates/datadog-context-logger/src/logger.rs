// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The logging facade and its context-aware backend adapter.
//!
//! Every leveled method comes in three shapes. The context prefix decorates
//! the plain and formatted messages only:
//!
//! ```rust
//! use datadog_context_logger::{Context, ContextLogger, Logger, set_prefix};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), datadog_context_logger::Error> {
//! let logger = ContextLogger::new("info", None)?;
//! let ctx = set_prefix(&Context::background(), "orders");
//!
//! // plain: message, then alternating key/value arguments
//! logger.info(&ctx, &[&"order created", &"order.id", &42]);
//! // formatted: substitution formatting, no pairing
//! logger.infof(&ctx, format_args!("order {} created", 42));
//! // keyed: message and structured values passed through as-is
//! logger.infow(&ctx, "order created", &[("order.id", json!(42))]);
//! # Ok(())
//! # }
//! ```
//!
//! # Field precedence
//!
//! From lowest to highest, a record is assembled from:
//! 1. fields bound to the handle (service identity, [`Logger::with`]),
//! 2. `sender`, `entrypoint`, `trace.id`, `span.id` from the context,
//! 3. fields set on the context with [`set_fields`](crate::set_fields),
//! 4. key/value pairs passed at the call site.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::args;
use crate::backend::{Backend, TracingBackend};
use crate::config::LoggerConfig;
use crate::context::Context;
use crate::error::Result;
use crate::fields::{get_fields, Fields};
use crate::level::{AtomicLevel, Level};
use crate::metadata;
use crate::prefix;
use crate::service::ServiceInfo;
use crate::trace;

pub const SENDER_KEY: &str = "sender";
pub const ENTRYPOINT_KEY: &str = "entrypoint";
pub const TRACE_ID_KEY: &str = "trace.id";
pub const SPAN_ID_KEY: &str = "span.id";

/// Positional arguments of the plain logging methods.
pub type Args<'a> = &'a [&'a dyn fmt::Display];

/// Explicit key/value pairs of the keyed logging methods.
pub type KeyValues<'a> = &'a [(&'a str, Value)];

/// Capability set application code logs through.
///
/// Implementors provide the three emission shapes for an arbitrary level and
/// [`Logger::with`]; the per-level methods are derived from them.
///
/// | Shape     | Message                          | Structured pairs              |
/// |-----------|----------------------------------|-------------------------------|
/// | plain     | `args[0]`, prefix-decorated      | `args[1..]` paired as strings |
/// | formatted | `format_args!` output, decorated | none                          |
/// | keyed     | `msg` as given                   | `key_values` verbatim         |
///
/// Every fatal method terminates the process after the record is handed to
/// the backend, even when the threshold filtered the record out.
pub trait Logger: Send + Sync {
    /// Plain form: `args[0]` is the message, the rest alternate key/value.
    ///
    /// # Arguments
    ///
    /// * `level` - Severity of the record
    /// * `ctx` - Context whose fields, prefix, tags and span enrich the record
    /// * `args` - Message followed by alternating keys and values
    fn log(&self, level: Level, ctx: &Context, args: Args<'_>);

    /// Formatted form: the message is `args` rendered, prefix-decorated.
    fn logf(&self, level: Level, ctx: &Context, args: fmt::Arguments<'_>);

    /// Keyed form: `msg` is emitted as given and `key_values` are attached
    /// verbatim, keeping their JSON types.
    fn logw(&self, level: Level, ctx: &Context, msg: &str, key_values: KeyValues<'_>);

    /// Derives a logger that attaches `key_values` to every record,
    /// regardless of the context passed at the call site.
    ///
    /// # Example
    ///
    /// ```
    /// use datadog_context_logger::{Context, ContextLogger, Logger};
    /// use serde_json::json;
    ///
    /// # fn main() -> Result<(), datadog_context_logger::Error> {
    /// let logger = ContextLogger::new("debug", None)?;
    /// let scheduler = logger.with(&[("component", json!("scheduler"))]);
    /// scheduler.debug(&Context::background(), &[&"tick"]);
    /// # Ok(())
    /// # }
    /// ```
    fn with(&self, key_values: KeyValues<'_>) -> Arc<dyn Logger>;

    /// Logs at fatal level, then terminates the process.
    fn fatal(&self, ctx: &Context, args: Args<'_>) {
        self.log(Level::Fatal, ctx, args);
    }

    /// Formatted fatal record, then terminates the process.
    fn fatalf(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logf(Level::Fatal, ctx, args);
    }

    /// Keyed fatal record, then terminates the process.
    fn fatalw(&self, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        self.logw(Level::Fatal, ctx, msg, key_values);
    }

    /// Logs a failure of the current operation.
    fn error(&self, ctx: &Context, args: Args<'_>) {
        self.log(Level::Error, ctx, args);
    }

    fn errorf(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logf(Level::Error, ctx, args);
    }

    fn errorw(&self, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        self.logw(Level::Error, ctx, msg, key_values);
    }

    /// Logs a hazardous situation that may lead to errors.
    fn warn(&self, ctx: &Context, args: Args<'_>) {
        self.log(Level::Warn, ctx, args);
    }

    fn warnf(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logf(Level::Warn, ctx, args);
    }

    fn warnw(&self, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        self.logw(Level::Warn, ctx, msg, key_values);
    }

    /// Logs normal operation.
    fn info(&self, ctx: &Context, args: Args<'_>) {
        self.log(Level::Info, ctx, args);
    }

    fn infof(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logf(Level::Info, ctx, args);
    }

    fn infow(&self, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        self.logw(Level::Info, ctx, msg, key_values);
    }

    /// Logs diagnostic detail.
    fn debug(&self, ctx: &Context, args: Args<'_>) {
        self.log(Level::Debug, ctx, args);
    }

    fn debugf(&self, ctx: &Context, args: fmt::Arguments<'_>) {
        self.logf(Level::Debug, ctx, args);
    }

    fn debugw(&self, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        self.logw(Level::Debug, ctx, msg, key_values);
    }
}

/// [`Logger`] that enriches every record from the [`Context`] before handing
/// it to a [`Backend`].
#[derive(Debug, Clone)]
pub struct ContextLogger {
    backend: Arc<dyn Backend>,
}

impl ContextLogger {
    /// Builds a `tracing`-backed logger with its own threshold.
    ///
    /// # Arguments
    ///
    /// * `level` - Level token such as `"info"` or `"warn"`
    /// * `service` - Identity bound once into the backend; empty members are skipped
    ///
    /// # Errors
    ///
    /// Fails when `level` is not a recognized level token.
    pub fn new(level: &str, service: Option<&ServiceInfo>) -> Result<Self> {
        let level = AtomicLevel::new(level.parse()?);
        Ok(Self::with_backend(
            Arc::new(TracingBackend::new(level)),
            service,
        ))
    }

    /// Builds a `tracing`-backed logger from `config`, with its own threshold
    /// starting at the configured level.
    ///
    /// # Arguments
    ///
    /// * `config` - Level token, output format and service identity
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidLevel`](crate::Error::InvalidLevel) when the
    /// configured level is not recognized.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        Self::from_config_with_level(config, AtomicLevel::new(config.level()?))
    }

    /// Like [`ContextLogger::from_config`], but gated by an existing
    /// threshold. The configured level is validated, not applied.
    pub fn from_config_with_level(config: &LoggerConfig, level: AtomicLevel) -> Result<Self> {
        config.validate()?;
        let backend = TracingBackend::new(level).with_format(config.log_format);
        Ok(Self::with_backend(Arc::new(backend), Some(&config.service)))
    }

    /// Wraps `backend`, binding the non-empty members of `service` once.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn Backend>, service: Option<&ServiceInfo>) -> Self {
        let logger = Self { backend };
        match service {
            Some(service) => logger.with_service(service),
            None => logger,
        }
    }

    /// Returns a copy with the identity fields of `service` bound.
    #[must_use]
    pub fn with_service(&self, service: &ServiceInfo) -> Self {
        let fields = service.fields();
        if fields.is_empty() {
            return self.clone();
        }
        Self {
            backend: self.backend.with(fields),
        }
    }

    /// Threshold gating this logger and every handle derived from it.
    #[must_use]
    pub fn level(&self) -> &AtomicLevel {
        self.backend.level()
    }

    /// Fields derived from the context for one emission.
    fn context_fields(ctx: &Context) -> Fields {
        let mut fields = get_fields(ctx).map(|f| (*f).clone()).unwrap_or_default();

        let synthetic = [
            (SENDER_KEY, metadata::sender(ctx).unwrap_or_default().to_string()),
            (
                ENTRYPOINT_KEY,
                metadata::entrypoint(ctx).unwrap_or_default().to_string(),
            ),
            (TRACE_ID_KEY, trace::trace_id(ctx)),
            (SPAN_ID_KEY, trace::span_id(ctx)),
        ];
        for (key, value) in synthetic {
            if !value.is_empty() {
                fields
                    .entry(key.to_string())
                    .or_insert(Value::String(value));
            }
        }

        fields
    }

    /// Fatal calls terminate even when the record itself was filtered out.
    fn exit_if_fatal(&self, level: Level) {
        if level == Level::Fatal {
            self.backend.fatal_exit();
        }
    }
}

impl Logger for ContextLogger {
    fn log(&self, level: Level, ctx: &Context, args: Args<'_>) {
        if self.backend.enabled(level) {
            let normalized = args::normalize(ctx, args);
            let mut fields = Self::context_fields(ctx);
            fields.extend(
                normalized
                    .pairs
                    .into_iter()
                    .map(|(key, value)| (key, Value::String(value))),
            );

            self.backend.emit(level, &normalized.message, fields);
        }
        self.exit_if_fatal(level);
    }

    fn logf(&self, level: Level, ctx: &Context, args: fmt::Arguments<'_>) {
        if self.backend.enabled(level) {
            let message = prefix::decorate(ctx, &args.to_string());
            self.backend.emit(level, &message, Self::context_fields(ctx));
        }
        self.exit_if_fatal(level);
    }

    fn logw(&self, level: Level, ctx: &Context, msg: &str, key_values: KeyValues<'_>) {
        if self.backend.enabled(level) {
            let mut fields = Self::context_fields(ctx);
            fields.extend(
                key_values
                    .iter()
                    .map(|(key, value)| ((*key).to_string(), value.clone())),
            );

            self.backend.emit(level, msg, fields);
        }
        self.exit_if_fatal(level);
    }

    fn with(&self, key_values: KeyValues<'_>) -> Arc<dyn Logger> {
        let fields: Fields = key_values
            .iter()
            .map(|(key, value)| ((*key).to_string(), value.clone()))
            .collect();

        Arc::new(Self {
            backend: self.backend.with(fields),
        })
    }
}
