// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! # Datadog Context Logger
//!
//! Structured logging that carries request-scoped metadata in an immutable
//! [`Context`] and attaches it to every record at emission time.
//!
//! ## Overview
//!
//! - [`context`]: persistent key-indexed carrier threaded through calls
//! - [`fields`], [`prefix`], [`metadata`]: what a scope can attach
//! - [`trace`]: trace/span correlation ids from the active tracer
//! - [`args`]: normalization of positional logging arguments
//! - [`logger`]: the [`Logger`] facade and its [`ContextLogger`] adapter
//! - [`backend`]: the engine boundary ([`TracingBackend`] for production)
//! - [`global`]: the process-wide default logger
//!
//! ## Example
//!
//! ```rust
//! use datadog_context_logger::{
//!     set_fields, set_prefix, set_sender, Context, ContextLogger, Fields, Logger, ServiceInfo,
//! };
//! use serde_json::json;
//!
//! # fn main() -> Result<(), datadog_context_logger::Error> {
//! let service = ServiceInfo {
//!     name: "checkout".to_string(),
//!     environment: "prod".to_string(),
//!     ..ServiceInfo::default()
//! };
//! let logger = ContextLogger::new("info", Some(&service))?;
//!
//! let ctx = set_sender(&Context::background(), "gateway");
//! let ctx = set_fields(&ctx, Fields::from([("request.id".to_string(), json!("r-42"))]));
//! let ctx = set_prefix(&ctx, "payment");
//!
//! // "payment: charge declined" with request.id, sender, amount and service.* fields
//! logger.warn(&ctx, &[&"charge declined", &"amount", &1299]);
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(unused_extern_crates)]
#![warn(unreachable_pub)]
#![allow(clippy::module_name_repetitions)]

pub mod args;
pub mod backend;
pub mod config;
pub mod context;
pub mod error;
pub mod fields;
pub mod global;
pub mod level;
pub mod logger;
pub mod metadata;
pub mod prefix;
pub mod service;
pub mod subscriber;
pub mod trace;

pub use backend::{Backend, NoopBackend, Record, RecordingBackend, TracingBackend};
pub use config::{LogFormat, LoggerConfig};
pub use context::{Context, ContextKey, Lookup};
pub use error::{Error, Result};
pub use fields::{get_fields, set_fields, with_fields, Fields};
pub use global::{default_logger, set_default_fields, set_default_logger};
pub use level::{global_level, level, set_level, AtomicLevel, Level};
pub use logger::{ContextLogger, Logger};
pub use metadata::{entrypoint, sender, set_entrypoint, set_sender};
pub use prefix::{get_prefix, set_prefix};
pub use service::ServiceInfo;
pub use trace::{extract_span_context, set_span_context, span_id, trace_id, SpanContext};
