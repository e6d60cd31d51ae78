// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Text map propagators for Datadog and W3C TraceContext headers.
//!
//! Only the trace and span ids are read: the logger correlates records with
//! the tracer's span, it never originates or forwards trace context.
//!
//! **Datadog headers:**
//! ```text
//! x-datadog-trace-id: 1234567890
//! x-datadog-parent-id: 9876543210
//! x-datadog-tags: _dd.p.dm=-3,_dd.p.tid=640cfd8d00000000
//! ```
//!
//! **W3C TraceContext:**
//! ```text
//! traceparent: 00-4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7-01
//! ```

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use crate::trace::carrier::Extractor;
use crate::trace::span_context::SpanContext;

pub const DATADOG_TRACE_ID_KEY: &str = "x-datadog-trace-id";
pub const DATADOG_PARENT_ID_KEY: &str = "x-datadog-parent-id";
pub const DATADOG_TAGS_KEY: &str = "x-datadog-tags";
pub const DATADOG_HIGHER_ORDER_TRACE_ID_BITS_KEY: &str = "_dd.p.tid";

pub const TRACEPARENT_KEY: &str = "traceparent";

lazy_static! {
    static ref TRACEPARENT_REGEX: Regex =
        Regex::new(r"(?i)^([a-f0-9]{2})-([a-f0-9]{32})-([a-f0-9]{16})-([a-f0-9]{2})(-.*)?$")
            .expect("failed creating regex");
    static ref INVALID_SEGMENT_REGEX: Regex = Regex::new(r"^0+$").expect("failed creating regex");
}

/// Failure to decode propagation headers. Logged, never returned to callers
/// of the logging API.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
#[error("Cannot extract from {message}, {propagator_name}")]
pub struct PropagationError {
    message: &'static str,
    propagator_name: &'static str,
}

impl PropagationError {
    #[must_use]
    pub fn extract(message: &'static str, propagator_name: &'static str) -> Self {
        Self {
            message,
            propagator_name,
        }
    }
}

pub trait Propagator {
    fn extract(&self, carrier: &dyn Extractor) -> Option<SpanContext>;
}

/// Extracts Datadog's native `x-datadog-*` headers.
#[derive(Clone, Copy, Debug, Default)]
pub struct DatadogHeaderPropagator;

impl Propagator for DatadogHeaderPropagator {
    fn extract(&self, carrier: &dyn Extractor) -> Option<SpanContext> {
        match Self::extract_context(carrier) {
            Ok(context) => Some(context),
            Err(e) => {
                debug!("{e}");
                None
            }
        }
    }
}

impl DatadogHeaderPropagator {
    fn extract_context(carrier: &dyn Extractor) -> Result<SpanContext, PropagationError> {
        let trace_id_low = Self::extract_trace_id(carrier)?;
        let span_id = carrier
            .get(DATADOG_PARENT_ID_KEY)
            .and_then(|id| id.parse::<u64>().ok())
            .unwrap_or(0);
        let trace_id_high = carrier
            .get(DATADOG_TAGS_KEY)
            .and_then(Self::higher_order_bits)
            .unwrap_or(0);

        Ok(SpanContext::new(
            (u128::from(trace_id_high) << 64) | u128::from(trace_id_low),
            span_id,
        ))
    }

    fn extract_trace_id(carrier: &dyn Extractor) -> Result<u64, PropagationError> {
        let trace_id = carrier
            .get(DATADOG_TRACE_ID_KEY)
            .ok_or(PropagationError::extract("missing `trace_id`", "datadog"))?;

        if INVALID_SEGMENT_REGEX.is_match(trace_id) {
            return Err(PropagationError::extract("zero `trace_id`", "datadog"));
        }

        trace_id
            .parse::<u64>()
            .map_err(|_| PropagationError::extract("invalid `trace_id`", "datadog"))
    }

    /// Reads the `_dd.p.tid` member of the `x-datadog-tags` list.
    fn higher_order_bits(tags: &str) -> Option<u64> {
        let bits = tags
            .split(',')
            .filter_map(|pair| pair.split_once('='))
            .find(|(key, _)| key.trim() == DATADOG_HIGHER_ORDER_TRACE_ID_BITS_KEY)
            .map(|(_, value)| value.trim())?;

        if bits.len() != 16 {
            debug!("Malformed Trace ID: {bits} Failed to decode trace ID from carrier.");
            return None;
        }
        u64::from_str_radix(bits, 16).ok()
    }
}

/// Extracts the W3C `traceparent` header.
#[derive(Clone, Copy, Debug, Default)]
pub struct TraceContextPropagator;

impl Propagator for TraceContextPropagator {
    fn extract(&self, carrier: &dyn Extractor) -> Option<SpanContext> {
        match Self::extract_traceparent(carrier) {
            Ok(context) => Some(context),
            Err(e) => {
                debug!("{e}");
                None
            }
        }
    }
}

impl TraceContextPropagator {
    fn extract_traceparent(carrier: &dyn Extractor) -> Result<SpanContext, PropagationError> {
        let header = carrier
            .get(TRACEPARENT_KEY)
            .ok_or(PropagationError::extract("missing `traceparent`", "tracecontext"))?
            .trim();

        let captures = TRACEPARENT_REGEX
            .captures(header)
            .ok_or(PropagationError::extract("malformed `traceparent`", "tracecontext"))?;

        let version = &captures[1];
        if version.eq_ignore_ascii_case("ff") {
            return Err(PropagationError::extract(
                "unsupported `traceparent` version",
                "tracecontext",
            ));
        }
        if version == "00" && captures.get(5).is_some() {
            return Err(PropagationError::extract(
                "trailing data in version 00 `traceparent`",
                "tracecontext",
            ));
        }

        let trace_id = &captures[2];
        let span_id = &captures[3];
        if INVALID_SEGMENT_REGEX.is_match(trace_id) {
            return Err(PropagationError::extract("zero `trace_id`", "tracecontext"));
        }
        if INVALID_SEGMENT_REGEX.is_match(span_id) {
            return Err(PropagationError::extract("zero `span_id`", "tracecontext"));
        }

        let trace_id = u128::from_str_radix(trace_id, 16)
            .map_err(|_| PropagationError::extract("invalid `trace_id`", "tracecontext"))?;
        let span_id = u64::from_str_radix(span_id, 16)
            .map_err(|_| PropagationError::extract("invalid `span_id`", "tracecontext"))?;

        Ok(SpanContext::new(trace_id, span_id))
    }
}

/// Tries Datadog headers first, then W3C TraceContext.
#[must_use]
pub fn extract(carrier: &dyn Extractor) -> Option<SpanContext> {
    DatadogHeaderPropagator
        .extract(carrier)
        .or_else(|| TraceContextPropagator.extract(carrier))
}
