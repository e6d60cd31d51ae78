// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Trace correlation: reads the active trace and span ids out of a
//! [`Context`].
//!
//! Ids are produced by an external tracer. The tracer (or the request edge,
//! via [`extract_span_context`]) records a [`SpanContext`] in the context and
//! the logger renders its ids as `trace.id` / `span.id`.

pub mod carrier;
pub mod propagation;
pub mod span_context;

use crate::context::{Context, ContextKey, Lookup};

pub use carrier::Extractor;
pub use span_context::SpanContext;

const SPAN_CONTEXT_KEY: ContextKey = ContextKey::new("trace.span_context");

/// Records the tracer's current span in `ctx`.
#[must_use]
pub fn set_span_context(ctx: &Context, span: SpanContext) -> Context {
    ctx.with_value(SPAN_CONTEXT_KEY, span)
}

#[must_use]
pub fn span_context(ctx: &Context) -> Option<&SpanContext> {
    match ctx.get::<SpanContext>(SPAN_CONTEXT_KEY) {
        Lookup::Found(span) => Some(span),
        Lookup::Absent | Lookup::Mismatch => None,
    }
}

/// Active trace id as lowercase hex, or `""` when none is recorded.
#[must_use]
pub fn trace_id(ctx: &Context) -> String {
    span_context(ctx)
        .filter(|span| span.has_trace_id())
        .map(SpanContext::trace_id_hex)
        .unwrap_or_default()
}

/// Active span id as lowercase hex, or `""` when none is recorded.
#[must_use]
pub fn span_id(ctx: &Context) -> String {
    span_context(ctx)
        .filter(|span| span.has_span_id())
        .map(SpanContext::span_id_hex)
        .unwrap_or_default()
}

/// Extracts propagated trace headers from `carrier` into `ctx`.
///
/// Returns `ctx` unchanged when the carrier holds no usable trace context.
#[must_use]
pub fn extract_span_context(ctx: &Context, carrier: &dyn Extractor) -> Context {
    match propagation::extract(carrier) {
        Some(span) => set_span_context(ctx, span),
        None => ctx.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_absent_span_context() {
        let ctx = Context::background();
        assert_eq!(trace_id(&ctx), "");
        assert_eq!(span_id(&ctx), "");
    }

    #[test]
    fn test_reads_recorded_ids() {
        let ctx = set_span_context(&Context::background(), SpanContext::new(0xabc, 0x12));
        assert_eq!(trace_id(&ctx), "00000000000000000000000000000abc");
        assert_eq!(span_id(&ctx), "0000000000000012");
    }

    #[test]
    fn test_zero_ids_read_as_empty() {
        let ctx = set_span_context(&Context::background(), SpanContext::new(5, 0));
        assert_eq!(trace_id(&ctx), "00000000000000000000000000000005");
        assert_eq!(span_id(&ctx), "");
    }

    #[test]
    fn test_extract_span_context() {
        let headers = HashMap::from([
            ("x-datadog-trace-id".to_string(), "10".to_string()),
            ("x-datadog-parent-id".to_string(), "11".to_string()),
        ]);
        let ctx = extract_span_context(&Context::background(), &headers);
        assert_eq!(span_context(&ctx).map(|s| s.span_id), Some(11));
    }

    #[test]
    fn test_extract_without_headers_keeps_context() {
        let ctx = Context::background();
        let same = extract_span_context(&ctx, &HashMap::<String, String>::new());
        assert!(Context::ptr_eq(&ctx, &same));
    }
}
