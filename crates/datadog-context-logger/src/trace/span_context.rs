// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Span context recorded by the active tracer.

use std::fmt;

/// Identifies the span a log record was emitted under.
///
/// A zero `trace_id` or `span_id` means the id is not set, matching both the
/// W3C and Datadog conventions for invalid ids.
///
/// # Example
///
/// ```
/// use datadog_context_logger::SpanContext;
///
/// let span = SpanContext::new(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736, 0x00f0_67aa_0ba9_02b7);
/// assert_eq!(span.trace_id_hex(), "4bf92f3577b34da6a3ce929d0e0e4736");
/// assert_eq!(span.span_id_hex(), "00f067aa0ba902b7");
/// ```
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq, Hash)]
pub struct SpanContext {
    /// Full 128-bit trace id. Datadog headers carry the high 64 bits in the
    /// `_dd.p.tid` tag.
    pub trace_id: u128,
    pub span_id: u64,
}

impl SpanContext {
    #[must_use]
    pub fn new(trace_id: u128, span_id: u64) -> Self {
        Self { trace_id, span_id }
    }

    #[must_use]
    pub fn has_trace_id(&self) -> bool {
        self.trace_id != 0
    }

    #[must_use]
    pub fn has_span_id(&self) -> bool {
        self.span_id != 0
    }

    /// Trace id as 32 lowercase hex digits.
    #[must_use]
    pub fn trace_id_hex(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    /// Span id as 16 lowercase hex digits.
    #[must_use]
    pub fn span_id_hex(&self) -> String {
        format!("{:016x}", self.span_id)
    }
}

impl fmt::Display for SpanContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.trace_id_hex(), self.span_id_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_joins_ids() {
        let span = SpanContext::new(0x4bf9_2f35_77b3_4da6_a3ce_929d_0e0e_4736, 0x00f0_67aa_0ba9_02b7);
        assert_eq!(
            span.to_string(),
            "4bf92f3577b34da6a3ce929d0e0e4736-00f067aa0ba902b7"
        );
    }

    #[test]
    fn test_short_ids_are_zero_padded() {
        let span = SpanContext::new(1, 2);
        assert_eq!(span.trace_id_hex(), "00000000000000000000000000000001");
        assert_eq!(span.span_id_hex(), "0000000000000002");
    }

    #[test]
    fn test_zero_ids_are_unset() {
        let span = SpanContext::default();
        assert!(!span.has_trace_id());
        assert!(!span.has_span_id());
    }
}
