// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Sender and entrypoint tags carried in a [`Context`].
//!
//! Unlike fields, tags do not merge: the nearest setter wins.

use crate::context::{Context, ContextKey, Lookup};

const SENDER_KEY: ContextKey = ContextKey::new("sender");
const ENTRYPOINT_KEY: ContextKey = ContextKey::new("entrypoint");

#[must_use]
pub fn sender(ctx: &Context) -> Option<&str> {
    tag(ctx, SENDER_KEY)
}

#[must_use]
pub fn set_sender(ctx: &Context, sender: impl Into<String>) -> Context {
    ctx.with_value(SENDER_KEY, sender.into())
}

#[must_use]
pub fn entrypoint(ctx: &Context) -> Option<&str> {
    tag(ctx, ENTRYPOINT_KEY)
}

#[must_use]
pub fn set_entrypoint(ctx: &Context, entrypoint: impl Into<String>) -> Context {
    ctx.with_value(ENTRYPOINT_KEY, entrypoint.into())
}

fn tag(ctx: &Context, key: ContextKey) -> Option<&str> {
    match ctx.get::<String>(key) {
        Lookup::Found(value) => Some(value.as_str()),
        Lookup::Absent | Lookup::Mismatch => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untouched_context() {
        let ctx = Context::background();
        assert_eq!(sender(&ctx), None);
        assert_eq!(entrypoint(&ctx), None);
    }

    #[test]
    fn test_nearest_setter_wins() {
        let outer = set_sender(&Context::background(), "billing");
        let inner = set_sender(&outer, "invoicing");

        assert_eq!(sender(&outer), Some("billing"));
        assert_eq!(sender(&inner), Some("invoicing"));
    }

    #[test]
    fn test_tags_are_independent() {
        let ctx = set_entrypoint(&Context::background(), "POST /orders");
        assert_eq!(entrypoint(&ctx), Some("POST /orders"));
        assert_eq!(sender(&ctx), None);

        let ctx = set_sender(&ctx, "gateway");
        assert_eq!(entrypoint(&ctx), Some("POST /orders"));
        assert_eq!(sender(&ctx), Some("gateway"));
    }

    #[test]
    fn test_empty_tag_is_present() {
        let ctx = set_sender(&Context::background(), "");
        assert_eq!(sender(&ctx), Some(""));
    }
}
