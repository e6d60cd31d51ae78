// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Message prefixes carried in a [`Context`].
//!
//! Prefixes nest outer-to-inner: `set_prefix("db")` inside `set_prefix("api")`
//! decorates messages as `api: db: message`.

use std::sync::Arc;

use crate::context::{Context, ContextKey, Lookup};

const PREFIX_KEY: ContextKey = ContextKey::new("log.prefix");
const SEPARATOR: &str = ": ";

/// Derives a context whose prefix is the current one followed by `prefix`.
///
/// Returns `ctx` itself when `prefix` is empty.
#[must_use]
pub fn set_prefix(ctx: &Context, prefix: &str) -> Context {
    if prefix.is_empty() {
        return ctx.clone();
    }

    let chained: Arc<str> = format!("{}{prefix}{SEPARATOR}", get_prefix(ctx)).into();
    ctx.with_value(PREFIX_KEY, chained)
}

/// Returns the accumulated prefix of `ctx`, or `""` when none was set.
///
/// # Panics
///
/// Panics if the prefix slot holds a value of another type.
#[must_use]
#[allow(clippy::panic)]
pub fn get_prefix(ctx: &Context) -> &str {
    match ctx.get::<Arc<str>>(PREFIX_KEY) {
        Lookup::Absent => "",
        Lookup::Found(prefix) => prefix.as_ref(),
        Lookup::Mismatch => panic!("unexpected context log prefix value type"),
    }
}

/// Prepends the prefix of `ctx` to `msg`.
pub(crate) fn decorate(ctx: &Context, msg: &str) -> String {
    let prefix = get_prefix(ctx);
    let mut out = String::with_capacity(prefix.len() + msg.len());
    out.push_str(prefix);
    out.push_str(msg);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_prefix() {
        assert_eq!(get_prefix(&Context::background()), "");
    }

    #[test]
    fn test_empty_prefix_is_noop() {
        let ctx = set_prefix(&Context::background(), "api");
        let same = set_prefix(&ctx, "");
        assert!(Context::ptr_eq(&ctx, &same));
    }

    #[test]
    fn test_nested_prefixes() {
        let outer = set_prefix(&Context::background(), "api");
        let inner = set_prefix(&outer, "db");

        assert_eq!(get_prefix(&outer), "api: ");
        assert_eq!(get_prefix(&inner), "api: db: ");
        assert_eq!(decorate(&inner, "query failed"), "api: db: query failed");
    }

    #[test]
    fn test_decorate_without_prefix() {
        assert_eq!(decorate(&Context::background(), "hello"), "hello");
    }

    #[test]
    #[should_panic(expected = "unexpected context log prefix value type")]
    fn test_foreign_value_panics() {
        let ctx = Context::background().with_value(PREFIX_KEY, 12_i32);
        let _ = get_prefix(&ctx);
    }
}
