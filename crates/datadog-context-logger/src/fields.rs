// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Structured fields carried in a [`Context`].
//!
//! Fields accumulate outward-in: when a scope adds fields, keys already set
//! by an enclosing scope keep their value. Identity fields such as a request
//! id set at the edge of a service therefore cannot be clobbered by code
//! further down the call chain.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use crate::context::{Context, ContextKey, Lookup};

/// Mapping from field name to structured value.
pub type Fields = BTreeMap<String, Value>;

const FIELDS_KEY: ContextKey = ContextKey::new("log.fields");

/// Derives a context whose fields are `fields` merged under the existing ones.
///
/// Returns `ctx` itself when `fields` is empty.
#[must_use]
pub fn set_fields(ctx: &Context, fields: Fields) -> Context {
    if fields.is_empty() {
        return ctx.clone();
    }

    let mut merged = fields;
    if let Some(existing) = get_fields(ctx) {
        merged.extend(
            existing
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
    }

    ctx.with_value(FIELDS_KEY, Arc::new(merged))
}

/// Convenience wrapper over [`set_fields`] for literal key/value lists.
#[must_use]
pub fn with_fields<K, V, I>(ctx: &Context, fields: I) -> Context
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    set_fields(
        ctx,
        fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect(),
    )
}

/// Returns the effective fields of `ctx`, or `None` when no scope set any.
///
/// # Panics
///
/// Panics if the fields slot holds a value of another type. Only this module
/// writes that slot.
#[must_use]
#[allow(clippy::panic)]
pub fn get_fields(ctx: &Context) -> Option<Arc<Fields>> {
    match ctx.get::<Arc<Fields>>(FIELDS_KEY) {
        Lookup::Absent => None,
        Lookup::Found(fields) => Some(Arc::clone(fields)),
        Lookup::Mismatch => panic!("unexpected context log fields value type"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn fields(pairs: &[(&str, Value)]) -> Fields {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_absent_fields() {
        assert!(get_fields(&Context::background()).is_none());
    }

    #[test]
    fn test_empty_fields_return_same_context() {
        let ctx = with_fields(&Context::background(), [("a", 1)]);
        let same = set_fields(&ctx, Fields::new());

        assert!(Context::ptr_eq(&ctx, &same));
        assert_eq!(same.depth(), 1);
    }

    #[test]
    fn test_ancestor_fields_win() {
        let parent = set_fields(
            &Context::background(),
            fields(&[("request.id", json!("req-1")), ("user", json!("alice"))]),
        );
        let child = set_fields(
            &parent,
            fields(&[("request.id", json!("req-2")), ("job", json!(7))]),
        );

        let got = get_fields(&child).unwrap();
        assert_eq!(got.get("request.id"), Some(&json!("req-1")));
        assert_eq!(got.get("user"), Some(&json!("alice")));
        assert_eq!(got.get("job"), Some(&json!(7)));
    }

    #[test]
    fn test_parent_fields_not_mutated() {
        let parent = with_fields(&Context::background(), [("a", "1")]);
        let _child = with_fields(&parent, [("b", "2")]);

        let got = get_fields(&parent).unwrap();
        assert_eq!(got.len(), 1);
        assert!(!got.contains_key("b"));
    }

    #[test]
    #[should_panic(expected = "unexpected context log fields value type")]
    fn test_foreign_value_panics() {
        let ctx = Context::background().with_value(FIELDS_KEY, "not a map".to_string());
        let _ = get_fields(&ctx);
    }

    proptest! {
        #[test]
        fn prop_merge_is_union_with_ancestor_precedence(
            outer in prop::collection::btree_map("[a-e]", 0_i64..100, 0..5),
            inner in prop::collection::btree_map("[a-e]", 100_i64..200, 0..5),
        ) {
            let to_fields = |m: &BTreeMap<String, i64>| -> Fields {
                m.iter().map(|(k, v)| (k.clone(), json!(v))).collect()
            };

            let parent = set_fields(&Context::background(), to_fields(&outer));
            let child = set_fields(&parent, to_fields(&inner));
            let got = get_fields(&child).map(|f| (*f).clone()).unwrap_or_default();

            let mut expected = to_fields(&inner);
            expected.extend(to_fields(&outer));
            prop_assert_eq!(got, expected);
        }
    }
}
