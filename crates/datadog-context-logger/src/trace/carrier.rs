// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Read-only carriers for extracting trace context from text maps.
//!
//! Lookups are case-insensitive so HTTP headers match regardless of how the
//! transport normalized them (`X-Datadog-Trace-Id` vs `x-datadog-trace-id`).

use std::collections::HashMap;

use serde_json::Value;

/// Source of propagation headers.
pub trait Extractor {
    /// Gets a value by key, ignoring ASCII case.
    fn get(&self, key: &str) -> Option<&str>;
}

impl<S: std::hash::BuildHasher> Extractor for HashMap<String, String, S> {
    fn get(&self, key: &str) -> Option<&str> {
        if let Some(value) = HashMap::get(self, key) {
            return Some(value.as_str());
        }
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// Only `Value::Object` carriers yield values; string members are returned as-is.
impl Extractor for Value {
    fn get(&self, key: &str) -> Option<&str> {
        let Value::Object(map) = self else {
            return None;
        };
        map.get(key)
            .or_else(|| {
                map.iter()
                    .find(|(k, _)| k.eq_ignore_ascii_case(key))
                    .map(|(_, v)| v)
            })
            .and_then(Value::as_str)
    }
}
