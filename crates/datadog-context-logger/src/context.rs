// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Immutable execution context carrying request-scoped logging metadata.
//!
//! A [`Context`] is a persistent, singly linked chain of layers. Every
//! derivation pushes one layer on top of its input and leaves the input
//! untouched, so a parent context can be handed to any number of children,
//! across threads, without synchronization.
//!
//! ```text
//! background ── sender=api ── fields{request.id} ── prefix "handler: "
//!                    │
//!                    └──────── fields{job.id}     (sibling branch)
//! ```
//!
//! Lookups walk the chain from the newest layer to the root, so the nearest
//! layer carrying a key wins.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Name of a slot in a [`Context`].
///
/// Each store in this crate owns its keys; values written under a key are
/// expected to always have the same type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContextKey(&'static str);

impl ContextKey {
    /// Creates a key; two keys with the same name address the same slot.
    ///
    /// # Example
    ///
    /// ```
    /// use datadog_context_logger::ContextKey;
    ///
    /// const TENANT: ContextKey = ContextKey::new("app.tenant");
    /// assert_eq!(TENANT.name(), "app.tenant");
    /// ```
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    /// Name the key was created with.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Result of a typed context lookup.
#[derive(Debug, PartialEq, Eq)]
pub enum Lookup<T> {
    /// No layer carries the key.
    Absent,
    /// The nearest layer carrying the key holds a `T`.
    Found(T),
    /// A value exists under the key but has a different type.
    Mismatch,
}

struct Layer {
    key: ContextKey,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Layer>>,
}

/// Immutable, cheaply cloneable carrier of request-scoped values.
#[derive(Clone, Default)]
pub struct Context {
    head: Option<Arc<Layer>>,
}

impl Context {
    /// The empty root context.
    #[must_use]
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a new context carrying `value` under `key`.
    ///
    /// `self` is left untouched; the new layer shadows any ancestor value
    /// stored under the same key.
    ///
    /// # Arguments
    ///
    /// * `key` - Slot to write
    /// * `value` - Value stored behind an `Arc`, shared by all descendants
    ///
    /// # Example
    ///
    /// ```
    /// use datadog_context_logger::{Context, ContextKey, Lookup};
    ///
    /// const ATTEMPT: ContextKey = ContextKey::new("app.attempt");
    ///
    /// let parent = Context::background();
    /// let child = parent.with_value(ATTEMPT, 2_u32);
    ///
    /// assert_eq!(child.get::<u32>(ATTEMPT), Lookup::Found(&2));
    /// assert_eq!(parent.get::<u32>(ATTEMPT), Lookup::Absent);
    /// ```
    #[must_use]
    pub fn with_value<T>(&self, key: ContextKey, value: T) -> Self
    where
        T: Any + Send + Sync,
    {
        Self {
            head: Some(Arc::new(Layer {
                key,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Returns the value stored under `key` by the nearest layer, if any.
    #[must_use]
    pub fn value(&self, key: ContextKey) -> Option<&(dyn Any + Send + Sync)> {
        self.layers()
            .find(|layer| layer.key == key)
            .map(|layer| layer.value.as_ref())
    }

    /// Typed lookup that distinguishes a missing key from a value of another type.
    #[must_use]
    pub fn get<T: Any>(&self, key: ContextKey) -> Lookup<&T> {
        match self.value(key) {
            None => Lookup::Absent,
            Some(value) => match value.downcast_ref::<T>() {
                Some(typed) => Lookup::Found(typed),
                None => Lookup::Mismatch,
            },
        }
    }

    /// Returns true when both handles point at the same layer.
    #[must_use]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        match (&a.head, &b.head) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Number of layers above the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.layers().count()
    }

    fn layers(&self) -> impl Iterator<Item = &Layer> {
        std::iter::successors(self.head.as_deref(), |layer| layer.parent.as_deref())
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.layers().map(|layer| layer.key.name()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLOR: ContextKey = ContextKey::new("test.color");
    const SIZE: ContextKey = ContextKey::new("test.size");

    #[test]
    fn test_background_is_empty() {
        let ctx = Context::background();
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.value(COLOR).is_none());
        assert_eq!(ctx.get::<String>(COLOR), Lookup::Absent);
    }

    #[test]
    fn test_nearest_layer_wins() {
        let parent = Context::background().with_value(COLOR, "red".to_string());
        let child = parent.with_value(COLOR, "blue".to_string());

        assert_eq!(child.get::<String>(COLOR), Lookup::Found(&"blue".to_string()));
        assert_eq!(parent.get::<String>(COLOR), Lookup::Found(&"red".to_string()));
    }

    #[test]
    fn test_lookup_falls_through_to_ancestors() {
        let ctx = Context::background()
            .with_value(SIZE, 42_u32)
            .with_value(COLOR, "green".to_string());

        assert_eq!(ctx.get::<u32>(SIZE), Lookup::Found(&42));
        assert_eq!(ctx.depth(), 2);
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        let ctx = Context::background().with_value(SIZE, 7_u64);
        assert_eq!(ctx.get::<String>(SIZE), Lookup::Mismatch);
    }

    #[test]
    fn test_ptr_eq() {
        let a = Context::background().with_value(SIZE, 1_u8);
        let b = a.clone();
        let c = a.with_value(SIZE, 2_u8);

        assert!(Context::ptr_eq(&a, &b));
        assert!(!Context::ptr_eq(&a, &c));
        assert!(Context::ptr_eq(&Context::background(), &Context::default()));
    }

    #[test]
    fn test_debug_lists_keys_newest_first() {
        let ctx = Context::background()
            .with_value(SIZE, 1_u8)
            .with_value(COLOR, "x".to_string());
        assert_eq!(format!("{ctx:?}"), r#"["test.color", "test.size"]"#);
    }
}
