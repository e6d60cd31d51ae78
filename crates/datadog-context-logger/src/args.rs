// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Normalization of positional logging arguments.
//!
//! The plain logging methods take a loose argument list: the first element
//! is the message and the rest alternate key, value, key, value. A trailing
//! key without a value is paired with `""`. An empty argument list yields an
//! empty, undecorated message.
//!
//! ```text
//! ["hello", "a", "b", "c"]  =>  msg="hello"  a="b"  c=""
//! ```

use std::fmt;

use crate::context::Context;
use crate::prefix;

/// Message plus the string pairs recovered from a positional argument list.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub message: String,
    pub pairs: Vec<(String, String)>,
}

/// Splits `args` into a prefix-decorated message and key/value pairs.
#[must_use]
pub fn normalize(ctx: &Context, args: &[&dyn fmt::Display]) -> Normalized {
    let Some((first, rest)) = args.split_first() else {
        return Normalized::default();
    };

    let pairs = rest
        .chunks(2)
        .map(|pair| {
            let value = pair.get(1).map(ToString::to_string).unwrap_or_default();
            (pair[0].to_string(), value)
        })
        .collect();

    Normalized {
        message: prefix::decorate(ctx, &first.to_string()),
        pairs,
    }
}
