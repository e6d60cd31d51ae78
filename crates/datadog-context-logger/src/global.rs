// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Process-wide default logger.
//!
//! The default logger is built on first use from [`LoggerConfig::from_env`]
//! and gated by [`global_level`]. If the environment holds an invalid
//! configuration the default degrades to a no-op logger instead of
//! aborting the process.
//!
//! Reads go through an [`ArcSwap`], so swapping the default while other
//! threads log never blocks them. Concurrent reconfiguration is last writer
//! wins.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;

use crate::backend::NoopBackend;
use crate::config::LoggerConfig;
use crate::level::global_level;
use crate::logger::ContextLogger;
use crate::service::ServiceInfo;

static DEFAULT_LOGGER: OnceLock<ArcSwap<ContextLogger>> = OnceLock::new();

fn slot() -> &'static ArcSwap<ContextLogger> {
    DEFAULT_LOGGER.get_or_init(|| ArcSwap::from_pointee(build_default()))
}

fn build_default() -> ContextLogger {
    let logger = LoggerConfig::from_env().and_then(|config| {
        ContextLogger::from_config_with_level(&config, global_level().clone())
    });

    match logger {
        Ok(logger) => logger,
        Err(e) => {
            // No logger exists yet to report through.
            eprintln!("{e}");
            ContextLogger::with_backend(Arc::new(NoopBackend::new()), None)
        }
    }
}

/// Returns the current default logger.
pub fn default_logger() -> Arc<ContextLogger> {
    slot().load_full()
}

/// Replaces the default logger.
pub fn set_default_logger(logger: ContextLogger) {
    slot().store(Arc::new(logger));
}

/// Binds `service` identity fields onto the default logger.
pub fn set_default_fields(service: &ServiceInfo) {
    slot().rcu(|current| current.with_service(service));
}
