// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Errors surfaced while constructing or configuring a logger.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to parse log level: unrecognized level '{0}', expected one of: debug, info, warn, error, fatal")]
    InvalidLevel(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to create logger: {0}")]
    BackendInit(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = Error::InvalidLevel("loud".to_string());
        assert!(error
            .to_string()
            .starts_with("failed to parse log level: unrecognized level 'loud'"));

        let error = Error::InvalidConfig("unknown log format".to_string());
        assert_eq!(error.to_string(), "Invalid configuration: unknown log format");

        let error = Error::BackendInit("subscriber already set".to_string());
        assert_eq!(
            error.to_string(),
            "failed to create logger: subscriber already set"
        );
    }
}
