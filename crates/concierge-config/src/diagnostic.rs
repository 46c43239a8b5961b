// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Config error type and terminal rendering.

use thiserror::Error;

/// A configuration error surfaced at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML parsing or extraction failure (unknown key, type mismatch).
    #[error("failed to load configuration: {message}")]
    Load { message: String },

    /// Semantic validation failure after successful deserialization.
    #[error("invalid configuration: {message}")]
    Validation { message: String },
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        ConfigError::Load {
            message: err.to_string(),
        }
    }
}

/// Print all collected config errors to stderr, one per line.
pub fn render_errors(errors: &[ConfigError]) {
    for err in errors {
        eprintln!("concierge: {err}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn figment_error_converts_to_load_variant() {
        let fig_err = figment::Error::from("unknown field `bogus`".to_string());
        let err: ConfigError = fig_err.into();
        assert!(matches!(err, ConfigError::Load { .. }));
        assert!(err.to_string().contains("bogus"));
    }
}
