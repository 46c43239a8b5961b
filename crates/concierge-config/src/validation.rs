// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as non-empty commands and rate bounds.

use crate::diagnostic::ConfigError;
use crate::model::ConciergeConfig;

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ConciergeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.worker.command.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "worker.command must not be empty".to_string(),
        });
    }

    if config.worker.invoke_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "worker.invoke_timeout_secs must be at least 1".to_string(),
        });
    }

    if config.worker.handshake_timeout_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "worker.handshake_timeout_secs must be at least 1".to_string(),
        });
    }

    let rate = config.refund.shipping_fee_rate;
    if !(0.0..1.0).contains(&rate) {
        errors.push(ConfigError::Validation {
            message: format!("refund.shipping_fee_rate must be in [0, 1), got {rate}"),
        });
    }

    if config.session.gap_hours == 0 {
        errors.push(ConfigError::Validation {
            message: "session.gap_hours must be at least 1".to_string(),
        });
    }

    if config.session.max_entries == 0 {
        errors.push(ConfigError::Validation {
            message: "session.max_entries must be at least 1".to_string(),
        });
    }

    if config.groq.max_tokens == 0 {
        errors.push(ConfigError::Validation {
            message: "groq.max_tokens must be at least 1".to_string(),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
