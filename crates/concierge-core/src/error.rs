// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Concierge orchestration core.

use thiserror::Error;

/// The primary error type used across all Concierge components.
///
/// The first five variants form the tool-failure taxonomy surfaced to the
/// dispatch loop; the rest cover ambient concerns (config, storage, provider).
#[derive(Debug, Error)]
pub enum ConciergeError {
    /// Tool arguments failed schema validation (recovered locally as a
    /// clarification request, never dispatched to the worker).
    #[error("validation error: {message}")]
    Validation { message: String },

    /// A referenced record (typically an order) does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String },

    /// Refund requested for an order whose refund was already processed.
    /// Terminal-state violation: the order record is never mutated twice.
    #[error("order {order_id} has already been refunded")]
    AlreadyRefunded { order_id: String },

    /// The worker process is unreachable, crashed, or its pipe closed.
    /// The channel marks itself unusable; the next invoke respawns.
    #[error("worker transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The worker produced a frame that is not valid protocol data.
    /// Transient: retried at most once per dispatch turn.
    #[error("worker protocol error: {message}")]
    Protocol { message: String },

    /// Configuration errors (invalid TOML, missing required fields).
    #[error("configuration error: {0}")]
    Config(String),

    /// Record store errors (connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// LLM provider errors (API failure, malformed response).
    #[error("provider error: {message}")]
    Provider {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation timed out.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConciergeError {
    /// Shorthand for a [`ConciergeError::Validation`] with the given message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`ConciergeError::NotFound`] naming the missing resource.
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// Shorthand for a [`ConciergeError::Transport`] wrapping an I/O-level
    /// cause.
    pub fn transport(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Transport {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages_are_user_diagnosable() {
        let e = ConciergeError::AlreadyRefunded {
            order_id: "ORD000032".into(),
        };
        assert_eq!(e.to_string(), "order ORD000032 has already been refunded");

        let e = ConciergeError::not_found("order ORD999999");
        assert_eq!(e.to_string(), "order ORD999999 not found");

        let e = ConciergeError::validation("missing required field `order_id`");
        assert!(e.to_string().contains("order_id"));
    }

    #[test]
    fn transport_error_can_carry_source() {
        let e = ConciergeError::Transport {
            message: "worker exited".into(),
            source: Some(Box::new(std::io::Error::other("broken pipe"))),
        };
        assert!(e.to_string().contains("worker exited"));
    }
}
