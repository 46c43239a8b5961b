// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge orchestration core.
//!
//! This crate provides the foundational trait definitions, error types, and
//! common types used throughout the Concierge workspace: the error taxonomy
//! surfaced by tools and transport, order/classification/chat types, and the
//! adapter traits for the LLM provider and the persistent record store.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ConciergeError;
pub use types::{
    AlertPriority, ChatMessage, ChatRole, Classification, HealthStatus, OrderId, OrderRecord,
    PromptMessage, PromptRole, ProviderRequest, ProviderResponse, RefundStatus, Sentiment,
    ToolCallRequest,
};

pub use traits::{Adapter, ProviderAdapter, RecordStore, RefundUpdate};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_taxonomy_has_all_tool_facing_variants() {
        let _validation = ConciergeError::validation("bad argument");
        let _not_found = ConciergeError::not_found("order ORD000001");
        let _already = ConciergeError::AlreadyRefunded {
            order_id: "ORD000001".into(),
        };
        let _transport =
            ConciergeError::transport("worker exited", std::io::Error::other("broken pipe"));
        let _protocol = ConciergeError::Protocol {
            message: "unparseable frame".into(),
        };
    }

    #[test]
    fn adapter_traits_are_object_safe() {
        fn _takes_provider(_: &dyn ProviderAdapter) {}
        fn _takes_store(_: &dyn RecordStore) {}
        fn _takes_adapter(_: &dyn Adapter) {}
    }
}
