// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The tool abstraction.

use async_trait::async_trait;

use concierge_core::ConciergeError;

/// A capability the model can invoke by name with JSON arguments.
///
/// Implementations receive arguments that already passed schema validation
/// in the registry, plus any fields the dispatch loop injected (such as
/// `user_id` for escalation, which is never model-supplied).
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable tool name as offered to the model.
    fn name(&self) -> &str;

    /// One-sentence description for the model's tool listing.
    fn description(&self) -> &str;

    /// JSON Schema (object form) describing the model-facing arguments.
    fn parameters_schema(&self) -> serde_json::Value;

    /// Execute the tool. Returns a JSON payload for the model to read.
    async fn invoke(&self, arguments: serde_json::Value)
        -> Result<serde_json::Value, ConciergeError>;
}
