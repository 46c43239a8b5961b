// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for LLM integrations.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::Adapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for LLM provider integrations.
///
/// The dispatch loop treats the model as an opaque function: a prompt plus
/// tool definitions goes in, text and/or requested tool invocations come out.
#[async_trait]
pub trait ProviderAdapter: Adapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError>;
}
