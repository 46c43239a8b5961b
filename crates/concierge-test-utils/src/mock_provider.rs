// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scripted `ProviderAdapter` for tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use concierge_core::{
    Adapter, ConciergeError, HealthStatus, ProviderAdapter, ProviderRequest, ProviderResponse,
    ToolCallRequest,
};

/// Plays back queued responses in order; each `complete` call pops one.
/// Panics in tests if the script runs dry, which flags an unexpected extra
/// model call.
#[derive(Default)]
pub struct MockProvider {
    script: Mutex<VecDeque<Result<ProviderResponse, ConciergeError>>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a plain-text assistant reply.
    pub fn push_text(&self, text: &str) {
        self.push_response(ProviderResponse {
            text: Some(text.to_string()),
            tool_calls: Vec::new(),
        });
    }

    /// Queue a response that requests a single tool call.
    pub fn push_tool_call(&self, name: &str, arguments: serde_json::Value) {
        self.push_response(ProviderResponse {
            text: None,
            tool_calls: vec![ToolCallRequest {
                id: format!("call_{name}"),
                name: name.to_string(),
                arguments,
            }],
        });
    }

    pub fn push_response(&self, response: ProviderResponse) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Ok(response));
    }

    pub fn push_error(&self, error: ConciergeError) {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(Err(error));
    }

    /// Requests received so far, in call order.
    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl Adapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, ConciergeError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| {
                Err(ConciergeError::Internal(
                    "mock provider script exhausted".to_string(),
                ))
            })
    }
}
