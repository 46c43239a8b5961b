// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent/sentiment classification, served by the worker process.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use concierge_core::ConciergeError;
use concierge_worker::WorkerManager;

use crate::tool::Tool;

pub struct ClassifyTool {
    worker: Arc<WorkerManager>,
}

impl ClassifyTool {
    pub fn new(worker: Arc<WorkerManager>) -> Self {
        Self { worker }
    }
}

#[async_trait]
impl Tool for ClassifyTool {
    fn name(&self) -> &str {
        "classify"
    }

    fn description(&self) -> &str {
        "Classify a customer message into an intent and sentiment with confidence scores. Call this when the conversation topic changes."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "text": {
                    "type": "string",
                    "description": "The customer message to classify"
                }
            },
            "required": ["text"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        self.worker.invoke("classify", arguments).await
    }
}
