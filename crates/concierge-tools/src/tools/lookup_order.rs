// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order lookup, served by the worker process.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use concierge_core::{ConciergeError, OrderId};
use concierge_worker::WorkerManager;

use crate::tool::Tool;

pub struct LookupOrderTool {
    worker: Arc<WorkerManager>,
}

impl LookupOrderTool {
    pub fn new(worker: Arc<WorkerManager>) -> Self {
        Self { worker }
    }
}

#[async_trait]
impl Tool for LookupOrderTool {
    fn name(&self) -> &str {
        "lookup_order"
    }

    fn description(&self) -> &str {
        "Look up an order by its id and return its status, category, and value."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The order id, e.g. ORD000032"
                }
            },
            "required": ["order_id"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        // Normalize the id before it crosses the process boundary; malformed
        // ids fail here instead of round-tripping through the worker.
        let raw = arguments["order_id"].as_str().unwrap_or_default();
        let order_id: OrderId = raw.parse()?;
        self.worker
            .invoke("lookup_order", json!({"order_id": order_id.as_str()}))
            .await
    }
}
