// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Refund tools, backed by the local refund workflow.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use concierge_core::{ConciergeError, OrderId};
use concierge_refund::RefundWorkflow;

use crate::tool::Tool;

fn parse_order_id(arguments: &serde_json::Value) -> Result<OrderId, ConciergeError> {
    arguments["order_id"].as_str().unwrap_or_default().parse()
}

/// Side-effect-free eligibility check. Must be called (and confirmed with
/// the customer) before `process_refund`.
pub struct CheckRefundEligibilityTool {
    workflow: Arc<RefundWorkflow>,
}

impl CheckRefundEligibilityTool {
    pub fn new(workflow: Arc<RefundWorkflow>) -> Self {
        Self { workflow }
    }
}

#[async_trait]
impl Tool for CheckRefundEligibilityTool {
    fn name(&self) -> &str {
        "check_refund_eligibility"
    }

    fn description(&self) -> &str {
        "Check whether an order is eligible for a refund and compute the refundable amount after the shipping fee. Always call this before processing a refund."
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
        let order_id = parse_order_id(&arguments)?;
        let report = self.workflow.check_eligibility(&order_id).await?;
        serde_json::to_value(report)
            .map_err(|e| ConciergeError::Internal(format!("failed to encode report: {e}")))
    }
}

/// Execute a refund after the customer has confirmed.
pub struct ProcessRefundTool {
    workflow: Arc<RefundWorkflow>,
}

impl ProcessRefundTool {
    pub fn new(workflow: Arc<RefundWorkflow>) -> Self {
        Self { workflow }
    }
}

#[async_trait]
impl Tool for ProcessRefundTool {
    fn name(&self) -> &str {
        "process_refund"
    }

    fn description(&self) -> &str {
        "Process a refund for an eligible order once the customer has confirmed. The amount must match the one reported by check_refund_eligibility."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "order_id": {
                    "type": "string",
                    "description": "The order id, e.g. ORD000032"
                },
                "amount": {
                    "type": "number",
                    "description": "The refund amount reported by the eligibility check"
                },
                "reason": {
                    "type": "string",
                    "description": "The customer's reason for the refund"
                }
            },
            "required": ["order_id", "amount", "reason"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        let order_id = parse_order_id(&arguments)?;
        let amount = arguments["amount"]
            .as_f64()
            .ok_or_else(|| ConciergeError::validation("amount must be a number"))?;
        let reason = arguments["reason"].as_str().unwrap_or_default();
        let receipt = self.workflow.process(&order_id, amount, reason).await?;
        serde_json::to_value(receipt)
            .map_err(|e| ConciergeError::Internal(format!("failed to encode receipt: {e}")))
    }
}
