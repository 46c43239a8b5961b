// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human escalation: persists an alert for the support team.
//!
//! The model supplies reason and priority only. `user_id` and
//! `last_message` are injected by the dispatch loop from the session, so
//! the model can never escalate on behalf of a different user.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use concierge_core::{AlertPriority, ConciergeError, RecordStore};

use crate::tool::Tool;

pub struct EscalateToHumanTool {
    store: Arc<dyn RecordStore>,
}

impl EscalateToHumanTool {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Tool for EscalateToHumanTool {
    fn name(&self) -> &str {
        "escalate_to_human"
    }

    fn description(&self) -> &str {
        "Escalate the conversation to a human support agent when the customer is upset, asks for a human, or the request cannot be handled."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        json!({
            "type": "object",
            "properties": {
                "reason": {
                    "type": "string",
                    "description": "Why the conversation needs a human"
                },
                "priority": {
                    "type": "string",
                    "enum": ["low", "medium", "high"],
                    "description": "Urgency of the escalation"
                }
            },
            "required": ["reason"]
        })
    }

    async fn invoke(
        &self,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        let user_id = arguments["user_id"]
            .as_str()
            .ok_or_else(|| ConciergeError::Internal("escalation missing user context".to_string()))?;
        let reason = arguments["reason"].as_str().unwrap_or_default();
        let last_message = arguments["last_message"].as_str().unwrap_or_default();
        let priority = arguments["priority"]
            .as_str()
            .and_then(|p| p.parse::<AlertPriority>().ok())
            .unwrap_or(AlertPriority::Medium);

        let alert_id = self
            .store
            .create_alert(user_id, reason, last_message, priority)
            .await?;
        warn!(user_id, %priority, alert_id, "conversation escalated to human support");

        Ok(json!({
            "alert_id": alert_id,
            "priority": priority.to_string(),
            "status": "escalated"
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_test_utils::MemoryStore;

    #[tokio::test]
    async fn escalation_persists_alert_with_injected_context() {
        let store = Arc::new(MemoryStore::new());
        let tool = EscalateToHumanTool::new(Arc::clone(&store) as Arc<dyn RecordStore>);

        let result = tool
            .invoke(json!({
                "reason": "customer explicitly asked for a human",
                "priority": "high",
                "user_id": "user-7",
                "last_message": "let me talk to a person"
            }))
            .await
            .unwrap();
        assert_eq!(result["status"], "escalated");

        let alerts = store.alerts();
        assert_eq!(alerts.len(), 1);
        assert_eq!(alerts[0].user_id, "user-7");
        assert_eq!(alerts[0].priority, AlertPriority::High);
        assert_eq!(alerts[0].last_message, "let me talk to a person");
    }

    #[tokio::test]
    async fn missing_user_context_is_an_internal_error() {
        let store = Arc::new(MemoryStore::new());
        let tool = EscalateToHumanTool::new(store as Arc<dyn RecordStore>);
        let err = tool
            .invoke(json!({"reason": "angry customer"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ConciergeError::Internal(_)));
    }

    #[tokio::test]
    async fn unknown_priority_defaults_to_medium() {
        let store = Arc::new(MemoryStore::new());
        let tool = EscalateToHumanTool::new(Arc::clone(&store) as Arc<dyn RecordStore>);
        tool.invoke(json!({
            "reason": "unclear request",
            "priority": "urgent-ish",
            "user_id": "user-1",
            "last_message": "???"
        }))
        .await
        .unwrap();
        assert_eq!(store.alerts()[0].priority, AlertPriority::Medium);
    }
}
