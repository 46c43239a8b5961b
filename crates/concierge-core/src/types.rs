// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across the Concierge workspace.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::ConciergeError;

/// Order identifiers are three ASCII letters followed by exactly six digits,
/// case-insensitive on input, stored uppercase.
static ORDER_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Za-z]{3}[0-9]{6})\b").expect("valid order-id pattern"));

/// A normalized order identifier (e.g. `ORD000032`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Returns the uppercase string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Scans free text for the first order-identifier pattern and returns it
    /// normalized to uppercase. `"ord000123 please check"` yields `ORD000123`;
    /// `"ORD12"` (wrong digit count) yields nothing.
    pub fn extract(text: &str) -> Option<OrderId> {
        ORDER_ID_RE
            .captures(text)
            .map(|c| OrderId(c[1].to_ascii_uppercase()))
    }
}

impl FromStr for OrderId {
    type Err = ConciergeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let full_match = ORDER_ID_RE
            .find(trimmed)
            .is_some_and(|m| m.start() == 0 && m.end() == trimmed.len());
        if full_match {
            Ok(OrderId(trimmed.to_ascii_uppercase()))
        } else {
            Err(ConciergeError::validation(format!(
                "`{trimmed}` is not a valid order id (expected e.g. ORD000001)"
            )))
        }
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Sentiment label produced by the classification worker.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

/// Result of running intent/sentiment classification on a user message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: String,
    pub intent_confidence: f64,
    pub sentiment: Sentiment,
    pub sentiment_confidence: f64,
}

/// Refund lifecycle status of an order record.
///
/// Transitions only `NotRequested -> Processed`, exactly once, never reversed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    NotRequested,
    Processed,
}

/// An order as persisted in the record store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: OrderId,
    pub product_category: String,
    pub order_value: f64,
    pub refund_status: RefundStatus,
    pub refund_amount: Option<f64>,
    pub refund_reason: Option<String>,
    /// RFC 3339 timestamp of the processed refund, if any.
    pub refund_date: Option<String>,
}

/// Priority of a human-escalation alert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AlertPriority {
    Low,
    Medium,
    High,
}

/// Role of a persisted chat message.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One turn of persisted conversation history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub role: ChatRole,
    pub content: String,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

// --- Provider types ---

/// Role of a prompt message sent to the LLM provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in a provider prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
    /// For `Tool` role messages: the id of the tool call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::System,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::User,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Assistant,
            content: content.into(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: PromptRole::Tool,
            content: content.into(),
            tool_call_id: Some(tool_call_id.into()),
        }
    }
}

/// A request to the LLM provider.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    pub max_tokens: u32,
    /// Tool definitions offered to the model (provider wire format).
    pub tools: Vec<serde_json::Value>,
}

/// A tool invocation requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back with the tool result.
    pub id: String,
    pub name: String,
    pub arguments: serde_json::Value,
}

/// A response from the LLM provider: text, tool-call requests, or both.
#[derive(Debug, Clone, Default)]
pub struct ProviderResponse {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCallRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_extraction_normalizes_to_uppercase() {
        let id = OrderId::extract("ord000123 please check").unwrap();
        assert_eq!(id.as_str(), "ORD000123");
    }

    #[test]
    fn order_id_extraction_rejects_wrong_digit_count() {
        assert!(OrderId::extract("ORD12").is_none());
        assert!(OrderId::extract("my order is ORD1234567 ok").is_none());
    }

    #[test]
    fn order_id_extraction_requires_word_boundary() {
        assert!(OrderId::extract("xORD000001").is_none());
        assert!(OrderId::extract("(ORD000001)").is_some());
    }

    #[test]
    fn order_id_parse_full_match_only() {
        assert!("ORD000032".parse::<OrderId>().is_ok());
        assert!(" ord000032 ".parse::<OrderId>().is_ok());
        assert!("ORD000032 extra".parse::<OrderId>().is_err());
        assert!("ORD32".parse::<OrderId>().is_err());
    }

    #[test]
    fn sentiment_round_trips_through_serde() {
        let json = serde_json::to_string(&Sentiment::Negative).unwrap();
        assert_eq!(json, "\"negative\"");
        let back: Sentiment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Sentiment::Negative);
    }

    #[test]
    fn refund_status_string_forms() {
        assert_eq!(RefundStatus::NotRequested.to_string(), "not_requested");
        assert_eq!(RefundStatus::Processed.to_string(), "processed");
        use std::str::FromStr;
        assert_eq!(
            RefundStatus::from_str("processed").unwrap(),
            RefundStatus::Processed
        );
    }

    #[test]
    fn prompt_message_constructors_set_roles() {
        assert_eq!(PromptMessage::system("s").role, PromptRole::System);
        assert_eq!(PromptMessage::user("u").role, PromptRole::User);
        let t = PromptMessage::tool_result("call_1", "{}");
        assert_eq!(t.role, PromptRole::Tool);
        assert_eq!(t.tool_call_id.as_deref(), Some("call_1"));
    }
}
