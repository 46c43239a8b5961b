// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! System prompt and per-turn context summary.

use std::fmt::Write;

use concierge_core::{ChatMessage, ChatRole, Classification, PromptMessage};
use concierge_session::PendingAction;

/// Compact description of what the session already knows, injected into the
/// system prompt so the model does not re-ask for known facts.
pub fn context_summary(
    classification: Option<&Classification>,
    pending_action: PendingAction,
    order_id: Option<&str>,
) -> String {
    let mut summary = String::new();
    if let Some(c) = classification {
        let _ = write!(
            summary,
            "Detected intent: {} (confidence {:.2}). Customer sentiment: {} (confidence {:.2}).",
            c.intent, c.intent_confidence, c.sentiment, c.sentiment_confidence
        );
    }
    if let Some(order_id) = order_id {
        if !summary.is_empty() {
            summary.push(' ');
        }
        let _ = write!(summary, "The customer's order id is {order_id}.");
    }
    match pending_action {
        PendingAction::AwaitingOrderId => {
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str("You are waiting for the customer to provide their order id.");
        }
        PendingAction::AwaitingRefundConfirmation => {
            if !summary.is_empty() {
                summary.push(' ');
            }
            summary.push_str(
                "You are waiting for the customer to confirm the refund before processing it.",
            );
        }
        PendingAction::None => {}
    }
    summary
}

pub fn system_prompt(agent_name: &str, summary: &str) -> PromptMessage {
    let mut content = format!(
        "You are {agent_name}, a customer support assistant for an online store. \
         Help customers check orders, process refunds, and escalate to a human when needed. \
         Always check refund eligibility and get the customer's confirmation before processing a refund. \
         Be concise and polite."
    );
    if !summary.is_empty() {
        content.push_str("\n\nConversation context: ");
        content.push_str(summary);
    }
    PromptMessage::system(content)
}

/// Convert persisted history into prompt messages.
pub fn history_messages(history: &[ChatMessage]) -> Vec<PromptMessage> {
    history
        .iter()
        .map(|m| match m.role {
            ChatRole::User => PromptMessage::user(m.content.clone()),
            ChatRole::Assistant => PromptMessage::assistant(m.content.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::Sentiment;

    #[test]
    fn summary_mentions_intent_order_and_pending_action() {
        let classification = Classification {
            intent: "refund_request".to_string(),
            intent_confidence: 0.93,
            sentiment: Sentiment::Negative,
            sentiment_confidence: 0.8,
        };
        let summary = context_summary(
            Some(&classification),
            PendingAction::AwaitingRefundConfirmation,
            Some("ORD000032"),
        );
        assert!(summary.contains("refund_request"));
        assert!(summary.contains("ORD000032"));
        assert!(summary.contains("confirm the refund"));
    }

    #[test]
    fn empty_context_yields_empty_summary() {
        let summary = context_summary(None, PendingAction::None, None);
        assert!(summary.is_empty());
        let prompt = system_prompt("concierge", &summary);
        assert!(!prompt.content.contains("Conversation context"));
    }
}
