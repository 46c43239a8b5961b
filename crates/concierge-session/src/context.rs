// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! A single user's conversation state.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use concierge_core::{Classification, OrderId};

/// Information the dispatch loop is waiting on from the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingAction {
    #[default]
    None,
    AwaitingOrderId,
    AwaitingRefundConfirmation,
}

/// Whether classification must run for the current message.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyDecision {
    /// First message from this user, no cache exists.
    RunFirstMessage,
    /// The previous message is older than the session gap; the cache is stale.
    RunSessionExpired,
    /// A classification from this session is still valid.
    UseCached(Classification),
}

#[derive(Debug, Clone)]
pub struct SessionContext {
    pub cached_classification: Option<Classification>,
    pub cache_timestamp: Option<DateTime<Utc>>,
    pub last_message_time: DateTime<Utc>,
    pub pending_action: PendingAction,
    pub extracted_entities: HashMap<String, String>,
}

impl SessionContext {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            cached_classification: None,
            cache_timestamp: None,
            last_message_time: now,
            pending_action: PendingAction::None,
            extracted_entities: HashMap::new(),
        }
    }

    /// Decide whether to classify, given the time of the previous message.
    ///
    /// `previous` is the `last_message_time` as it was before the current
    /// message touched the session.
    pub fn classify_decision(
        &self,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
        gap: Duration,
    ) -> ClassifyDecision {
        let Some(cached) = &self.cached_classification else {
            return ClassifyDecision::RunFirstMessage;
        };
        match previous {
            Some(prev) if now - prev > gap => ClassifyDecision::RunSessionExpired,
            Some(_) => ClassifyDecision::UseCached(cached.clone()),
            None => ClassifyDecision::RunFirstMessage,
        }
    }

    /// Record the current message: bump the clock and capture any order id
    /// present in the text.
    pub fn observe_message(&mut self, text: &str, now: DateTime<Utc>) {
        self.last_message_time = now;
        if let Some(order_id) = OrderId::extract(text) {
            self.extracted_entities
                .insert("order_id".to_string(), order_id.as_str().to_string());
        }
    }

    pub fn store_classification(&mut self, classification: Classification, now: DateTime<Utc>) {
        self.cached_classification = Some(classification);
        self.cache_timestamp = Some(now);
    }

    pub fn extracted_order_id(&self) -> Option<&str> {
        self.extracted_entities.get("order_id").map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::Sentiment;

    fn classification() -> Classification {
        Classification {
            intent: "refund_request".to_string(),
            intent_confidence: 0.93,
            sentiment: Sentiment::Negative,
            sentiment_confidence: 0.81,
        }
    }

    #[test]
    fn first_message_requires_classification() {
        let now = Utc::now();
        let ctx = SessionContext::new(now);
        assert_eq!(
            ctx.classify_decision(None, now, Duration::hours(24)),
            ClassifyDecision::RunFirstMessage
        );
    }

    #[test]
    fn cached_classification_reused_within_gap() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.store_classification(classification(), now);
        let later = now + Duration::hours(2);
        let decision = ctx.classify_decision(Some(now), later, Duration::hours(24));
        assert!(matches!(decision, ClassifyDecision::UseCached(_)));
    }

    #[test]
    fn gap_over_threshold_expires_cache() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.store_classification(classification(), now);
        let much_later = now + Duration::hours(25);
        assert_eq!(
            ctx.classify_decision(Some(now), much_later, Duration::hours(24)),
            ClassifyDecision::RunSessionExpired
        );
    }

    #[test]
    fn gap_exactly_at_threshold_keeps_cache() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.store_classification(classification(), now);
        let at_gap = now + Duration::hours(24);
        assert!(matches!(
            ctx.classify_decision(Some(now), at_gap, Duration::hours(24)),
            ClassifyDecision::UseCached(_)
        ));
    }

    #[test]
    fn message_with_order_id_populates_entities() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.observe_message("ord000123 please check", now);
        assert_eq!(ctx.extracted_order_id(), Some("ORD000123"));
    }

    #[test]
    fn message_without_order_id_keeps_previous_entity() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.observe_message("my order is ORD000032", now);
        ctx.observe_message("yes please refund it", now);
        assert_eq!(ctx.extracted_order_id(), Some("ORD000032"));
    }

    #[test]
    fn short_id_is_not_extracted() {
        let now = Utc::now();
        let mut ctx = SessionContext::new(now);
        ctx.observe_message("ORD12 is my order", now);
        assert_eq!(ctx.extracted_order_id(), None);
    }
}
