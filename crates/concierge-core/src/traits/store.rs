// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Record store trait: the persistent-store operations the orchestration
//! core consumes (orders, chat history, escalation alerts).

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::Adapter;
use crate::types::{AlertPriority, ChatMessage, OrderId, OrderRecord};

/// Fields persisted when a refund is processed.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundUpdate {
    pub amount: f64,
    pub reason: String,
    /// RFC 3339 timestamp of the transition.
    pub date: String,
}

/// Adapter for the persistent record store.
///
/// Implementations must provide at-least read-your-writes consistency per
/// key. [`mark_refund_processed`](RecordStore::mark_refund_processed) is the
/// only mutation of order records and must be an atomic compare-and-set.
#[async_trait]
pub trait RecordStore: Adapter {
    /// Fetches an order by id, or `None` when no such order exists.
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, ConciergeError>;

    /// Atomically transitions `refund_status` from `not_requested` to
    /// `processed`, persisting the refund fields. Returns `false` without
    /// mutating anything when the order was already processed (the CAS lost).
    async fn mark_refund_processed(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<bool, ConciergeError>;

    /// Appends one turn to a user's chat history.
    async fn append_chat_message(&self, message: &ChatMessage) -> Result<(), ConciergeError>;

    /// Returns the most recent `limit` turns for a user, oldest first.
    async fn get_chat_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ConciergeError>;

    /// Records a human-escalation alert and returns its id.
    async fn create_alert(
        &self,
        user_id: &str,
        reason: &str,
        last_message: &str,
        priority: AlertPriority,
    ) -> Result<String, ConciergeError>;
}
