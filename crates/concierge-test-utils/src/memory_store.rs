// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory `RecordStore` for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use concierge_core::{
    Adapter, AlertPriority, ChatMessage, ConciergeError, HealthStatus, OrderId, OrderRecord,
    RecordStore, RefundStatus, RefundUpdate,
};

/// A persisted human-escalation alert, exposed for assertions.
#[derive(Debug, Clone)]
pub struct StoredAlert {
    pub id: String,
    pub user_id: String,
    pub reason: String,
    pub last_message: String,
    pub priority: AlertPriority,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Default)]
struct Inner {
    orders: HashMap<String, OrderRecord>,
    chat: Vec<ChatMessage>,
    alerts: Vec<StoredAlert>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an order. Convenience for test setup.
    pub fn with_order(self, record: OrderRecord) -> Self {
        self.insert_order(record);
        self
    }

    pub fn insert_order(&self, record: OrderRecord) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .orders
            .insert(record.order_id.as_str().to_string(), record);
    }

    pub fn alerts(&self) -> Vec<StoredAlert> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.alerts.clone()
    }

    pub fn chat_len(&self) -> usize {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.chat.len()
    }
}

#[async_trait]
impl Adapter for MemoryStore {
    fn name(&self) -> &str {
        "memory-store"
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, ConciergeError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        Ok(inner.orders.get(order_id.as_str()).cloned())
    }

    async fn mark_refund_processed(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<bool, ConciergeError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let Some(record) = inner.orders.get_mut(order_id.as_str()) else {
            return Ok(false);
        };
        if record.refund_status != RefundStatus::NotRequested {
            return Ok(false);
        }
        record.refund_status = RefundStatus::Processed;
        record.refund_amount = Some(update.amount);
        record.refund_reason = Some(update.reason.clone());
        record.refund_date = Some(update.date.clone());
        Ok(true)
    }

    async fn append_chat_message(&self, message: &ChatMessage) -> Result<(), ConciergeError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.chat.push(message.clone());
        Ok(())
    }

    async fn get_chat_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ConciergeError> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let mut messages: Vec<ChatMessage> = inner
            .chat
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect();
        messages.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.into_iter().skip(skip).collect())
    }

    async fn create_alert(
        &self,
        user_id: &str,
        reason: &str,
        last_message: &str,
        priority: AlertPriority,
    ) -> Result<String, ConciergeError> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let id = Uuid::new_v4().to_string();
        inner.alerts.push(StoredAlert {
            id: id.clone(),
            user_id: user_id.to_string(),
            reason: reason.to_string(),
            last_message: last_message.to_string(),
            priority,
            created_at: Utc::now(),
        });
        Ok(id)
    }
}
