// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `RecordStore` implementation over the SQLite database.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use concierge_config::model::StorageConfig;
use concierge_core::{
    Adapter, AlertPriority, ChatMessage, ConciergeError, HealthStatus, OrderId, OrderRecord,
    RecordStore, RefundUpdate,
};

use crate::database::{map_tr_err, Database};
use crate::queries;

pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub async fn open(config: &StorageConfig) -> Result<Self, ConciergeError> {
        let path = PathBuf::from(&config.database_path);
        let db = Database::open(&path).await?;
        Ok(Self { db })
    }

    pub async fn open_in_memory() -> Result<Self, ConciergeError> {
        Ok(Self {
            db: Database::open_in_memory().await?,
        })
    }

    /// Seed an order row. Used by the REPL seeding command and tests.
    pub async fn insert_order(&self, record: &OrderRecord) -> Result<(), ConciergeError> {
        queries::orders::insert_order(&self.db, record).await
    }

    pub async fn count_alerts_for_user(&self, user_id: &str) -> Result<u64, ConciergeError> {
        queries::alerts::count_alerts_for_user(&self.db, user_id).await
    }
}

#[async_trait]
impl Adapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite-store"
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        self.db
            .connection()
            .call(|conn| {
                conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn get_order(&self, order_id: &OrderId) -> Result<Option<OrderRecord>, ConciergeError> {
        queries::orders::get_order(&self.db, order_id).await
    }

    async fn mark_refund_processed(
        &self,
        order_id: &OrderId,
        update: &RefundUpdate,
    ) -> Result<bool, ConciergeError> {
        queries::orders::mark_refund_processed(&self.db, order_id, update).await
    }

    async fn append_chat_message(&self, message: &ChatMessage) -> Result<(), ConciergeError> {
        queries::chat::append_message(&self.db, message).await
    }

    async fn get_chat_history(
        &self,
        user_id: &str,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ConciergeError> {
        queries::chat::get_history(&self.db, user_id, limit).await
    }

    async fn create_alert(
        &self,
        user_id: &str,
        reason: &str,
        last_message: &str,
        priority: AlertPriority,
    ) -> Result<String, ConciergeError> {
        let id = Uuid::new_v4().to_string();
        let created_at = Utc::now().to_rfc3339();
        queries::alerts::insert_alert(
            &self.db,
            &id,
            user_id,
            reason,
            last_message,
            priority,
            &created_at,
        )
        .await?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::{ChatRole, RefundStatus};

    fn order(id: &str, category: &str, value: f64) -> OrderRecord {
        OrderRecord {
            order_id: id.parse().unwrap(),
            product_category: category.to_string(),
            order_value: value,
            refund_status: RefundStatus::NotRequested,
            refund_amount: None,
            refund_reason: None,
            refund_date: None,
        }
    }

    fn message(user_id: &str, role: ChatRole, content: &str, at: &str) -> ChatMessage {
        ChatMessage {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            role,
            content: content.to_string(),
            created_at: at.to_string(),
        }
    }

    #[tokio::test]
    async fn order_round_trips_through_sqlite() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store
            .insert_order(&order("ORD000032", "Personal Care", 1651.0))
            .await
            .unwrap();

        let fetched = store
            .get_order(&"ORD000032".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(fetched.product_category, "Personal Care");
        assert_eq!(fetched.order_value, 1651.0);
        assert_eq!(fetched.refund_status, RefundStatus::NotRequested);

        let missing = store.get_order(&"ORD999999".parse().unwrap()).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn refund_cas_flips_exactly_once() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        store
            .insert_order(&order("ORD000032", "Personal Care", 1651.0))
            .await
            .unwrap();
        let order_id: OrderId = "ORD000032".parse().unwrap();
        let update = RefundUpdate {
            amount: 1568.45,
            reason: "damaged item".to_string(),
            date: Utc::now().to_rfc3339(),
        };

        assert!(store.mark_refund_processed(&order_id, &update).await.unwrap());
        assert!(!store.mark_refund_processed(&order_id, &update).await.unwrap());

        let record = store.get_order(&order_id).await.unwrap().unwrap();
        assert_eq!(record.refund_status, RefundStatus::Processed);
        assert_eq!(record.refund_amount, Some(1568.45));
        assert_eq!(record.refund_reason.as_deref(), Some("damaged item"));
        assert!(record.refund_date.is_some());
    }

    #[tokio::test]
    async fn cas_on_missing_order_reports_no_change() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let update = RefundUpdate {
            amount: 1.0,
            reason: "x".to_string(),
            date: Utc::now().to_rfc3339(),
        };
        let changed = store
            .mark_refund_processed(&"ORD999999".parse().unwrap(), &update)
            .await
            .unwrap();
        assert!(!changed);
    }

    #[tokio::test]
    async fn chat_history_returns_recent_turns_oldest_first() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        for (i, content) in ["one", "two", "three", "four"].iter().enumerate() {
            let at = format!("2026-08-24T10:0{i}:00Z");
            store
                .append_chat_message(&message("user-1", ChatRole::User, content, &at))
                .await
                .unwrap();
        }
        store
            .append_chat_message(&message(
                "user-2",
                ChatRole::User,
                "unrelated",
                "2026-08-24T10:05:00Z",
            ))
            .await
            .unwrap();

        let history = store.get_chat_history("user-1", 3).await.unwrap();
        let contents: Vec<&str> = history.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["two", "three", "four"]);
    }

    #[tokio::test]
    async fn alerts_persist_per_user() {
        let store = SqliteStore::open_in_memory().await.unwrap();
        let id = store
            .create_alert("user-1", "asked for a human", "get me a person", AlertPriority::High)
            .await
            .unwrap();
        assert!(!id.is_empty());
        assert_eq!(store.count_alerts_for_user("user-1").await.unwrap(), 1);
        assert_eq!(store.count_alerts_for_user("user-2").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn file_backed_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            database_path: dir
                .path()
                .join("concierge.db")
                .to_string_lossy()
                .into_owned(),
        };

        {
            let store = SqliteStore::open(&config).await.unwrap();
            store
                .insert_order(&order("ORD000003", "Beverages", 599.0))
                .await
                .unwrap();
        }

        let store = SqliteStore::open(&config).await.unwrap();
        let record = store
            .get_order(&"ORD000003".parse().unwrap())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(record.product_category, "Beverages");
    }
}
