// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-escalation alert operations.

use rusqlite::params;

use concierge_core::{AlertPriority, ConciergeError};

use crate::database::{map_tr_err, Database};

/// Insert an alert row and return its id.
pub async fn insert_alert(
    db: &Database,
    id: &str,
    user_id: &str,
    reason: &str,
    last_message: &str,
    priority: AlertPriority,
    created_at: &str,
) -> Result<(), ConciergeError> {
    let (id, user_id, reason, last_message, created_at) = (
        id.to_string(),
        user_id.to_string(),
        reason.to_string(),
        last_message.to_string(),
        created_at.to_string(),
    );
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO human_intervention_alerts
                     (id, user_id, reason, last_message, priority, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    user_id,
                    reason,
                    last_message,
                    priority.to_string(),
                    created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Count alerts for a user. Used by tests and health reporting.
pub async fn count_alerts_for_user(db: &Database, user_id: &str) -> Result<u64, ConciergeError> {
    let user_id = user_id.to_string();
    db.connection()
        .call(move |conn| {
            let count: u64 = conn.query_row(
                "SELECT COUNT(*) FROM human_intervention_alerts WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
        .await
        .map_err(map_tr_err)
}
