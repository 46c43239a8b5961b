// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chat history operations.

use rusqlite::params;

use concierge_core::{ChatMessage, ChatRole, ConciergeError};

use crate::database::{map_tr_err, Database};

/// Append one message to a user's history.
pub async fn append_message(db: &Database, message: &ChatMessage) -> Result<(), ConciergeError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO chat_history (id, user_id, role, content, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.id,
                    message.user_id,
                    message.role.to_string(),
                    message.content,
                    message.created_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch the most recent `limit` turns for a user, oldest first.
pub async fn get_history(
    db: &Database,
    user_id: &str,
    limit: usize,
) -> Result<Vec<ChatMessage>, ConciergeError> {
    let user_id = user_id.to_string();
    let rows = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, role, content, created_at
                 FROM chat_history WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![user_id, limit as i64], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(rows)
        })
        .await
        .map_err(map_tr_err)?;

    let mut messages = Vec::with_capacity(rows.len());
    for (id, user_id, role, content, created_at) in rows {
        let role: ChatRole = role.parse().map_err(|_| {
            ConciergeError::Internal(format!("chat message {id} has invalid role `{role}`"))
        })?;
        messages.push(ChatMessage {
            id,
            user_id,
            role,
            content,
            created_at,
        });
    }
    messages.reverse();
    Ok(messages)
}
