// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All access is serialized through tokio-rusqlite's single background
//! thread. Do NOT create additional Connection instances for writes.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::info;

use concierge_core::ConciergeError;

use crate::migrations;

pub struct Database {
    connection: Connection,
}

impl Database {
    /// Open (or create) the database at `path`, apply PRAGMAs, and run all
    /// pending migrations.
    pub async fn open(path: &Path) -> Result<Self, ConciergeError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| ConciergeError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let connection = Connection::open(path)
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        connection
            .call(|conn| {
                conn.pragma_update(None, "journal_mode", "WAL")?;
                conn.pragma_update(None, "synchronous", "NORMAL")?;
                conn.pragma_update(None, "foreign_keys", "ON")?;
                migrations::run_migrations(conn)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;

        info!(path = %path.display(), "database open");
        Ok(Self { connection })
    }

    /// In-memory database for tests.
    pub async fn open_in_memory() -> Result<Self, ConciergeError> {
        let connection = Connection::open_in_memory()
            .await
            .map_err(|e| map_tr_err(e.into()))?;
        connection
            .call(|conn| {
                migrations::run_migrations(conn)?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)?;
        Ok(Self { connection })
    }

    pub fn connection(&self) -> &Connection {
        &self.connection
    }
}

/// Convert a tokio-rusqlite error into the storage error variant.
pub fn map_tr_err(err: tokio_rusqlite::Error) -> ConciergeError {
    ConciergeError::Storage {
        source: Box::new(err),
    }
}
