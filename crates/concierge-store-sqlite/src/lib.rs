// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite record store.
//!
//! A single background connection (tokio-rusqlite) in WAL mode, with
//! embedded refinery migrations. The refund state flip is a conditional
//! UPDATE so concurrent refund attempts resolve in the database, not in
//! application locks.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
