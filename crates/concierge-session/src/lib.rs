// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user session context store.
//!
//! Keeps one [`SessionContext`] per user in a process-wide `DashMap`. The
//! store decides when the classify tool must run (first message, or a gap
//! longer than `session.gap_hours` since the previous message) and caches
//! the result otherwise. Mutation happens under the shard entry lock; no
//! await points are held across it.

pub mod context;
pub mod store;

pub use context::{ClassifyDecision, PendingAction, SessionContext};
pub use store::SessionStore;
