// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide session map with bounded size.

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tracing::debug;

use concierge_config::model::SessionConfig;
use concierge_core::Classification;

use crate::context::{ClassifyDecision, PendingAction, SessionContext};

pub struct SessionStore {
    sessions: DashMap<String, SessionContext>,
    gap: Duration,
    max_entries: usize,
}

impl SessionStore {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: DashMap::new(),
            gap: Duration::hours(config.gap_hours as i64),
            max_entries: config.max_entries,
        }
    }

    /// Record an inbound message and decide whether classification must run.
    ///
    /// Creates the session lazily on first contact. The decision is computed
    /// against the previous message time, then the clock is bumped and any
    /// order id in the text is captured.
    pub fn begin_turn(&self, user_id: &str, text: &str) -> ClassifyDecision {
        self.begin_turn_at(user_id, text, Utc::now())
    }

    pub fn begin_turn_at(
        &self,
        user_id: &str,
        text: &str,
        now: DateTime<Utc>,
    ) -> ClassifyDecision {
        if self.sessions.len() >= self.max_entries {
            self.evict_idle(now);
        }

        let mut entry = self
            .sessions
            .entry(user_id.to_string())
            .or_insert_with(|| {
                debug!(user_id, "new session");
                SessionContext::new(now)
            });

        let previous = if entry.cached_classification.is_some() {
            Some(entry.last_message_time)
        } else {
            None
        };
        let decision = entry.classify_decision(previous, now, self.gap);
        entry.observe_message(text, now);
        decision
    }

    /// Overwrite the cached classification for this user.
    pub fn store_classification(&self, user_id: &str, classification: Classification) {
        if let Some(mut entry) = self.sessions.get_mut(user_id) {
            entry.store_classification(classification, Utc::now());
        }
    }

    pub fn pending_action(&self, user_id: &str) -> PendingAction {
        self.sessions
            .get(user_id)
            .map(|e| e.pending_action)
            .unwrap_or_default()
    }

    pub fn set_pending_action(&self, user_id: &str, action: PendingAction) {
        if let Some(mut entry) = self.sessions.get_mut(user_id) {
            entry.pending_action = action;
        }
    }

    pub fn extracted_order_id(&self, user_id: &str) -> Option<String> {
        self.sessions
            .get(user_id)
            .and_then(|e| e.extracted_order_id().map(str::to_string))
    }

    pub fn cached_classification(&self, user_id: &str) -> Option<Classification> {
        self.sessions
            .get(user_id)
            .and_then(|e| e.cached_classification.clone())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop entries idle longer than the session gap. Called when the map
    /// is at capacity; keeps the store bounded without a background task.
    fn evict_idle(&self, now: DateTime<Utc>) {
        let before = self.sessions.len();
        let gap = self.gap;
        self.sessions
            .retain(|_, ctx| now - ctx.last_message_time <= gap);
        let evicted = before.saturating_sub(self.sessions.len());
        if evicted > 0 {
            debug!(evicted, "evicted idle sessions");
        }
    }
}
