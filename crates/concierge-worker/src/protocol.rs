// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the NDJSON worker protocol.
//!
//! One JSON object per line in both directions. Requests carry a correlation
//! id assigned by the channel; responses echo it back so concurrent invokes
//! can share a single child process.

use serde::{Deserialize, Serialize};

/// Startup handshake frame. The worker must emit this as its first stdout
/// line before any responses.
pub const READY_EVENT: &str = "ready";

/// First frame a worker writes after startup: `{"event":"ready"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadyFrame {
    pub event: String,
}

impl ReadyFrame {
    pub fn is_ready(&self) -> bool {
        self.event == READY_EVENT
    }
}

/// A tool invocation sent to the worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireRequest {
    pub id: u64,
    pub tool_name: String,
    pub arguments: serde_json::Value,
}

/// A structured error reported by the worker for one request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireError {
    pub kind: String,
    pub message: String,
}

/// A response frame from the worker. Exactly one of `result` / `error` is
/// set for a well-formed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireResponse {
    pub id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<WireError>,
}
