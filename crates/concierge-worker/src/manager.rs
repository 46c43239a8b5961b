// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle management for the worker channel.
//!
//! Holds at most one live `WorkerChannel`. A dead channel is not restarted
//! eagerly: the call that observed the failure returns its error, and the
//! next invoke spawns a fresh child.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use concierge_config::model::WorkerConfig;
use concierge_core::{Adapter, ConciergeError, HealthStatus};

use crate::channel::WorkerChannel;

pub struct WorkerManager {
    config: WorkerConfig,
    slot: tokio::sync::Mutex<Option<Arc<WorkerChannel>>>,
}

impl WorkerManager {
    pub fn new(config: WorkerConfig) -> Self {
        Self {
            config,
            slot: tokio::sync::Mutex::new(None),
        }
    }

    /// Invoke a worker tool, spawning the child first if none is running.
    pub async fn invoke(
        &self,
        tool_name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ConciergeError> {
        let channel = self.channel().await?;
        channel.invoke(tool_name, arguments).await
    }

    /// Kill the current child, if any.
    pub async fn shutdown(&self) {
        let mut slot = self.slot.lock().await;
        if let Some(channel) = slot.take() {
            channel.close().await;
        }
    }

    async fn channel(&self) -> Result<Arc<WorkerChannel>, ConciergeError> {
        let mut slot = self.slot.lock().await;
        if let Some(channel) = slot.as_ref() {
            if channel.is_alive() {
                return Ok(Arc::clone(channel));
            }
            info!(command = %channel.command(), "worker channel dead, respawning");
        }
        let channel = WorkerChannel::spawn(&self.config).await?;
        *slot = Some(Arc::clone(&channel));
        Ok(channel)
    }
}

#[async_trait]
impl Adapter for WorkerManager {
    fn name(&self) -> &str {
        "worker"
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        let slot = self.slot.lock().await;
        match slot.as_ref() {
            Some(channel) if channel.is_alive() => Ok(HealthStatus::Healthy),
            Some(_) => Ok(HealthStatus::Degraded(
                "worker process exited, will respawn on next invoke".to_string(),
            )),
            None => Ok(HealthStatus::Degraded(
                "worker not started yet".to_string(),
            )),
        }
    }
}
