// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Base trait shared by all pluggable adapters.

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::types::HealthStatus;

/// Base trait for pluggable backends (provider, record store).
///
/// Gives the binary a uniform way to name and health-check its external
/// collaborators at startup.
#[async_trait]
pub trait Adapter: Send + Sync {
    /// Stable adapter name used in logs and diagnostics.
    fn name(&self) -> &str;

    /// Checks whether the backing resource is reachable and operational.
    async fn health_check(&self) -> Result<HealthStatus, ConciergeError>;
}
