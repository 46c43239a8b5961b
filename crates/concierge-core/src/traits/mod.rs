// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Concierge's external collaborators.

pub mod adapter;
pub mod provider;
pub mod store;

pub use adapter::Adapter;
pub use provider::ProviderAdapter;
pub use store::{RecordStore, RefundUpdate};
