// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test doubles shared across the workspace.
//!
//! `MockProvider` plays back a scripted sequence of provider responses;
//! `MemoryStore` is an in-memory `RecordStore` with the same compare-and-set
//! refund semantics as the SQLite backend.

pub mod memory_store;
pub mod mock_provider;

pub use memory_store::MemoryStore;
pub use mock_provider::MockProvider;
