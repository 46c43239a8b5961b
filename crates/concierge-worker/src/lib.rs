// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Child worker process channel.
//!
//! The worker is an external program (model inference, order database
//! access) driven over stdin/stdout with newline-delimited JSON frames.
//! This crate owns spawning, the ready handshake, correlation-id
//! multiplexing, timeouts, and restart-on-next-call.

pub mod channel;
pub mod manager;
pub mod protocol;

pub use channel::WorkerChannel;
pub use manager::WorkerManager;
pub use protocol::{ReadyFrame, WireError, WireRequest, WireResponse};
