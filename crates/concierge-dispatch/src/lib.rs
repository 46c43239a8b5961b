// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The dispatch loop.
//!
//! One inbound message becomes at most two provider calls: the first may
//! request tool calls, which are validated and executed sequentially; the
//! second synthesizes the reply from the tool results. Tool requests in the
//! synthesis response are ignored, so a turn can never recurse.

pub mod dispatcher;
pub mod prompt;

pub use dispatcher::Dispatcher;
