// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Groq provider adapter.
//!
//! Speaks the OpenAI-compatible chat completions API over HTTPS, with a
//! single retry on transient statuses.

pub mod client;
pub mod types;

pub use client::GroqClient;
