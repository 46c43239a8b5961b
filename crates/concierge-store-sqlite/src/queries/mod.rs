// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQL query modules, one per table.

pub mod alerts;
pub mod chat;
pub mod orders;
