// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The built-in tools.

pub mod classify;
pub mod escalate;
pub mod lookup_order;
pub mod refund;

pub use classify::ClassifyTool;
pub use escalate::EscalateToHumanTool;
pub use lookup_order::LookupOrderTool;
pub use refund::{CheckRefundEligibilityTool, ProcessRefundTool};
