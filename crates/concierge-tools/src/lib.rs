// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tools the model can call, and the registry that validates and routes
//! their invocations.
//!
//! Arguments are checked against each tool's declared schema before any
//! dispatch happens, so malformed model output never reaches the worker
//! process or the refund workflow.

pub mod registry;
pub mod schema;
pub mod tool;
pub mod tools;

pub use registry::ToolRegistry;
pub use tool::Tool;
pub use tools::{
    ClassifyTool, CheckRefundEligibilityTool, EscalateToHumanTool, LookupOrderTool,
    ProcessRefundTool,
};
