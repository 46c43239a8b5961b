// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Refund workflow.
//!
//! Two operations over the record store: a side-effect-free eligibility
//! check and an idempotent processing step. Processing re-derives the
//! eligible amount from the stored order value rather than trusting the
//! caller, and flips `refund_status` with a compare-and-set so concurrent
//! attempts yield exactly one success.

pub mod policy;
pub mod workflow;

pub use policy::RefundPolicy;
pub use workflow::{EligibilityReport, RefundReceipt, RefundWorkflow};
