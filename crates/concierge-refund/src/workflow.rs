// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Eligibility check and refund processing over the record store.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::info;

use concierge_core::{ConciergeError, OrderId, RecordStore, RefundStatus, RefundUpdate};

use crate::policy::RefundPolicy;

/// Outcome of a side-effect-free eligibility check. Serialized as the tool
/// result payload for the model to explain to the customer.
#[derive(Debug, Clone, Serialize)]
pub struct EligibilityReport {
    pub order_id: String,
    pub eligible: bool,
    pub product_category: String,
    pub order_value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refund_amount: Option<f64>,
    pub message: String,
}

/// Outcome of a successful refund.
#[derive(Debug, Clone, Serialize)]
pub struct RefundReceipt {
    pub transaction_id: String,
    pub amount_refunded: f64,
}

pub struct RefundWorkflow {
    store: Arc<dyn RecordStore>,
    policy: RefundPolicy,
}

impl RefundWorkflow {
    pub fn new(store: Arc<dyn RecordStore>, policy: RefundPolicy) -> Self {
        Self { store, policy }
    }

    /// Check whether an order can be refunded. Never mutates state.
    ///
    /// Ineligibility (restricted category, already refunded) is reported in
    /// the result payload, not as an error, so the model can explain it.
    /// A missing order is a `NotFound` error.
    pub async fn check_eligibility(
        &self,
        order_id: &OrderId,
    ) -> Result<EligibilityReport, ConciergeError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| ConciergeError::not_found(format!("order {order_id}")))?;

        if order.refund_status == RefundStatus::Processed {
            return Ok(EligibilityReport {
                order_id: order_id.as_str().to_string(),
                eligible: false,
                product_category: order.product_category,
                order_value: order.order_value,
                shipping_fee: None,
                refund_amount: None,
                message: format!("order {order_id} has already been refunded"),
            });
        }

        if !self.policy.is_refundable_category(&order.product_category) {
            return Ok(EligibilityReport {
                order_id: order_id.as_str().to_string(),
                eligible: false,
                product_category: order.product_category.clone(),
                order_value: order.order_value,
                shipping_fee: None,
                refund_amount: None,
                message: format!(
                    "items in the {} category are not eligible for refunds",
                    order.product_category
                ),
            });
        }

        let shipping_fee = self.policy.shipping_fee(order.order_value);
        let refund_amount = self.policy.refund_amount(order.order_value);
        Ok(EligibilityReport {
            order_id: order_id.as_str().to_string(),
            eligible: true,
            product_category: order.product_category,
            order_value: order.order_value,
            shipping_fee: Some(shipping_fee),
            refund_amount: Some(refund_amount),
            message: format!(
                "eligible for a refund of {refund_amount:.2} after a {shipping_fee:.2} shipping fee"
            ),
        })
    }

    /// Process a refund. Exactly one caller can succeed per order.
    ///
    /// The amount is re-derived from the stored order value; a caller-supplied
    /// amount that does not match is rejected rather than trusted. The state
    /// flip is a compare-and-set in the store: losing the race maps to
    /// `AlreadyRefunded`, same as finding the order already processed.
    pub async fn process(
        &self,
        order_id: &OrderId,
        amount: f64,
        reason: &str,
    ) -> Result<RefundReceipt, ConciergeError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or_else(|| ConciergeError::not_found(format!("order {order_id}")))?;

        if !self.policy.is_refundable_category(&order.product_category) {
            return Err(ConciergeError::validation(format!(
                "order {order_id} is in the non-refundable {} category",
                order.product_category
            )));
        }

        if order.refund_status == RefundStatus::Processed {
            return Err(ConciergeError::AlreadyRefunded {
                order_id: order_id.as_str().to_string(),
            });
        }

        let expected = self.policy.refund_amount(order.order_value);
        if (amount - expected).abs() > 0.005 {
            return Err(ConciergeError::validation(format!(
                "refund amount {amount:.2} does not match the eligible amount {expected:.2} for order {order_id}"
            )));
        }

        let now = Utc::now();
        let update = RefundUpdate {
            amount: expected,
            reason: reason.to_string(),
            date: now.to_rfc3339(),
        };
        let won = self.store.mark_refund_processed(order_id, &update).await?;
        if !won {
            return Err(ConciergeError::AlreadyRefunded {
                order_id: order_id.as_str().to_string(),
            });
        }

        let transaction_id = format!("RFND_{}_{}", now.format("%Y%m%d%H%M%S"), order_id);
        info!(%order_id, amount = expected, transaction_id, "refund processed");
        Ok(RefundReceipt {
            transaction_id,
            amount_refunded: expected,
        })
    }
}
