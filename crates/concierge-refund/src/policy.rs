// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Business rules for refunds: category restrictions and the shipping fee.

use std::collections::HashSet;

use concierge_config::model::RefundConfig;

#[derive(Debug, Clone)]
pub struct RefundPolicy {
    non_refundable: HashSet<String>,
    shipping_fee_rate: f64,
}

impl RefundPolicy {
    pub fn new(config: &RefundConfig) -> Self {
        Self {
            non_refundable: config.non_refundable_categories.iter().cloned().collect(),
            shipping_fee_rate: config.shipping_fee_rate,
        }
    }

    pub fn is_refundable_category(&self, category: &str) -> bool {
        !self.non_refundable.contains(category)
    }

    /// Shipping fee deducted from the order value, rounded to cents.
    pub fn shipping_fee(&self, order_value: f64) -> f64 {
        round2(order_value * self.shipping_fee_rate)
    }

    /// Amount refunded to the customer: order value minus the shipping fee,
    /// rounded to cents.
    pub fn refund_amount(&self, order_value: f64) -> f64 {
        round2(order_value * (1.0 - self.shipping_fee_rate))
    }
}

pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
