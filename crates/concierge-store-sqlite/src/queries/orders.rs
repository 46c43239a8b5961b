// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Order table operations.

use rusqlite::params;

use concierge_core::{ConciergeError, OrderId, OrderRecord, RefundStatus, RefundUpdate};

use crate::database::{map_tr_err, Database};

/// Insert an order row. Used for seeding and tests.
pub async fn insert_order(db: &Database, record: &OrderRecord) -> Result<(), ConciergeError> {
    let record = record.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO orders (order_id, product_category, order_value, refund_status,
                                     refund_amount, refund_reason, refund_date)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.order_id.as_str(),
                    record.product_category,
                    record.order_value,
                    record.refund_status.to_string(),
                    record.refund_amount,
                    record.refund_reason,
                    record.refund_date,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

/// Fetch one order by id.
pub async fn get_order(
    db: &Database,
    order_id: &OrderId,
) -> Result<Option<OrderRecord>, ConciergeError> {
    let id = order_id.as_str().to_string();
    let row = db
        .connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT order_id, product_category, order_value, refund_status,
                        refund_amount, refund_reason, refund_date
                 FROM orders WHERE order_id = ?1",
            )?;
            let result = stmt.query_row(params![id], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, Option<f64>>(4)?,
                    row.get::<_, Option<String>>(5)?,
                    row.get::<_, Option<String>>(6)?,
                ))
            });
            match result {
                Ok(row) => Ok(Some(row)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
        .await
        .map_err(map_tr_err)?;

    let Some((order_id, product_category, order_value, status, amount, reason, date)) = row else {
        return Ok(None);
    };
    let refund_status: RefundStatus = status.parse().map_err(|_| {
        ConciergeError::Internal(format!("order {order_id} has invalid refund status `{status}`"))
    })?;
    Ok(Some(OrderRecord {
        order_id: order_id.parse()?,
        product_category,
        order_value,
        refund_status,
        refund_amount: amount,
        refund_reason: reason,
        refund_date: date,
    }))
}

/// Flip the refund status with a compare-and-set.
///
/// The WHERE clause only matches rows still in `not_requested`, so exactly
/// one concurrent caller observes a changed row. Returns whether this call
/// performed the transition.
pub async fn mark_refund_processed(
    db: &Database,
    order_id: &OrderId,
    update: &RefundUpdate,
) -> Result<bool, ConciergeError> {
    let id = order_id.as_str().to_string();
    let update = update.clone();
    let changed = db
        .connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE orders
                 SET refund_status = ?1, refund_amount = ?2, refund_reason = ?3, refund_date = ?4
                 WHERE order_id = ?5 AND refund_status = ?6",
                params![
                    RefundStatus::Processed.to_string(),
                    update.amount,
                    update.reason,
                    update.date,
                    id,
                    RefundStatus::NotRequested.to_string(),
                ],
            )?;
            Ok(changed)
        })
        .await
        .map_err(map_tr_err)?;
    Ok(changed == 1)
}
