use log::{info, warn};
use serde::Serialize;
use serde_json::Value;

use crate::backend::OrderBackend;
use crate::error::OrderError;
use crate::model::order::ConfirmRequest;
use crate::redemption::RedemptionPayload;

/// Acknowledgment of a redeemed order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Confirmation {
    pub order_id: String,
    pub staff_id: String,
    pub table_number: Option<String>,
    /// whatever the confirmation procedure returned
    pub acknowledgment: Value,
}

/// Redeems a scanned payload on behalf of `staff_id`.
///
/// `table_number` goes out as given, `None` becomes an explicit `null`.
/// One backend call, no retry, no local state touched.
pub async fn confirm<B: OrderBackend>(
    backend: &B,
    payload: &RedemptionPayload,
    staff_id: &str,
    table_number: Option<&str>,
) -> Result<Confirmation, OrderError> {
    if payload.order_id.is_empty() || payload.redemption_code.is_empty() {
        return Err(OrderError::decode("order id and code are both required"));
    }
    if staff_id.trim().is_empty() {
        return Err(OrderError::MissingStaff);
    }

    let request = ConfirmRequest {
        order_id: payload.order_id.clone(),
        code: payload.redemption_code.clone(),
        staff_id: staff_id.to_string(),
        table_number: table_number.map(str::to_string),
    };

    match backend.confirm_order(&request).await {
        Ok(acknowledgment) => {
            info!(
                "order={} confirmed by staff={} table={:?}",
                request.order_id, request.staff_id, request.table_number
            );
            Ok(Confirmation {
                order_id: request.order_id,
                staff_id: request.staff_id,
                table_number: request.table_number,
                acknowledgment,
            })
        }
        Err(e) => {
            warn!("confirming order={} failed, {}", request.order_id, e);
            Err(e)
        }
    }
}
