use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::flow::FlowState;
use crate::model::order::{format_countdown, GuestDetails, OrderHandle};
use crate::redemption;

#[derive(Debug, Deserialize)]
pub(crate) struct PostCheckoutRequest {
    #[serde(flatten)]
    pub details: GuestDetails,
    /// empty the cart once the order is accepted
    #[serde(default)]
    pub clear_cart: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct PostCheckoutResponse {
    pub order: OrderHandle,
    pub qr_payload: String,
    pub seconds_left: i64,
    pub countdown: String,
}

impl PostCheckoutResponse {
    pub fn new(order: OrderHandle, now: DateTime<Utc>) -> Result<Self, OrderError> {
        let seconds_left = order.seconds_left(now);
        Ok(Self {
            qr_payload: redemption::encode(&order)?,
            countdown: format_countdown(seconds_left),
            seconds_left,
            order,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct GetCheckoutResponse {
    pub flow: FlowState,
    pub qr_payload: Option<String>,
    pub seconds_left: Option<i64>,
    pub countdown: Option<String>,
}

impl GetCheckoutResponse {
    pub fn new(flow: FlowState, handle: Option<&OrderHandle>, now: DateTime<Utc>) -> Result<Self, OrderError> {
        let seconds_left = handle.map(|h| h.seconds_left(now));
        Ok(Self {
            flow,
            qr_payload: handle.map(redemption::encode).transpose()?,
            seconds_left,
            countdown: seconds_left.map(format_countdown),
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostConfirmRequest {
    /// raw scanned QR content
    pub payload: String,
    pub staff_id: String,
    pub table_number: Option<String>,
}
