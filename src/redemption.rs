//! QR payload carrying an order id and its redemption code.
//!
//! The wire form is compact JSON, `{"orderId":"…","code":"…"}`. Decoding is
//! stateless, so suppressing a repeated scan is up to the caller.

use serde::{Deserialize, Serialize};

use crate::error::OrderError;
use crate::model::order::OrderHandle;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedemptionPayload {
    #[serde(rename = "orderId")]
    pub order_id: String,
    #[serde(rename = "code")]
    pub redemption_code: String,
}

#[derive(Debug, Deserialize)]
struct RawPayload {
    #[serde(rename = "orderId")]
    order_id: Option<String>,
    code: Option<String>,
}

impl From<&OrderHandle> for RedemptionPayload {
    fn from(handle: &OrderHandle) -> Self {
        Self {
            order_id: handle.order_id.clone(),
            redemption_code: handle.redemption_code.clone(),
        }
    }
}

/// Serializes the order id and code of `handle`. Same handle, same string.
pub fn encode(handle: &OrderHandle) -> Result<String, OrderError> {
    encode_payload(&RedemptionPayload::from(handle))
}

pub fn encode_payload(payload: &RedemptionPayload) -> Result<String, OrderError> {
    serde_json::to_string(payload).map_err(|e| OrderError::Encode {
        reason: e.to_string(),
    })
}

pub fn decode(raw: &str) -> Result<RedemptionPayload, OrderError> {
    let parsed: RawPayload = serde_json::from_str(raw.trim())
        .map_err(|e| OrderError::decode(format!("not an order code ({e})")))?;

    let order_id = parsed
        .order_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| OrderError::decode("order id missing"))?;
    let redemption_code = parsed
        .code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| OrderError::decode("redemption code missing"))?;

    Ok(RedemptionPayload {
        order_id,
        redemption_code,
    })
}
