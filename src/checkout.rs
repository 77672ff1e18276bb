//! Turns cart lines into an order-creation call and normalizes its answer.

use chrono::{DateTime, Utc};
use log::{info, warn};
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use crate::backend::OrderBackend;
use crate::error::OrderError;
use crate::model::item::CartLine;
use crate::model::order::{CheckoutRequest, GuestDetails, OrderHandle, RequestedLine, SkippedItem};
use crate::util::time::helper::get_utc_now;

/// Accepted keys per response field, tried in order.
const ORDER_ID_KEYS: &[&str] = &["order_id", "orderId", "id"];
const CODE_KEYS: &[&str] = &["code", "token", "redemption_code", "redemptionCode"];
const EXPIRES_AT_KEYS: &[&str] = &["expires_at", "expiresAt"];
const SKIPPED_KEYS: &[&str] = &["skipped_items", "skippedItems"];
const TOTAL_KEYS: &[&str] = &["total", "total_amount"];

const DEFAULT_SKIP_REASON: &str = "unavailable";

/// Builds the request payload, refusing empty carts and unknown restaurants.
pub fn build_request(
    cart_lines: &[CartLine],
    restaurant_id: Option<&str>,
    details: &GuestDetails,
) -> Result<CheckoutRequest, OrderError> {
    if cart_lines.is_empty() {
        return Err(OrderError::EmptyCart);
    }
    let restaurant_id = restaurant_id
        .filter(|id| !id.trim().is_empty())
        .ok_or(OrderError::MissingRestaurant)?;

    Ok(CheckoutRequest {
        restaurant_id: restaurant_id.to_string(),
        items: cart_lines
            .iter()
            .map(|line| RequestedLine {
                menu_item_id: line.menu_item_id.clone(),
                quantity: line.quantity,
                notes: Some(line.notes.clone()).filter(|n| !n.is_empty()),
            })
            .collect(),
        guest_name: details.guest_name.clone(),
        table_number: details.table_number.clone(),
        notes: details.notes.clone(),
    })
}

/// Submits a checkout once. Skipped lines still count as success.
///
/// A failed call is never retried here; resubmitting may create a second
/// order since no idempotency key is sent.
pub async fn submit_checkout<B: OrderBackend>(
    backend: &B,
    cart_lines: &[CartLine],
    restaurant_id: Option<&str>,
    details: &GuestDetails,
) -> Result<OrderHandle, OrderError> {
    let request = build_request(cart_lines, restaurant_id, details)?;
    let raw = backend.create_order(&request).await?;
    let handle = normalize_response(raw, get_utc_now())?;

    info!(
        "order={} created for restaurant={} with {} lines",
        handle.order_id,
        request.restaurant_id,
        request.items.len()
    );
    if handle.is_partial() {
        warn!(
            "order={} skipped {} requested lines",
            handle.order_id,
            handle.skipped_items.len()
        );
    }
    Ok(handle)
}

/// Maps a raw order-creation result onto an [`OrderHandle`].
pub fn normalize_response(raw: Value, issued_at: DateTime<Utc>) -> Result<OrderHandle, OrderError> {
    let record = match raw {
        Value::String(text) => serde_json::from_str::<Value>(&text)
            .map_err(|e| OrderError::malformed(format!("order response is not json, {e}")))?,
        other => other,
    };
    let Value::Object(record) = record else {
        return Err(OrderError::malformed("order response is not an object"));
    };

    let order_id = match lookup(&record, ORDER_ID_KEYS) {
        Some(Value::String(id)) if !id.is_empty() => id.clone(),
        Some(Value::Number(id)) => id.to_string(),
        _ => return Err(OrderError::malformed("order id missing")),
    };
    let redemption_code = match lookup(&record, CODE_KEYS) {
        Some(Value::String(code)) if !code.is_empty() => code.clone(),
        _ => return Err(OrderError::malformed("redemption code missing")),
    };

    let expires_at = match lookup(&record, EXPIRES_AT_KEYS) {
        None => None,
        Some(Value::String(ts)) => Some(
            DateTime::parse_from_rfc3339(ts)
                .map_err(|e| OrderError::malformed(format!("bad expires_at {ts:?}, {e}")))?
                .with_timezone(&Utc),
        ),
        Some(other) => return Err(OrderError::malformed(format!("bad expires_at {other}"))),
    };

    let skipped_items = match lookup(&record, SKIPPED_KEYS) {
        None => vec![],
        Some(Value::Array(entries)) => entries.iter().map(skipped_item).collect(),
        Some(other) => return Err(OrderError::malformed(format!("bad skipped_items {other}"))),
    };

    let total = match lookup(&record, TOTAL_KEYS) {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        _ => None,
    };

    Ok(OrderHandle {
        order_id,
        redemption_code,
        expires_at,
        skipped_items,
        total,
        issued_at,
    })
}

/// First present, non-null value among `keys`.
fn lookup<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !value.is_null())
}

fn skipped_item(entry: &Value) -> SkippedItem {
    let reason = entry
        .get("reason")
        .and_then(Value::as_str)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_SKIP_REASON);
    SkippedItem {
        requested_item: entry.get("item").cloned().unwrap_or(Value::Null),
        reason: reason.to_string(),
    }
}
