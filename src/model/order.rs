use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Validity in seconds applied when the backend does not send an expiry.
pub const DEFAULT_REDEMPTION_WINDOW_SECS: i64 = 15 * 60;

/// Line of a checkout request as the order-creation procedure expects it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestedLine {
    pub menu_item_id: String,
    pub quantity: u32,
    pub notes: Option<String>,
}

/// Optional guest context attached to a checkout.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GuestDetails {
    pub guest_name: Option<String>,
    pub table_number: Option<String>,
    pub notes: Option<String>,
}

/// Parameters of `create_order_for_checkout`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutRequest {
    #[serde(rename = "p_restaurant_id")]
    pub restaurant_id: String,
    #[serde(rename = "p_items")]
    pub items: Vec<RequestedLine>,
    #[serde(rename = "p_guest_name", skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(rename = "p_table_number", skip_serializing_if = "Option::is_none")]
    pub table_number: Option<String>,
    #[serde(rename = "p_notes", skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Parameters of `confirm_order`. `table_number` is always sent, `null` when unset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmRequest {
    #[serde(rename = "p_order_id")]
    pub order_id: String,
    #[serde(rename = "p_code")]
    pub code: String,
    #[serde(rename = "p_staff_user_id")]
    pub staff_id: String,
    #[serde(rename = "p_table_number")]
    pub table_number: Option<String>,
}

/// A requested line the backend left out of the created order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedItem {
    pub requested_item: Value,
    pub reason: String,
}

/// Accepted checkout, immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderHandle {
    pub order_id: String,
    pub redemption_code: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub skipped_items: Vec<SkippedItem>,
    pub total: Option<Decimal>,
    pub issued_at: DateTime<Utc>,
}

impl OrderHandle {
    /// Backend expiry, or the default window counted from issuance.
    pub fn effective_expiry(&self) -> DateTime<Utc> {
        self.expires_at
            .unwrap_or(self.issued_at + Duration::seconds(DEFAULT_REDEMPTION_WINDOW_SECS))
    }

    pub fn seconds_left(&self, now: DateTime<Utc>) -> i64 {
        (self.effective_expiry() - now).num_seconds().max(0)
    }

    pub fn is_partial(&self) -> bool {
        !self.skipped_items.is_empty()
    }
}

/// Renders remaining seconds as `m:ss`.
pub fn format_countdown(seconds: i64) -> String {
    let seconds = seconds.max(0);
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod test {
    use super::*;

    fn handle(expires_at: Option<DateTime<Utc>>) -> OrderHandle {
        OrderHandle {
            order_id: "O1".to_string(),
            redemption_code: "XYZ".to_string(),
            expires_at,
            skipped_items: vec![],
            total: None,
            issued_at: DateTime::<Utc>::from_timestamp(1_000, 0).unwrap(),
        }
    }

    #[test]
    fn falls_back_to_fifteen_minutes() {
        let h = handle(None);
        assert_eq!(h.seconds_left(h.issued_at), 900);
        assert_eq!(h.seconds_left(h.issued_at + Duration::seconds(61)), 839);
    }

    #[test]
    fn backend_expiry_wins_and_saturates() {
        let h = handle(DateTime::<Utc>::from_timestamp(1_030, 0));
        assert_eq!(h.seconds_left(h.issued_at), 30);
        assert_eq!(h.seconds_left(h.issued_at + Duration::hours(1)), 0);
    }

    #[test]
    fn countdown_format() {
        assert_eq!(format_countdown(900), "15:00");
        assert_eq!(format_countdown(65), "1:05");
        assert_eq!(format_countdown(-3), "0:00");
    }

    #[test]
    fn confirm_request_keeps_null_table() {
        let req = ConfirmRequest {
            order_id: "O1".to_string(),
            code: "XYZ".to_string(),
            staff_id: "S1".to_string(),
            table_number: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("p_table_number").unwrap().is_null());
    }

    #[test]
    fn checkout_request_omits_unset_guest_fields() {
        let req = CheckoutRequest {
            restaurant_id: "R1".to_string(),
            items: vec![RequestedLine {
                menu_item_id: "A".to_string(),
                quantity: 2,
                notes: None,
            }],
            guest_name: None,
            table_number: None,
            notes: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["p_restaurant_id"], "R1");
        assert_eq!(json["p_items"][0]["quantity"], 2);
        assert!(json.get("p_guest_name").is_none());
    }
}
