use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::cart::Cart;
use crate::model::item::{CartLine, MenuItem};

#[derive(Debug, Deserialize)]
pub(crate) struct PostCartItemRequest {
    pub item: MenuItem,
    pub quantity: Option<u32>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PatchCartItemRequest {
    pub quantity: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetCartResponse {
    pub restaurant_id: Option<String>,
    pub lines: Vec<CartLine>,
    pub total: Decimal,
    pub item_count: u64,
}

impl From<&Cart> for GetCartResponse {
    fn from(cart: &Cart) -> Self {
        Self {
            restaurant_id: cart.restaurant_id().map(str::to_string),
            lines: cart.lines().to_vec(),
            total: cart.total(),
            item_count: cart.item_count(),
        }
    }
}
