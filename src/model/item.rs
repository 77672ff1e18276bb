use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::OrderError;

/// Highest unit price a guest may put in the cart.
pub const MAX_PRICE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
/// Highest quantity accepted for a single line.
pub const MAX_QUANTITY: u32 = 9999;

/// Menu entry as served by the backend catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub restaurant_id: String,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}

impl MenuItem {
    /// Rejects prices outside `0..=MAX_PRICE`.
    pub fn validate(&self) -> Result<(), OrderError> {
        if self.price < Decimal::ZERO {
            return Err(OrderError::invalid_item(format!(
                "price must not be negative, got {}",
                self.price
            )));
        }
        if self.price > MAX_PRICE {
            return Err(OrderError::invalid_item(format!(
                "price exceeds maximum allowed ({}), got {}",
                MAX_PRICE, self.price
            )));
        }
        Ok(())
    }
}

/// Rejects quantities above `MAX_QUANTITY`.
pub fn validate_quantity(quantity: i64) -> Result<(), OrderError> {
    if quantity > i64::from(MAX_QUANTITY) {
        return Err(OrderError::invalid_item(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// One selected menu item in the cart, price and name snapshot at add-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub notes: String,
}

impl CartLine {
    pub(crate) fn snapshot(item: &MenuItem, quantity: u32, notes: String) -> Self {
        Self {
            menu_item_id: item.id.clone(),
            name: item.name.clone(),
            // negative prices never reach a total
            unit_price: item.price.max(Decimal::ZERO),
            quantity,
            notes,
        }
    }

    /// Saturates at `Decimal::MAX` instead of overflowing.
    pub fn subtotal(&self) -> Decimal {
        self.unit_price
            .checked_mul(Decimal::from(self.quantity))
            .unwrap_or(Decimal::MAX)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cart::test::menu_item;

    #[test]
    fn subtotal_saturates_on_overflow() {
        let mut item = menu_item("A", "R1", 0);
        item.price = Decimal::MAX;
        let line = CartLine::snapshot(&item, 2, String::new());
        assert_eq!(line.subtotal(), Decimal::MAX);
    }

    #[test]
    fn negative_price_snapshots_as_zero() {
        let line = CartLine::snapshot(&menu_item("A", "R1", -10), 3, String::new());
        assert_eq!(line.unit_price, Decimal::ZERO);
        assert_eq!(line.subtotal(), Decimal::ZERO);
    }

    #[test]
    fn price_bounds() {
        assert!(menu_item("A", "R1", 0).validate().is_ok());
        assert!(menu_item("A", "R1", 1_000_000).validate().is_ok());

        let err = menu_item("A", "R1", 1_000_001).validate().unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Validation);
        assert_eq!(
            err.to_string(),
            "menu item rejected: price exceeds maximum allowed (1000000), got 1000001"
        );
        assert!(menu_item("A", "R1", -1).validate().is_err());
    }

    #[test]
    fn quantity_bound() {
        assert!(validate_quantity(9999).is_ok());
        assert!(validate_quantity(-3).is_ok());
        assert!(validate_quantity(10_000).is_err());
    }
}
