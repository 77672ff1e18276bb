//! Single-restaurant cart.
//!
//! A cart only ever holds lines from one restaurant. Adding an item from
//! another restaurant replaces the whole cart. Nothing here fails: bad
//! quantities are clamped and unknown ids are ignored.

use log::debug;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::model::item::{CartLine, MenuItem};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    restaurant_id: Option<String>,
    lines: Vec<CartLine>,
}

/// What `add_item` decided to do, evaluated before touching the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// the cart belonged to another restaurant and was replaced
    Replaced,
    Merged,
    Appended,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn restaurant_id(&self) -> Option<&str> {
        self.restaurant_id.as_deref()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Adds `quantity` (at least 1) of `item`. Notes of an existing line are
    /// overwritten, not merged.
    pub fn add_item(&mut self, item: &MenuItem, quantity: u32, notes: impl Into<String>) -> AddOutcome {
        let quantity = quantity.max(1);
        let notes = notes.into();

        if self.belongs_to_other_restaurant(&item.restaurant_id) {
            debug!(
                "switching cart from restaurant={:?} to restaurant={}",
                self.restaurant_id, item.restaurant_id
            );
            self.lines = vec![CartLine::snapshot(item, quantity, notes)];
            self.restaurant_id = Some(item.restaurant_id.clone());
            return AddOutcome::Replaced;
        }

        self.restaurant_id = Some(item.restaurant_id.clone());
        match self.line_mut(&item.id) {
            Some(line) => {
                line.quantity = line.quantity.saturating_add(quantity);
                line.notes = notes;
                AddOutcome::Merged
            }
            None => {
                self.lines.push(CartLine::snapshot(item, quantity, notes));
                AddOutcome::Appended
            }
        }
    }

    /// Shorthand for one unit without notes.
    pub fn add_one(&mut self, item: &MenuItem) -> AddOutcome {
        self.add_item(item, 1, "")
    }

    pub fn remove_item(&mut self, menu_item_id: &str) {
        self.lines.retain(|line| line.menu_item_id != menu_item_id);
        if self.lines.is_empty() {
            self.restaurant_id = None;
        }
    }

    /// Zero or negative quantities remove the line.
    pub fn update_quantity(&mut self, menu_item_id: &str, quantity: i64) {
        if quantity <= 0 {
            self.remove_item(menu_item_id);
            return;
        }
        if let Some(line) = self.line_mut(menu_item_id) {
            line.quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        }
    }

    pub fn update_notes(&mut self, menu_item_id: &str, notes: impl Into<String>) {
        if let Some(line) = self.line_mut(menu_item_id) {
            line.notes = notes.into();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.restaurant_id = None;
    }

    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::subtotal)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    pub fn item_by_id(&self, menu_item_id: &str) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.menu_item_id == menu_item_id)
    }

    pub fn has_items_from_restaurant(&self, restaurant_id: &str) -> bool {
        !self.lines.is_empty() && self.restaurant_id.as_deref() == Some(restaurant_id)
    }

    fn belongs_to_other_restaurant(&self, restaurant_id: &str) -> bool {
        !self.lines.is_empty()
            && self
                .restaurant_id
                .as_deref()
                .is_some_and(|current| current != restaurant_id)
    }

    fn line_mut(&mut self, menu_item_id: &str) -> Option<&mut CartLine> {
        self.lines
            .iter_mut()
            .find(|line| line.menu_item_id == menu_item_id)
    }
}
