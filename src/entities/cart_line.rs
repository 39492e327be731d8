//! Cart line entity - One consumer's reservation-in-progress for one deal.
//!
//! Title, price, vendor and category are a snapshot taken when the deal was
//! first reserved; later edits to the deal do not flow into the cart.

use super::deal::{Category, DealId};
use serde::{Deserialize, Serialize};

/// A reserved quantity of a single deal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Deal the stock was taken from
    pub deal_id: DealId,
    /// Deal title at reservation time
    pub title: String,
    /// Vendor name at reservation time
    pub vendor: String,
    /// Deal category at reservation time
    pub category: Category,
    /// Unit price at reservation time
    pub price: f64,
    /// Units reserved, always at least 1
    pub quantity: u32,
}

impl CartLine {
    /// Price of the whole line.
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.price
    }
}
