//! Reservation confirmation - The record a checkout leaves behind.

use super::cart_line::CartLine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of a successful checkout. The stock in `lines` is treated as sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReservationConfirmation {
    /// Token the consumer shows at pickup
    pub token: String,
    /// Consumer who checked out
    pub consumer: String,
    /// When the checkout happened
    pub confirmed_at: DateTime<Utc>,
    /// Cart lines consumed by the checkout
    pub lines: Vec<CartLine>,
    /// Sum of the line subtotals
    pub total: f64,
}

impl ReservationConfirmation {
    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
