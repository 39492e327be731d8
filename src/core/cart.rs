//! Reservation cart business logic - One consumer's pending reservations.
//!
//! Every cart operation that moves stock does so as a pair with the catalog:
//! reserving decrements the deal before the line is written, removing restores
//! exactly the line's quantity. For every deal, remaining stock plus the
//! quantities held in carts stays equal to the stock at creation (or at the
//! last checkout). Checkout consumes the lines without giving stock back.

use crate::{
    core::catalog::Catalog,
    entities::{CartLine, DealId, ReservationConfirmation},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// A consumer's reservations-in-progress, one line per deal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Creates an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Reserves up to `requested` units of a deal.
    ///
    /// The request is clamped into `[1, available]` instead of failing when it is too
    /// large. Reserving a deal that is already in the cart grows the existing line.
    /// Returns `Ok(None)` without touching anything when the deal is sold out.
    ///
    /// # Errors
    /// Returns [`Error::DealNotFound`] if the deal is not in the catalog.
    pub fn reserve(
        &mut self,
        catalog: &mut Catalog,
        deal_id: &DealId,
        requested: u32,
    ) -> Result<Option<CartLine>> {
        let deal = catalog.get(deal_id).ok_or_else(|| Error::DealNotFound {
            id: deal_id.to_string(),
        })?;

        if deal.quantity < 1 {
            debug!(deal_id = %deal_id, "Deal is sold out, nothing reserved");
            return Ok(None);
        }

        let take = requested.clamp(1, deal.quantity);
        if take != requested {
            debug!(deal_id = %deal_id, requested, take, "Reservation quantity clamped");
        }
        let snapshot = CartLine {
            deal_id: deal.id.clone(),
            title: deal.title.clone(),
            vendor: deal.vendor.clone(),
            category: deal.category,
            price: deal.price,
            quantity: take,
        };

        // Stock first: if this fails the cart is left untouched
        catalog.decrement_stock(deal_id, take)?;

        let line = match self.lines.iter_mut().find(|l| &l.deal_id == deal_id) {
            Some(existing) => {
                existing.quantity += take;
                existing.clone()
            }
            None => {
                self.lines.push(snapshot.clone());
                snapshot
            }
        };

        info!(
            deal_id = %deal_id,
            taken = take,
            line_quantity = line.quantity,
            "Deal reserved"
        );
        Ok(Some(line))
    }

    /// Drops the line for `deal_id` and returns its stock to the catalog.
    ///
    /// Returns the removed line, or `None` if the cart had no line for that deal.
    /// If the deal has been swept in the meantime the line is still removed and the
    /// stock is lost with the deal.
    pub fn remove(&mut self, catalog: &mut Catalog, deal_id: &DealId) -> Option<CartLine> {
        let index = self.lines.iter().position(|l| &l.deal_id == deal_id)?;
        let line = self.lines.remove(index);

        match catalog.restore_stock(deal_id, line.quantity) {
            Ok(deal) => info!(
                deal_id = %deal_id,
                restored = line.quantity,
                remaining = deal.quantity,
                "Cart line removed"
            ),
            Err(e) => warn!(
                deal_id = %deal_id,
                quantity = line.quantity,
                error = %e,
                "Cart line removed but its stock could not be returned"
            ),
        }
        Some(line)
    }

    /// Confirms every line for `consumer` and empties the cart.
    ///
    /// Stock taken by the lines stays taken: it is now sold.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCart`] if there is nothing to confirm.
    pub fn checkout(&mut self, consumer: &str, now: DateTime<Utc>) -> Result<ReservationConfirmation> {
        if self.lines.is_empty() {
            return Err(Error::EmptyCart);
        }

        let total = self.total();
        let confirmation = ReservationConfirmation {
            token: Uuid::new_v4().to_string(),
            consumer: consumer.to_string(),
            confirmed_at: now,
            lines: std::mem::take(&mut self.lines),
            total,
        };

        info!(
            consumer,
            token = %confirmation.token,
            lines = confirmation.lines.len(),
            total = confirmation.total,
            "Reservation confirmed"
        );
        Ok(confirmation)
    }

    /// Sum of quantity times price over all lines.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }

    /// Lines in the order they were first reserved.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `deal_id`, if any.
    #[must_use]
    pub fn line(&self, deal_id: &DealId) -> Option<&CartLine> {
        self.lines.iter().find(|l| &l.deal_id == deal_id)
    }

    /// Number of lines (distinct deals).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::clock::in_minutes;
    use crate::test_utils::*;

    fn stock(catalog: &Catalog, id: &DealId) -> u32 {
        catalog.get(id).unwrap().quantity
    }

    fn reserved(cart: &Cart, id: &DealId) -> u32 {
        cart.line(id).map_or(0, |l| l.quantity)
    }

    #[test]
    fn test_reservation_walkthrough() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(8)?;
        let mut cart = Cart::new();

        cart.reserve(&mut catalog, &deal.id, 3)?;
        assert_eq!(reserved(&cart, &deal.id), 3);
        assert_eq!(stock(&catalog, &deal.id), 5);

        cart.reserve(&mut catalog, &deal.id, 2)?;
        assert_eq!(cart.len(), 1);
        assert_eq!(reserved(&cart, &deal.id), 5);
        assert_eq!(stock(&catalog, &deal.id), 3);

        cart.remove(&mut catalog, &deal.id);
        assert!(cart.is_empty());
        assert_eq!(stock(&catalog, &deal.id), 8);

        let line = cart.reserve(&mut catalog, &deal.id, 10)?.unwrap();
        assert_eq!(line.quantity, 8);
        assert_eq!(stock(&catalog, &deal.id), 0);

        let confirmation = cart.checkout("consumer-a", test_now())?;
        assert_eq!(confirmation.item_count(), 8);
        assert!(cart.is_empty());
        assert_eq!(stock(&catalog, &deal.id), 0);
        Ok(())
    }

    #[test]
    fn test_reserve_clamps_to_available() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(4)?;
        let mut cart = Cart::new();

        let line = cart.reserve(&mut catalog, &deal.id, 99)?.unwrap();
        assert_eq!(line.quantity, 4);
        assert_eq!(stock(&catalog, &deal.id), 0);

        // A zero request still takes one unit
        let (mut catalog, deal) = setup_catalog_with_deal(4)?;
        let line = Cart::new().reserve(&mut catalog, &deal.id, 0)?.unwrap();
        assert_eq!(line.quantity, 1);
        assert_eq!(stock(&catalog, &deal.id), 3);
        Ok(())
    }

    #[test]
    fn test_reserve_sold_out_is_noop() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(2)?;
        let mut first = Cart::new();
        let mut second = Cart::new();

        first.reserve(&mut catalog, &deal.id, 2)?;
        assert!(second.reserve(&mut catalog, &deal.id, 1)?.is_none());
        assert!(second.is_empty());
        assert_eq!(stock(&catalog, &deal.id), 0);
        Ok(())
    }

    #[test]
    fn test_reserve_unknown_deal() {
        let mut catalog = Catalog::new();
        let err = Cart::new()
            .reserve(&mut catalog, &DealId::from("nope"), 1)
            .unwrap_err();
        assert!(matches!(err, Error::DealNotFound { .. }));
    }

    #[test]
    fn test_reserve_snapshots_deal_fields() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(5)?;
        let mut cart = Cart::new();

        let line = cart.reserve(&mut catalog, &deal.id, 2)?.unwrap();
        assert_eq!(line.title, deal.title);
        assert_eq!(line.vendor, deal.vendor);
        assert_eq!(line.category, deal.category);
        assert_eq!(line.price, deal.price);
        Ok(())
    }

    #[test]
    fn test_remove_is_idempotent() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(6)?;
        let mut cart = Cart::new();
        cart.reserve(&mut catalog, &deal.id, 4)?;

        let removed = cart.remove(&mut catalog, &deal.id).unwrap();
        assert_eq!(removed.quantity, 4);
        assert_eq!(stock(&catalog, &deal.id), 6);

        assert!(cart.remove(&mut catalog, &deal.id).is_none());
        assert_eq!(stock(&catalog, &deal.id), 6);
        Ok(())
    }

    #[test]
    fn test_remove_after_deal_swept() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(3)?;
        let mut cart = Cart::new();
        cart.reserve(&mut catalog, &deal.id, 3)?;

        // Sold out, so the sweep takes it
        catalog.sweep_expired(test_now());
        assert!(catalog.get(&deal.id).is_none());

        let removed = cart.remove(&mut catalog, &deal.id);
        assert_eq!(removed.map(|l| l.quantity), Some(3));
        assert!(cart.is_empty());
        Ok(())
    }

    #[test]
    fn test_checkout_empty_cart() {
        let err = Cart::new().checkout("consumer-a", test_now()).unwrap_err();
        assert!(matches!(err, Error::EmptyCart));
    }

    #[test]
    fn test_checkout_consumes_without_restoring() -> Result<()> {
        let now = test_now();
        let (mut catalog, pastry) = setup_catalog_with_deal(8)?;
        let sushi = catalog.create_deal(
            sample_new_deal(&pastry.partner_id, "Sushi box", 12, now),
            "Sunset Sushi",
            now,
        )?;
        let mut cart = Cart::new();

        cart.reserve(&mut catalog, &pastry.id, 2)?;
        cart.reserve(&mut catalog, &sushi.id, 3)?;
        let expected_total = 2.0 * pastry.price + 3.0 * sushi.price;
        assert_eq!(cart.total(), expected_total);
        assert_eq!(cart.item_count(), 5);

        let confirmation = cart.checkout("consumer-a", in_minutes(now, 1))?;
        assert_eq!(confirmation.consumer, "consumer-a");
        assert_eq!(confirmation.lines.len(), 2);
        assert_eq!(confirmation.total, expected_total);
        assert!(!confirmation.token.is_empty());

        assert!(cart.is_empty());
        assert_eq!(cart.total(), 0.0);
        assert_eq!(stock(&catalog, &pastry.id), 6);
        assert_eq!(stock(&catalog, &sushi.id), 9);

        // The next checkout needs new reservations
        assert!(matches!(
            cart.checkout("consumer-a", now).unwrap_err(),
            Error::EmptyCart
        ));
        Ok(())
    }

    #[test]
    fn test_stock_is_conserved_across_carts() -> Result<()> {
        let (mut catalog, deal) = setup_catalog_with_deal(10)?;
        let mut alice = Cart::new();
        let mut bob = Cart::new();

        let steps: [(bool, u32); 6] = [(true, 3), (false, 4), (true, 2), (false, 9), (true, 1), (false, 1)];
        for (is_alice, qty) in steps {
            let cart = if is_alice { &mut alice } else { &mut bob };
            cart.reserve(&mut catalog, &deal.id, qty)?;
            assert_eq!(
                stock(&catalog, &deal.id) + reserved(&alice, &deal.id) + reserved(&bob, &deal.id),
                10
            );
        }

        bob.remove(&mut catalog, &deal.id);
        assert_eq!(stock(&catalog, &deal.id) + reserved(&alice, &deal.id), 10);

        // After checkout the baseline becomes whatever stock is left
        alice.checkout("alice", test_now())?;
        let baseline = stock(&catalog, &deal.id);
        bob.reserve(&mut catalog, &deal.id, 2)?;
        assert_eq!(stock(&catalog, &deal.id) + reserved(&bob, &deal.id), baseline);
        Ok(())
    }
}
