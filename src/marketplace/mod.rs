//! Marketplace service - The single owner of all ZeroSaver state.
//!
//! Ties the catalog, the partner registry, one cart per consumer and the ledger
//! of confirmed reservations together. Consumers only ever see deals of approved
//! partners; every stock movement goes through a cart paired with the catalog.
//!
//! The binary shares one instance as [`SharedMarketplace`]. Holding the lock for
//! the whole call keeps each catalog+cart pair atomic.

/// Background expiry sweep task
pub mod sweeper;

use crate::{
    core::{
        cart::Cart,
        catalog::{self, Catalog, DealFilter},
        impact::{ImpactEstimate, ImpactFactors, ImpactItem},
        partner::PartnerRegistry,
        report::{self, SalesReport},
    },
    entities::{CartLine, Category, Deal, DealId, NewDeal, Partner, PartnerId, ReservationConfirmation},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use std::{collections::BTreeMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Marketplace shared between the request side and the expiry sweeper.
pub type SharedMarketplace = Arc<Mutex<Marketplace>>;

/// Catalog, partners, carts and confirmed reservations.
#[derive(Debug, Default)]
pub struct Marketplace {
    catalog: Catalog,
    partners: PartnerRegistry,
    carts: BTreeMap<String, Cart>,
    confirmations: Vec<ReservationConfirmation>,
    impact: ImpactFactors,
}

impl Marketplace {
    /// Creates an empty marketplace using `impact` for estimates.
    #[must_use]
    pub fn new(impact: ImpactFactors) -> Self {
        Self {
            impact,
            ..Self::default()
        }
    }

    /// Wraps the marketplace for sharing across tasks.
    #[must_use]
    pub fn into_shared(self) -> SharedMarketplace {
        Arc::new(Mutex::new(self))
    }

    /// Every deal held, including hidden, sold-out and expired ones.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The partner registry.
    #[must_use]
    pub const fn partners(&self) -> &PartnerRegistry {
        &self.partners
    }

    /// Confirmed reservations, oldest first.
    #[must_use]
    pub fn confirmations(&self) -> &[ReservationConfirmation] {
        &self.confirmations
    }

    /// Coefficients used for impact estimates.
    #[must_use]
    pub const fn impact_factors(&self) -> &ImpactFactors {
        &self.impact
    }

    /// Registers a new partner, pending approval.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty.
    pub fn register_partner(&mut self, name: &str, category: Category) -> Result<Partner> {
        self.partners.register(name, category)
    }

    /// Adds a partner with a known id.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty or the id is taken.
    pub fn add_partner(&mut self, partner: Partner) -> Result<()> {
        self.partners.insert(partner)
    }

    /// Approves or revokes a partner. Revoking marks the partner rejected and
    /// hides its deals at once.
    ///
    /// # Errors
    /// Returns [`Error::PartnerNotFound`] if the id is unknown.
    pub fn set_partner_approval(&mut self, id: &PartnerId, approved: bool) -> Result<Partner> {
        self.partners.set_approval(id, approved).cloned()
    }

    /// Turns down a partner application.
    ///
    /// # Errors
    /// Returns [`Error::PartnerNotFound`] if the id is unknown.
    pub fn reject_partner(&mut self, id: &PartnerId) -> Result<Partner> {
        self.partners.reject(id).cloned()
    }

    /// Publishes a deal on behalf of an approved partner.
    ///
    /// The vendor name shown on the deal is the partner's name.
    ///
    /// # Errors
    /// - [`Error::PartnerNotFound`] if the partner does not exist
    /// - [`Error::PartnerNotApproved`] if the partner is still pending
    /// - [`Error::Validation`] if the deal fields are invalid
    pub fn publish_deal(&mut self, fields: NewDeal, now: DateTime<Utc>) -> Result<Deal> {
        let partner = self.owning_partner(&fields.partner_id)?;
        if !partner.is_approved() {
            return Err(Error::PartnerNotApproved {
                id: partner.id.to_string(),
            });
        }
        let vendor = partner.name.clone();
        self.catalog.create_deal(fields, &vendor, now)
    }

    /// Loads a deal for any known partner, approved or not.
    ///
    /// Used for seed data; the deal stays hidden until the partner is approved.
    ///
    /// # Errors
    /// - [`Error::PartnerNotFound`] if the partner does not exist
    /// - [`Error::Validation`] if the deal fields are invalid
    pub fn import_deal(&mut self, fields: NewDeal, now: DateTime<Utc>) -> Result<Deal> {
        let vendor = self.owning_partner(&fields.partner_id)?.name.clone();
        self.catalog.create_deal(fields, &vendor, now)
    }

    /// Deals a consumer can see at `now`: active, from an approved partner and
    /// matching `filter`. Nearest first.
    #[must_use]
    pub fn visible_deals(&self, filter: &DealFilter, now: DateTime<Utc>) -> Vec<&Deal> {
        let active = self
            .catalog
            .list_active(now)
            .into_iter()
            .filter(|d| self.partners.is_approved(&d.partner_id));
        catalog::filter(active, filter)
    }

    /// Reserves up to `quantity` units of a visible deal for `consumer`.
    ///
    /// Returns `Ok(None)` when the deal is sold out or has expired but not yet been
    /// swept. Requests above the remaining stock are clamped.
    ///
    /// # Errors
    /// Returns [`Error::DealNotFound`] if the deal does not exist or its partner is
    /// not approved.
    pub fn reserve(
        &mut self,
        consumer: &str,
        deal_id: &DealId,
        quantity: u32,
        now: DateTime<Utc>,
    ) -> Result<Option<CartLine>> {
        let deal = self.visible_deal(deal_id)?;
        if deal.expires_at <= now {
            debug!(deal_id = %deal_id, "Deal has expired, nothing reserved");
            return Ok(None);
        }

        let cart = self.carts.entry(consumer.to_string()).or_default();
        let reserved = cart.reserve(&mut self.catalog, deal_id, quantity);
        if cart.is_empty() {
            self.carts.remove(consumer);
        }
        reserved
    }

    /// Reserves the deal's minimum order quantity, the one-click reserve.
    ///
    /// # Errors
    /// Same as [`Marketplace::reserve`].
    pub fn reserve_min_order(
        &mut self,
        consumer: &str,
        deal_id: &DealId,
        now: DateTime<Utc>,
    ) -> Result<Option<CartLine>> {
        let min_order = self.visible_deal(deal_id)?.min_order_qty;
        self.reserve(consumer, deal_id, min_order, now)
    }

    /// Removes a line from `consumer`'s cart and returns its stock.
    ///
    /// The cart itself goes away with its last line.
    pub fn remove(&mut self, consumer: &str, deal_id: &DealId) -> Option<CartLine> {
        let cart = self.carts.get_mut(consumer)?;
        let removed = cart.remove(&mut self.catalog, deal_id);
        if cart.is_empty() {
            self.carts.remove(consumer);
        }
        removed
    }

    /// Confirms `consumer`'s cart and records the confirmation.
    ///
    /// # Errors
    /// Returns [`Error::EmptyCart`] if the consumer has nothing reserved.
    pub fn checkout(&mut self, consumer: &str, now: DateTime<Utc>) -> Result<ReservationConfirmation> {
        let cart = self.carts.get_mut(consumer).ok_or(Error::EmptyCart)?;
        let confirmation = cart.checkout(consumer, now)?;
        self.carts.remove(consumer);
        self.confirmations.push(confirmation.clone());
        Ok(confirmation)
    }

    /// The consumer's cart, if they have reserved anything.
    #[must_use]
    pub fn cart(&self, consumer: &str) -> Option<&Cart> {
        self.carts.get(consumer)
    }

    /// Total price of the consumer's cart, 0 when they have none.
    #[must_use]
    pub fn cart_total(&self, consumer: &str) -> f64 {
        self.cart(consumer).map_or(0.0, Cart::total)
    }

    /// Estimated impact of the consumer's cart.
    #[must_use]
    pub fn cart_impact(&self, consumer: &str) -> ImpactEstimate {
        self.cart(consumer).map_or_else(ImpactEstimate::default, |cart| {
            self.impact.estimate(cart.lines().iter().map(ImpactItem::from))
        })
    }

    /// Removes sold-out and expired deals. Returns the removed deals.
    pub fn sweep(&mut self, now: DateTime<Utc>) -> Vec<Deal> {
        let removed = self.catalog.sweep_expired(now);
        if !removed.is_empty() {
            info!(
                removed = removed.len(),
                remaining = self.catalog.len(),
                "Swept expired and sold-out deals"
            );
        }
        removed
    }

    /// Sales analytics over every confirmed reservation.
    #[must_use]
    pub fn sales_report(&self) -> SalesReport {
        report::generate_sales_report(&self.confirmations, &self.impact)
    }

    fn owning_partner(&self, id: &PartnerId) -> Result<&Partner> {
        self.partners
            .get(id)
            .ok_or_else(|| Error::PartnerNotFound { id: id.to_string() })
    }

    fn visible_deal(&self, deal_id: &DealId) -> Result<&Deal> {
        self.catalog
            .get(deal_id)
            .filter(|d| self.partners.is_approved(&d.partner_id))
            .ok_or_else(|| Error::DealNotFound {
                id: deal_id.to_string(),
            })
    }
}
