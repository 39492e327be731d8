//! Seed data loaded from the config file.
//!
//! Partners and deals listed under `[[partners]]` and `[[deals]]` are loaded on
//! start-up. Deal times are minute offsets from the moment of seeding, so a
//! fresh start always shows live deals.

use crate::{
    core::clock::in_minutes,
    entities::{Category, Diet, NewDeal, Partner, PartnerId, PartnerStatus},
    errors::Result,
    marketplace::Marketplace,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::BTreeSet;
use tracing::info;

/// A partner to create on start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct PartnerSeed {
    /// Fixed partner id, referenced by deal seeds
    pub id: String,
    /// Display name
    pub name: String,
    /// Kind of business
    pub category: Category,
    /// Starting status, pending when omitted
    #[serde(default)]
    pub status: PartnerStatus,
}

impl PartnerSeed {
    /// Converts the seed into a partner record.
    #[must_use]
    pub fn to_partner(&self) -> Partner {
        Partner {
            id: PartnerId(self.id.clone()),
            name: self.name.clone(),
            category: self.category,
            status: self.status,
        }
    }
}

const fn one() -> u32 {
    1
}

/// A deal to publish on start-up.
#[derive(Debug, Clone, Deserialize)]
pub struct DealSeed {
    /// Owning partner id
    pub partner_id: String,
    /// Listing title
    pub title: String,
    /// Free-text description
    #[serde(default)]
    pub description: String,
    /// Business category
    pub category: Category,
    /// Dietary tags
    #[serde(default)]
    pub diet: BTreeSet<Diet>,
    /// Allergens present
    #[serde(default)]
    pub allergens: Vec<String>,
    /// Recommended retail price
    #[serde(default)]
    pub original_price: f64,
    /// Discounted price per unit
    pub price: f64,
    /// Units on offer
    pub quantity: u32,
    /// Minimum order quantity, 1 when omitted
    #[serde(default = "one")]
    pub min_order_qty: u32,
    /// Distance in km
    #[serde(default)]
    pub distance_km: f64,
    /// Needs refrigeration
    #[serde(default)]
    pub cold_chain: bool,
    /// Licensed businesses only
    #[serde(default)]
    pub b2b: bool,
    /// Free-form tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Where to collect
    #[serde(default)]
    pub pickup_address: String,
    /// Shown after checkout
    #[serde(default)]
    pub pickup_notes: String,
    /// Vendor rating out of 5, the default rating when omitted
    #[serde(default)]
    pub rating: Option<f64>,
    /// Pickup window opens this many minutes after seeding
    pub pickup_start_in_minutes: i64,
    /// Pickup window closes this many minutes after seeding
    pub pickup_end_in_minutes: i64,
    /// Best-before, in minutes after seeding
    pub best_before_in_minutes: i64,
    /// Expiry, in minutes after seeding
    pub expires_in_minutes: i64,
}

impl DealSeed {
    /// Resolves the minute offsets against `now`.
    #[must_use]
    pub fn to_new_deal(&self, now: DateTime<Utc>) -> NewDeal {
        NewDeal {
            partner_id: PartnerId(self.partner_id.clone()),
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category,
            diet: self.diet.clone(),
            allergens: self.allergens.clone(),
            original_price: self.original_price,
            price: self.price,
            quantity: self.quantity,
            min_order_qty: self.min_order_qty,
            distance_km: self.distance_km,
            cold_chain: self.cold_chain,
            b2b: self.b2b,
            tags: self.tags.clone(),
            pickup_address: self.pickup_address.clone(),
            pickup_notes: self.pickup_notes.clone(),
            rating: self.rating,
            pickup_start: in_minutes(now, self.pickup_start_in_minutes),
            pickup_end: in_minutes(now, self.pickup_end_in_minutes),
            best_before: in_minutes(now, self.best_before_in_minutes),
            expires_at: in_minutes(now, self.expires_in_minutes),
        }
    }
}

/// Loads seed partners and deals into `marketplace`.
///
/// Deals of partners still pending approval are loaded too; they stay hidden
/// until the partner is approved. Returns `(partners, deals)` loaded.
///
/// # Errors
/// Returns an error if a partner id is duplicated, a deal references an unknown
/// partner, or a deal fails validation.
pub fn seed_marketplace(
    marketplace: &mut Marketplace,
    partners: &[PartnerSeed],
    deals: &[DealSeed],
    now: DateTime<Utc>,
) -> Result<(usize, usize)> {
    for seed in partners {
        marketplace.add_partner(seed.to_partner())?;
    }
    for seed in deals {
        marketplace.import_deal(seed.to_new_deal(now), now)?;
    }
    info!(
        partners = partners.len(),
        deals = deals.len(),
        "Marketplace seeded"
    );
    Ok((partners.len(), deals.len()))
}
