//! Shared test utilities for `ZeroSaver`.
//!
//! This module provides a fixed clock and helpers for creating deals, catalogs
//! and marketplaces with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{catalog::Catalog, clock::in_minutes, impact::ImpactFactors},
    entities::{Category, Deal, Diet, NewDeal, Partner, PartnerId, PartnerStatus},
    errors::Result,
    marketplace::Marketplace,
};
use chrono::{DateTime, TimeZone, Utc};
use std::collections::BTreeSet;

/// Fixed "now" used by every time-dependent test: 2025-03-14 09:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 14, 9, 0, 0).unwrap()
}

/// Creates deal fields with sensible defaults.
///
/// # Defaults
/// * category: Bakery, vegetarian
/// * price: 6.0 (original 16.0)
/// * `min_order_qty`: 1
/// * `distance_km`: 1.0
/// * pickup window: +10 to +90 minutes
/// * `best_before` and `expires_at`: +120 minutes
pub fn sample_new_deal(partner: &PartnerId, title: &str, quantity: u32, now: DateTime<Utc>) -> NewDeal {
    NewDeal {
        partner_id: partner.clone(),
        title: title.to_string(),
        description: "Test deal".to_string(),
        category: Category::Bakery,
        diet: BTreeSet::from([Diet::Vegetarian]),
        allergens: Vec::new(),
        original_price: 16.0,
        price: 6.0,
        quantity,
        min_order_qty: 1,
        distance_km: 1.0,
        cold_chain: false,
        b2b: false,
        tags: Vec::new(),
        pickup_address: "1 Test Street".to_string(),
        pickup_notes: String::new(),
        rating: None,
        pickup_start: in_minutes(now, 10),
        pickup_end: in_minutes(now, 90),
        best_before: in_minutes(now, 120),
        expires_at: in_minutes(now, 120),
    }
}

/// Creates a catalog holding one "Mystery pastry bag" deal from partner `v2`.
pub fn setup_catalog_with_deal(quantity: u32) -> Result<(Catalog, Deal)> {
    let now = test_now();
    let mut catalog = Catalog::new();
    let deal = catalog.create_deal(
        sample_new_deal(&PartnerId::from("v2"), "Mystery pastry bag", quantity, now),
        "Daily Bakery",
        now,
    )?;
    Ok((catalog, deal))
}

/// Creates a marketplace with default impact factors and one approved partner,
/// "Daily Bakery". Returns the marketplace and the partner's id.
pub fn setup_marketplace() -> Result<(Marketplace, PartnerId)> {
    let mut marketplace = Marketplace::new(ImpactFactors::default());
    let id = PartnerId::from("v2");
    marketplace.add_partner(Partner {
        id: id.clone(),
        name: "Daily Bakery".to_string(),
        category: Category::Bakery,
        status: PartnerStatus::Approved,
    })?;
    Ok((marketplace, id))
}
