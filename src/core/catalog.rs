//! Deal catalog business logic - Owns every published deal and its stock.
//!
//! The catalog is the only place deals are created, mutated and destroyed.
//! Stock leaves through [`Catalog::decrement_stock`] and comes back through
//! [`Catalog::restore_stock`]; the cart pairs those calls with its own line
//! bookkeeping so that catalog and cart never disagree. Deals disappear only
//! through [`Catalog::sweep_expired`].

use crate::{
    entities::{
        Category, Deal, DealId, Diet, NewDeal,
        deal::{DEFAULT_RATING, MAX_RATING, MIN_RATING},
    },
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{debug, info};

/// Selection value that disables the category and diet filters.
pub const ALL_SENTINEL: &str = "All";

/// In-memory set of deals, kept in insertion order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    deals: Vec<Deal>,
}

impl Catalog {
    /// Creates an empty catalog.
    #[must_use]
    pub const fn new() -> Self {
        Self { deals: Vec::new() }
    }

    /// Validates `fields` and publishes a new deal under `vendor`'s name.
    ///
    /// Assigns a fresh id and `now` as the creation time. The b2b and cold-chain
    /// flags add their own tags.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if:
    /// - The title is empty or whitespace-only
    /// - The price is not a finite amount greater than zero
    /// - The original price is negative or not finite
    /// - The quantity is zero, or the minimum order is zero or above the quantity
    /// - The distance is negative or not finite
    /// - The times do not satisfy pickup start <= pickup end <= expiry
    pub fn create_deal(&mut self, fields: NewDeal, vendor: &str, now: DateTime<Utc>) -> Result<Deal> {
        validate_new_deal(&fields)?;

        let tags = merge_tags(fields.tags, fields.b2b, fields.cold_chain);
        let deal = Deal {
            id: DealId::generate(),
            partner_id: fields.partner_id,
            vendor: vendor.trim().to_string(),
            title: fields.title.trim().to_string(),
            description: fields.description,
            category: fields.category,
            diet: fields.diet,
            allergens: fields.allergens,
            original_price: fields.original_price,
            price: fields.price,
            quantity: fields.quantity,
            min_order_qty: fields.min_order_qty,
            distance_km: fields.distance_km,
            cold_chain: fields.cold_chain,
            b2b: fields.b2b,
            tags,
            pickup_address: fields.pickup_address,
            pickup_notes: fields.pickup_notes,
            rating: fields.rating.unwrap_or(DEFAULT_RATING),
            created_at: now,
            pickup_start: fields.pickup_start,
            pickup_end: fields.pickup_end,
            best_before: fields.best_before,
            expires_at: fields.expires_at,
        };

        info!(
            deal_id = %deal.id,
            partner_id = %deal.partner_id,
            title = %deal.title,
            quantity = deal.quantity,
            "Deal published"
        );
        self.deals.push(deal.clone());
        Ok(deal)
    }

    /// Looks up a deal by id.
    #[must_use]
    pub fn get(&self, id: &DealId) -> Option<&Deal> {
        self.deals.iter().find(|d| &d.id == id)
    }

    /// All deals in insertion order, including sold-out or expired ones not yet swept.
    pub fn iter(&self) -> impl Iterator<Item = &Deal> {
        self.deals.iter()
    }

    /// Number of deals held, active or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.deals.len()
    }

    /// True when the catalog holds no deals at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.deals.is_empty()
    }

    /// Deals with stock left that have not expired at `as_of`, nearest first.
    ///
    /// Deals at the same distance keep their insertion order.
    #[must_use]
    pub fn list_active(&self, as_of: DateTime<Utc>) -> Vec<&Deal> {
        let mut active: Vec<&Deal> = self.deals.iter().filter(|d| d.is_active(as_of)).collect();
        // sort_by is stable
        active.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        active
    }

    /// Takes `amount` units out of a deal's stock.
    ///
    /// # Errors
    /// - [`Error::Validation`] if `amount` is zero
    /// - [`Error::DealNotFound`] if the deal does not exist
    /// - [`Error::InsufficientStock`] if `amount` exceeds the remaining quantity
    pub fn decrement_stock(&mut self, id: &DealId, amount: u32) -> Result<&Deal> {
        if amount == 0 {
            return Err(Error::Validation {
                message: "Stock decrement must be at least 1".to_string(),
            });
        }

        let deal = self.get_mut(id)?;
        if amount > deal.quantity {
            return Err(Error::InsufficientStock {
                deal_id: id.to_string(),
                requested: amount,
                available: deal.quantity,
            });
        }

        deal.quantity -= amount;
        debug!(deal_id = %id, amount, remaining = deal.quantity, "Stock decremented");
        Ok(&*deal)
    }

    /// Puts `amount` units back into a deal's stock.
    ///
    /// Not capped at the published quantity: it returns exactly what a cart took.
    ///
    /// # Errors
    /// - [`Error::DealNotFound`] if the deal does not exist (for example, already swept)
    /// - [`Error::Validation`] if the stock would overflow
    pub fn restore_stock(&mut self, id: &DealId, amount: u32) -> Result<&Deal> {
        let deal = self.get_mut(id)?;
        deal.quantity = deal
            .quantity
            .checked_add(amount)
            .ok_or_else(|| Error::Validation {
                message: format!("Restoring {amount} units to deal {id} overflows its stock"),
            })?;
        debug!(deal_id = %id, amount, remaining = deal.quantity, "Stock restored");
        Ok(&*deal)
    }

    /// Removes every deal that is sold out or whose expiry is at or before `as_of`.
    ///
    /// Returns the removed deals. This is the only operation that destroys deals.
    pub fn sweep_expired(&mut self, as_of: DateTime<Utc>) -> Vec<Deal> {
        let (kept, removed): (Vec<Deal>, Vec<Deal>) = std::mem::take(&mut self.deals)
            .into_iter()
            .partition(|d| d.is_active(as_of));
        self.deals = kept;

        for deal in &removed {
            debug!(
                deal_id = %deal.id,
                quantity = deal.quantity,
                expires_at = %deal.expires_at,
                "Deal swept"
            );
        }
        removed
    }

    fn get_mut(&mut self, id: &DealId) -> Result<&mut Deal> {
        self.deals
            .iter_mut()
            .find(|d| &d.id == id)
            .ok_or_else(|| Error::DealNotFound { id: id.to_string() })
    }
}

/// Consumer-side narrowing of a deal list.
///
/// The default value filters nothing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DealFilter {
    /// Case-insensitive text matched against vendor, title, category and tags; empty matches all
    pub query: String,
    /// Exact category, `None` for "All"
    pub category: Option<Category>,
    /// Required dietary tag, `None` for "All"
    pub diet: Option<Diet>,
    /// Inclusive distance bound in km, `None` for unbounded
    pub max_distance_km: Option<f64>,
}

impl DealFilter {
    /// Builds a filter from raw selection values, where `"All"` (or an empty value)
    /// disables the category or diet filter.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] for an unknown category or dietary tag.
    pub fn from_selections(
        query: &str,
        category: &str,
        diet: &str,
        max_distance_km: Option<f64>,
    ) -> Result<Self> {
        Ok(Self {
            query: query.to_string(),
            category: parse_selection(category)?,
            diet: parse_selection(diet)?,
            max_distance_km,
        })
    }

    /// True if `deal` passes every active filter.
    #[must_use]
    pub fn matches(&self, deal: &Deal) -> bool {
        self.category.is_none_or(|c| deal.category == c)
            && self.diet.is_none_or(|d| deal.diet.contains(&d))
            && self.max_distance_km.is_none_or(|max| deal.distance_km <= max)
            && (self.query.is_empty()
                || deal
                    .search_text()
                    .to_lowercase()
                    .contains(&self.query.to_lowercase()))
    }
}

/// Keeps the deals that pass `filter`, preserving their order.
pub fn filter<'a, I>(deals: I, filter: &DealFilter) -> Vec<&'a Deal>
where
    I: IntoIterator<Item = &'a Deal>,
{
    deals.into_iter().filter(|d| filter.matches(d)).collect()
}

fn parse_selection<T>(value: &str) -> Result<Option<T>>
where
    T: FromStr<Err = Error>,
{
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case(ALL_SENTINEL) {
        return Ok(None);
    }
    value.parse().map(Some)
}

fn validate_new_deal(fields: &NewDeal) -> Result<()> {
    let invalid = |message: String| Err(Error::Validation { message });

    if fields.title.trim().is_empty() {
        return invalid("Deal title cannot be empty".to_string());
    }
    if !fields.price.is_finite() || fields.price <= 0.0 {
        return invalid(format!("Deal price must be greater than zero, got {}", fields.price));
    }
    if !fields.original_price.is_finite() || fields.original_price < 0.0 {
        return invalid(format!(
            "Original price cannot be negative, got {}",
            fields.original_price
        ));
    }
    if fields.quantity == 0 {
        return invalid("Deal quantity must be at least 1".to_string());
    }
    if fields.min_order_qty == 0 || fields.min_order_qty > fields.quantity {
        return invalid(format!(
            "Minimum order must be between 1 and {}, got {}",
            fields.quantity, fields.min_order_qty
        ));
    }
    if let Some(rating) = fields
        .rating
        .filter(|r| !(MIN_RATING..=MAX_RATING).contains(r))
    {
        return invalid(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}, got {rating}"
        ));
    }
    if !fields.distance_km.is_finite() || fields.distance_km < 0.0 {
        return invalid(format!("Distance cannot be negative, got {}", fields.distance_km));
    }
    if fields.pickup_start > fields.pickup_end {
        return invalid("Pickup window starts after it ends".to_string());
    }
    if fields.pickup_end > fields.expires_at {
        return invalid("Pickup window ends after the deal expires".to_string());
    }
    Ok(())
}

fn merge_tags(tags: Vec<String>, b2b: bool, cold_chain: bool) -> Vec<String> {
    let derived = b2b
        .then_some("B2B")
        .into_iter()
        .chain(cold_chain.then_some("Cold chain"))
        .map(str::to_string);

    let mut merged: Vec<String> = Vec::new();
    for tag in tags.into_iter().chain(derived) {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !merged.contains(&tag) {
            merged.push(tag);
        }
    }
    merged
}
