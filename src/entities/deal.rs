//! Deal entity - A time-boxed, quantity-limited surplus-food listing.
//!
//! Deals are owned by the [`Catalog`](crate::core::catalog::Catalog). Consumers never
//! mutate a deal directly: stock moves only through the catalog's paired
//! decrement/restore operations driven by a cart.

use super::partner::PartnerId;
use crate::errors::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Rating given to a deal published without one.
pub const DEFAULT_RATING: f64 = 4.3;
/// Lowest allowed rating.
pub const MIN_RATING: f64 = 0.0;
/// Highest allowed rating.
pub const MAX_RATING: f64 = 5.0;

/// Unique deal identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DealId(pub String);

impl DealId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for DealId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DealId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Kind of food business a deal (or partner) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Boxed meals
    Bento,
    /// Bread and pastries
    Bakery,
    /// Fruit, vegetables and groceries
    Grocer,
    /// Café food and drinks
    #[serde(rename = "Café", alias = "Cafe")]
    Cafe,
    /// Restaurant dishes
    Restaurant,
    /// Bulk stock for businesses
    Wholesaler,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Self; 6] = [
        Self::Bento,
        Self::Bakery,
        Self::Grocer,
        Self::Cafe,
        Self::Restaurant,
        Self::Wholesaler,
    ];

    /// Human-readable label, also used for text search.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Bento => "Bento",
            Self::Bakery => "Bakery",
            Self::Grocer => "Grocer",
            Self::Cafe => "Café",
            Self::Restaurant => "Restaurant",
            Self::Wholesaler => "Wholesaler",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        if wanted.eq_ignore_ascii_case("cafe") {
            return Ok(Self::Cafe);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.label().to_lowercase() == wanted.to_lowercase())
            .ok_or_else(|| Error::Validation {
                message: format!("Unknown category: {wanted}"),
            })
    }
}

/// Dietary tag a deal can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Diet {
    /// No animal products
    Vegan,
    /// No meat or fish
    Vegetarian,
    /// No gluten-containing ingredients
    #[serde(rename = "Gluten-free")]
    GlutenFree,
    /// Prepared to halal requirements
    Halal,
}

impl Diet {
    /// Every dietary tag, in display order.
    pub const ALL: [Self; 4] = [Self::Vegan, Self::Vegetarian, Self::GlutenFree, Self::Halal];

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vegan => "Vegan",
            Self::Vegetarian => "Vegetarian",
            Self::GlutenFree => "Gluten-free",
            Self::Halal => "Halal",
        }
    }
}

impl fmt::Display for Diet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Diet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::Validation {
                message: format!("Unknown dietary tag: {wanted}"),
            })
    }
}

/// Field values a partner submits to publish a deal.
///
/// Validated by [`Catalog::create_deal`](crate::core::catalog::Catalog::create_deal).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewDeal {
    /// Partner publishing the deal
    pub partner_id: PartnerId,
    /// Short listing title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Business category
    pub category: Category,
    /// Dietary tags
    pub diet: BTreeSet<Diet>,
    /// Allergens present
    pub allergens: Vec<String>,
    /// Recommended retail price
    pub original_price: f64,
    /// Discounted price per unit
    pub price: f64,
    /// Units on offer
    pub quantity: u32,
    /// Smallest number of units a consumer may reserve in one go
    pub min_order_qty: u32,
    /// Distance from the requester in km
    pub distance_km: f64,
    /// Needs to stay refrigerated
    pub cold_chain: bool,
    /// Licensed businesses only
    pub b2b: bool,
    /// Free-form tags
    pub tags: Vec<String>,
    /// Where to collect
    pub pickup_address: String,
    /// Shown to the consumer after checkout
    pub pickup_notes: String,
    /// Vendor rating out of 5, [`DEFAULT_RATING`] when not given
    pub rating: Option<f64>,
    /// Start of the pickup window
    pub pickup_start: DateTime<Utc>,
    /// End of the pickup window
    pub pickup_end: DateTime<Utc>,
    /// Best-before time of the food
    pub best_before: DateTime<Utc>,
    /// When the listing stops being offered
    pub expires_at: DateTime<Utc>,
}

/// A published surplus-food listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deal {
    /// Unique identifier
    pub id: DealId,
    /// Owning partner
    pub partner_id: PartnerId,
    /// Partner display name at publish time
    pub vendor: String,
    /// Short listing title
    pub title: String,
    /// Free-text description
    pub description: String,
    /// Business category
    pub category: Category,
    /// Dietary tags
    pub diet: BTreeSet<Diet>,
    /// Allergens present
    pub allergens: Vec<String>,
    /// Recommended retail price
    pub original_price: f64,
    /// Discounted price per unit
    pub price: f64,
    /// Units still available
    pub quantity: u32,
    /// Smallest number of units a consumer may reserve in one go
    pub min_order_qty: u32,
    /// Distance from the requester in km
    pub distance_km: f64,
    /// Needs to stay refrigerated
    pub cold_chain: bool,
    /// Licensed businesses only
    pub b2b: bool,
    /// Free-form tags, including the derived "B2B" / "Cold chain" tags
    pub tags: Vec<String>,
    /// Where to collect
    pub pickup_address: String,
    /// Shown to the consumer after checkout
    pub pickup_notes: String,
    /// Vendor rating out of 5 shown on the deal card
    pub rating: f64,
    /// When the deal was published
    pub created_at: DateTime<Utc>,
    /// Start of the pickup window
    pub pickup_start: DateTime<Utc>,
    /// End of the pickup window
    pub pickup_end: DateTime<Utc>,
    /// Best-before time of the food
    pub best_before: DateTime<Utc>,
    /// When the listing stops being offered
    pub expires_at: DateTime<Utc>,
}

impl Deal {
    /// True while the deal has stock and has not reached its expiry time.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.quantity > 0 && self.expires_at > now
    }

    /// Discount against the original price, in percent (0 when there is no original price).
    #[must_use]
    pub fn discount_percent(&self) -> f64 {
        if self.original_price <= 0.0 {
            return 0.0;
        }
        ((self.original_price - self.price) / self.original_price * 100.0).max(0.0)
    }

    /// Text the free-text search runs against: vendor, title, category and tags.
    #[must_use]
    pub fn search_text(&self) -> String {
        format!(
            "{}{}{}{}",
            self.vendor,
            self.title,
            self.category,
            self.tags.join(" ")
        )
    }
}
