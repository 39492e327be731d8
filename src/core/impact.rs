//! Impact estimator - Rough food-waste and emissions figures for reserved items.
//!
//! This is a demo heuristic, not a measurement: a bulk item (title contains the
//! bulk marker, `"5kg"` by default) counts as 5 kg, anything else as 0.4 kg per
//! unit, and every kilogram of food saved avoids 2.5 kg CO2e.

use crate::entities::{CartLine, ReservationConfirmation};
use serde::{Deserialize, Serialize};

/// Mass assumed for one bulk item, in kg.
pub const DEFAULT_BULK_ITEM_KG: f64 = 5.0;
/// Mass assumed for one regular item, in kg.
pub const DEFAULT_UNIT_ITEM_KG: f64 = 0.4;
/// Emissions avoided per kg of food saved, in kg CO2e.
pub const DEFAULT_CO2E_PER_KG: f64 = 2.5;
/// Title fragment marking a bulk item.
pub const DEFAULT_BULK_MARKER: &str = "5kg";

/// Coefficients of the estimate. Configurable under `[impact]` in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImpactFactors {
    /// Title fragment marking a bulk item
    pub bulk_marker: String,
    /// Mass of one bulk item in kg
    pub bulk_item_kg: f64,
    /// Mass of one regular item in kg
    pub unit_item_kg: f64,
    /// kg CO2e avoided per kg of food
    pub co2e_per_kg: f64,
}

impl Default for ImpactFactors {
    fn default() -> Self {
        Self {
            bulk_marker: DEFAULT_BULK_MARKER.to_string(),
            bulk_item_kg: DEFAULT_BULK_ITEM_KG,
            unit_item_kg: DEFAULT_UNIT_ITEM_KG,
            co2e_per_kg: DEFAULT_CO2E_PER_KG,
        }
    }
}

/// One entry to estimate: a title and how many units of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpactItem<'a> {
    /// Item title, checked for the bulk marker
    pub title: &'a str,
    /// Number of units
    pub quantity: u32,
}

impl<'a> From<&'a CartLine> for ImpactItem<'a> {
    fn from(line: &'a CartLine) -> Self {
        Self {
            title: &line.title,
            quantity: line.quantity,
        }
    }
}

/// Estimated food saved and emissions avoided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ImpactEstimate {
    /// Food saved in kg
    pub food_kg: f64,
    /// Emissions avoided in kg CO2e
    pub co2e_kg: f64,
}

impl ImpactFactors {
    /// Mass of a single unit of an item with this title.
    #[must_use]
    pub fn item_kg(&self, title: &str) -> f64 {
        if title.contains(&self.bulk_marker) {
            self.bulk_item_kg
        } else {
            self.unit_item_kg
        }
    }

    /// Estimates the impact of `items`.
    pub fn estimate<'a, I>(&self, items: I) -> ImpactEstimate
    where
        I: IntoIterator<Item = ImpactItem<'a>>,
    {
        let food_kg: f64 = items
            .into_iter()
            .map(|item| self.item_kg(item.title) * f64::from(item.quantity))
            .sum();
        ImpactEstimate {
            food_kg,
            co2e_kg: food_kg * self.co2e_per_kg,
        }
    }

    /// Estimates the impact of every line of the given confirmations.
    pub fn estimate_confirmed<'a, I>(&self, confirmations: I) -> ImpactEstimate
    where
        I: IntoIterator<Item = &'a ReservationConfirmation>,
    {
        self.estimate(
            confirmations
                .into_iter()
                .flat_map(|c| c.lines.iter().map(ImpactItem::from)),
        )
    }
}

/// Estimates the impact of `items` with the default coefficients.
pub fn estimate<'a, I>(items: I) -> ImpactEstimate
where
    I: IntoIterator<Item = ImpactItem<'a>>,
{
    ImpactFactors::default().estimate(items)
}
