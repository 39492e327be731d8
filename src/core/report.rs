//! Report generation business logic.
//!
//! Builds sales analytics from confirmed reservations: order count, units sold,
//! revenue, average order value, best-selling categories and the estimated
//! impact. All functions are framework-agnostic and return structured data that
//! the presentation layer can format.

use crate::{
    core::impact::{ImpactEstimate, ImpactFactors},
    entities::{Category, ReservationConfirmation},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How many categories the report ranks.
pub const TOP_CATEGORY_LIMIT: usize = 5;

/// Units and revenue for one category.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategorySales {
    /// The category
    pub category: Category,
    /// Units sold in this category
    pub units: u32,
    /// Revenue from this category
    pub revenue: f64,
}

/// Summary of all confirmed reservations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    /// Number of checkouts
    pub confirmed_orders: usize,
    /// Units across all checkouts
    pub units_sold: u32,
    /// Sum of checkout totals
    pub revenue: f64,
    /// Revenue divided by number of checkouts
    pub average_order_value: f64,
    /// Food saved and emissions avoided
    pub impact: ImpactEstimate,
    /// Best-selling categories by revenue, at most [`TOP_CATEGORY_LIMIT`]
    pub top_categories: Vec<CategorySales>,
}

/// Generates the sales report for `confirmations`.
#[must_use]
pub fn generate_sales_report(
    confirmations: &[ReservationConfirmation],
    factors: &ImpactFactors,
) -> SalesReport {
    let revenue: f64 = confirmations.iter().map(|c| c.total).sum();
    let units_sold: u32 = confirmations
        .iter()
        .map(ReservationConfirmation::item_count)
        .sum();

    let mut by_category: BTreeMap<Category, CategorySales> = BTreeMap::new();
    for line in confirmations.iter().flat_map(|c| &c.lines) {
        let entry = by_category.entry(line.category).or_insert(CategorySales {
            category: line.category,
            units: 0,
            revenue: 0.0,
        });
        entry.units += line.quantity;
        entry.revenue += line.subtotal();
    }
    let mut top_categories: Vec<CategorySales> = by_category.into_values().collect();
    top_categories.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    top_categories.truncate(TOP_CATEGORY_LIMIT);

    SalesReport {
        confirmed_orders: confirmations.len(),
        units_sold,
        revenue,
        average_order_value: calculate_average_order_value(revenue, confirmations.len()),
        impact: factors.estimate_confirmed(confirmations),
        top_categories,
    }
}

/// Average revenue per order, 0 when there are no orders.
#[must_use]
pub fn calculate_average_order_value(revenue: f64, orders: usize) -> f64 {
    if orders == 0 {
        return 0.0;
    }

    // Order counts stay far below 2^52
    #[allow(clippy::cast_precision_loss)]
    let orders = orders as f64;
    revenue / orders
}

/// Formats a currency amount like `$7.50` or `-$2.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// One-line human summary of a report.
#[must_use]
pub fn format_report_summary(report: &SalesReport) -> String {
    format!(
        "{} orders | {} items | {} revenue | {} avg | {:.1} kg food saved | {:.0} kg CO2e avoided",
        report.confirmed_orders,
        report.units_sold,
        format_currency(report.revenue),
        format_currency(report.average_order_value),
        report.impact.food_kg,
        report.impact.co2e_kg,
    )
}
