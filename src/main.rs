use chrono::Utc;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use zerosaver::{
    config::{self, seed},
    core::{
        catalog::DealFilter,
        clock,
        report::{format_currency, format_report_summary},
    },
    errors::Result,
    marketplace::{Marketplace, sweeper},
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file, non-fatal: env vars can be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::load_app_configuration()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Seed partners and deals
    let now = Utc::now();
    let mut marketplace = Marketplace::new(app_config.impact.clone());
    seed::seed_marketplace(&mut marketplace, &app_config.partners, &app_config.deals, now)
        .inspect_err(|e| error!("Failed to seed marketplace: {}", e))?;

    // 5. Share the marketplace and start sweeping
    let marketplace = marketplace.into_shared();
    let sweeper_handle =
        sweeper::spawn_expiry_sweeper(Arc::clone(&marketplace), app_config.marketplace.sweep_interval());

    // 6. Walk through one reservation as the demo consumer
    {
        let consumer = app_config.marketplace.demo_consumer.as_str();
        let mut market = marketplace.lock().await;

        let visible = market.visible_deals(&DealFilter::default(), now);
        for deal in &visible {
            info!(
                vendor = %deal.vendor,
                title = %deal.title,
                price = %format_currency(deal.price),
                discount_pct = deal.discount_percent().round(),
                pickup = ?clock::pickup_window_state(deal.pickup_start, deal.pickup_end, now),
                rating = deal.rating,
                left = deal.quantity,
                distance_km = deal.distance_km,
                expires_in_min = clock::minutes_left(deal.expires_at, now),
                "Deal available"
            );
        }
        let first = visible.first().map(|d| (d.id.clone(), d.title.clone()));

        if let Some((deal_id, title)) = first {
            match market.reserve_min_order(consumer, &deal_id, now) {
                Ok(Some(line)) => info!(consumer, %title, quantity = line.quantity, "Demo reservation added"),
                Ok(None) => warn!(%title, "Demo deal is no longer available"),
                Err(e) => warn!("Demo reservation failed: {}", e),
            }
            let impact = market.cart_impact(consumer);
            info!(
                total = %format_currency(market.cart_total(consumer)),
                food_kg = impact.food_kg,
                co2e_kg = impact.co2e_kg,
                "Demo cart"
            );
            match market.checkout(consumer, now) {
                Ok(confirmation) => info!(
                    token = %confirmation.token,
                    items = confirmation.item_count(),
                    "Demo reservation confirmed"
                ),
                Err(e) => warn!("Demo checkout failed: {}", e),
            }
        } else {
            warn!("No visible deals to reserve");
        }

        info!("{}", format_report_summary(&market.sales_report()));
    }

    // 7. Keep sweeping until interrupted
    info!("Running; press Ctrl-C to stop.");
    tokio::signal::ctrl_c().await?;
    sweeper_handle.abort();
    info!("Shutting down.");
    Ok(())
}
