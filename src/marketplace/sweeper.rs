//! Background expiry sweeper.
//!
//! Periodically removes sold-out and expired deals from the shared marketplace.
//! Listings already hide expired deals, so the interval only bounds how long
//! dead deals linger in memory.

use super::SharedMarketplace;
use chrono::Utc;
use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info};

/// Shortest period accepted; `tokio::time::interval` panics on zero.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(1);

/// Spawns the sweeper on the current runtime. Abort the handle to stop it.
#[must_use]
pub fn spawn_expiry_sweeper(marketplace: SharedMarketplace, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run_expiry_sweeper(marketplace, period))
}

/// Sweeps `marketplace` every `period`, forever.
pub async fn run_expiry_sweeper(marketplace: SharedMarketplace, period: Duration) {
    let period = period.max(MIN_SWEEP_INTERVAL);
    info!(period = ?period, "Expiry sweeper started");

    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let removed = marketplace.lock().await.sweep(Utc::now());
        debug!(removed = removed.len(), "Sweep tick");
    }
}
