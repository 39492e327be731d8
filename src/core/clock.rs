//! Time helpers shared by the catalog and presentation.
//!
//! All functions are pure: the current time is always passed in, never read
//! from the system clock, so expiry logic is deterministic under test.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

const MILLIS_PER_MINUTE: i64 = 60_000;

/// Where `now` falls relative to a pickup window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupWindowState {
    /// The window has not opened yet
    Upcoming,
    /// Pickup is possible right now
    Open,
    /// The window has passed
    Closed,
}

/// Whole minutes until `deadline`, rounded to the nearest minute and never negative.
///
/// Used for the "42m left" badge on a deal.
#[must_use]
pub fn minutes_left(deadline: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let millis = (deadline - now).num_milliseconds();
    // round half up, then floor at zero
    (millis + MILLIS_PER_MINUTE / 2)
        .div_euclid(MILLIS_PER_MINUTE)
        .max(0)
}

/// The instant `minutes` after `now` (negative values go back in time).
#[must_use]
pub fn in_minutes(now: DateTime<Utc>, minutes: i64) -> DateTime<Utc> {
    now + Duration::minutes(minutes)
}

/// True once `now` has reached `deadline`.
#[must_use]
pub fn has_elapsed(deadline: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= deadline
}

/// Classifies `now` against the pickup window `[start, end]`.
#[must_use]
pub fn pickup_window_state(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    now: DateTime<Utc>,
) -> PickupWindowState {
    if now < start {
        PickupWindowState::Upcoming
    } else if now <= end {
        PickupWindowState::Open
    } else {
        PickupWindowState::Closed
    }
}
