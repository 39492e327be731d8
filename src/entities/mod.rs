//! Entity module - Plain data types the engine works with.
//! Every entity derives `serde` traits so a persistence or API adapter can be
//! layered on top without touching the core operations.

/// Cart line snapshot
pub mod cart_line;
/// Confirmed reservation
pub mod confirmation;
/// Deal, its id and its category/diet tags
pub mod deal;
/// Partner and its id
pub mod partner;

pub use cart_line::CartLine;
pub use confirmation::ReservationConfirmation;
pub use deal::{Category, Deal, DealId, Diet, NewDeal};
pub use partner::{Partner, PartnerId, PartnerStatus};
