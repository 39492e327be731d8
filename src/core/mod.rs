//! Core business logic - framework-agnostic deal, cart, partner and reporting operations.
//!
//! Nothing in here reads the system clock or holds global state: callers pass the
//! current time in and own the structures.

/// Deal catalog: creation, filtering, stock movement and expiry sweep
pub mod catalog;
/// Reservation cart: clamp-on-reserve, remove with restore, checkout
pub mod cart;
/// Pure time helpers
pub mod clock;
/// Food-waste and emissions estimate
pub mod impact;
/// Partner registry and approval gate
pub mod partner;
/// Sales analytics over confirmed reservations
pub mod report;
