//! Unified error type for the deal engine.
//!
//! Every operation returns [`Result`]. All variants are recoverable by the caller;
//! the presentation layer decides whether to re-prompt the user.

use thiserror::Error;

/// All failures the deal engine can report.
#[derive(Debug, Error)]
pub enum Error {
    /// Bad deal or partner input (empty title, non-positive price, broken time window...)
    #[error("Validation error: {message}")]
    Validation {
        /// What was wrong with the input
        message: String,
    },

    /// Attempt to take more units than a deal has left
    #[error("Insufficient stock for deal {deal_id}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Deal the stock was requested from
        deal_id: String,
        /// Units requested
        requested: u32,
        /// Units left at the time of the request
        available: u32,
    },

    /// Checkout with no cart lines
    #[error("Cart is empty")]
    EmptyCart,

    /// Unknown (or swept) deal id
    #[error("Deal not found: {id}")]
    DealNotFound {
        /// The id that was looked up
        id: String,
    },

    /// Unknown partner id
    #[error("Partner not found: {id}")]
    PartnerNotFound {
        /// The id that was looked up
        id: String,
    },

    /// Partner tried to publish while still pending approval
    #[error("Partner {id} is pending approval")]
    PartnerNotApproved {
        /// The partner that is not approved
        id: String,
    },

    /// Configuration file could not be read or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Details of the failure
        message: String,
    },

    /// I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
