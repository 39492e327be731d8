//! Partner entity - A vendor account that owns deals.
//!
//! Only approved partners have their deals shown to consumers.

use super::deal::Category;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique partner identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PartnerId(pub String);

impl PartnerId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }
}

impl fmt::Display for PartnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PartnerId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Where a partner account stands with the admins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PartnerStatus {
    /// Waiting for an admin decision
    #[default]
    Pending,
    /// May publish, and its deals are shown
    Approved,
    /// Turned down or revoked; deals stay hidden
    Rejected,
}

/// A vendor account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Partner {
    /// Unique identifier
    pub id: PartnerId,
    /// Display name, copied onto deals as the vendor name
    pub name: String,
    /// Kind of business
    pub category: Category,
    /// Approval state
    pub status: PartnerStatus,
}

impl Partner {
    /// True only once an admin has approved the account.
    #[must_use]
    pub const fn is_approved(&self) -> bool {
        matches!(self.status, PartnerStatus::Approved)
    }
}
