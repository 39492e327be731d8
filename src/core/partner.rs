//! Partner registry business logic - Tracks vendor accounts and their approval.
//!
//! A partner is pending, approved or rejected. Approval is an admin action;
//! enforcing who may perform it is left to the calling layer. Deals of partners
//! that are not approved stay in the catalog but are hidden from consumers.

use crate::{
    entities::{Category, Partner, PartnerId, PartnerStatus},
    errors::{Error, Result},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::info;

/// All known partners, keyed by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartnerRegistry {
    partners: BTreeMap<PartnerId, Partner>,
}

impl PartnerRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            partners: BTreeMap::new(),
        }
    }

    /// Registers a new partner under a fresh id. New partners start out pending approval.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty or whitespace-only.
    pub fn register(&mut self, name: &str, category: Category) -> Result<Partner> {
        if name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Partner name cannot be empty".to_string(),
            });
        }

        let partner = Partner {
            id: PartnerId::generate(),
            name: name.trim().to_string(),
            category,
            status: PartnerStatus::Pending,
        };
        info!(partner_id = %partner.id, name = %partner.name, "Partner registered, pending approval");
        self.partners.insert(partner.id.clone(), partner.clone());
        Ok(partner)
    }

    /// Adds a partner with a known id, as loaded from seed data.
    ///
    /// # Errors
    /// Returns [`Error::Validation`] if the name is empty or the id is already taken.
    pub fn insert(&mut self, partner: Partner) -> Result<()> {
        if partner.name.trim().is_empty() {
            return Err(Error::Validation {
                message: "Partner name cannot be empty".to_string(),
            });
        }
        if self.partners.contains_key(&partner.id) {
            return Err(Error::Validation {
                message: format!("Partner id {} is already registered", partner.id),
            });
        }
        self.partners.insert(partner.id.clone(), partner);
        Ok(())
    }

    /// Looks up a partner by id.
    #[must_use]
    pub fn get(&self, id: &PartnerId) -> Option<&Partner> {
        self.partners.get(id)
    }

    /// True only for known, approved partners.
    #[must_use]
    pub fn is_approved(&self, id: &PartnerId) -> bool {
        self.partners.get(id).is_some_and(Partner::is_approved)
    }

    /// Moves a partner to `status`.
    ///
    /// # Errors
    /// Returns [`Error::PartnerNotFound`] if the id is unknown.
    pub fn set_status(&mut self, id: &PartnerId, status: PartnerStatus) -> Result<&Partner> {
        let partner = self
            .partners
            .get_mut(id)
            .ok_or_else(|| Error::PartnerNotFound { id: id.to_string() })?;

        if partner.status != status {
            info!(partner_id = %id, from = ?partner.status, to = ?status, "Partner status changed");
        }
        partner.status = status;
        Ok(&*partner)
    }

    /// Approves a partner, or rejects it when `approved` is false.
    ///
    /// Revoking an approved partner rejects it; it does not go back to pending.
    ///
    /// # Errors
    /// Returns [`Error::PartnerNotFound`] if the id is unknown.
    pub fn set_approval(&mut self, id: &PartnerId, approved: bool) -> Result<&Partner> {
        let status = if approved {
            PartnerStatus::Approved
        } else {
            PartnerStatus::Rejected
        };
        self.set_status(id, status)
    }

    /// Rejects a partner.
    ///
    /// # Errors
    /// Returns [`Error::PartnerNotFound`] if the id is unknown.
    pub fn reject(&mut self, id: &PartnerId) -> Result<&Partner> {
        self.set_status(id, PartnerStatus::Rejected)
    }

    /// Approved partners, ordered alphabetically by name.
    #[must_use]
    pub fn approved(&self) -> Vec<&Partner> {
        self.with_status(PartnerStatus::Approved)
    }

    /// Partners waiting for an admin decision, ordered alphabetically by name.
    #[must_use]
    pub fn pending(&self) -> Vec<&Partner> {
        self.with_status(PartnerStatus::Pending)
    }

    /// Rejected or revoked partners, ordered alphabetically by name.
    #[must_use]
    pub fn rejected(&self) -> Vec<&Partner> {
        self.with_status(PartnerStatus::Rejected)
    }

    /// Number of registered partners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.partners.len()
    }

    /// True when no partner is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.partners.is_empty()
    }

    fn with_status(&self, status: PartnerStatus) -> Vec<&Partner> {
        let mut partners: Vec<&Partner> =
            self.partners.values().filter(|p| p.status == status).collect();
        partners.sort_by(|a, b| a.name.cmp(&b.name));
        partners
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn seeded() -> PartnerRegistry {
        let mut registry = PartnerRegistry::new();
        for (id, name, status) in [
            ("v2", "Daily Bakery", PartnerStatus::Approved),
            ("v1", "Sunset Sushi", PartnerStatus::Approved),
            ("v5", "Aussie Foods Wholesale", PartnerStatus::Pending),
        ] {
            registry
                .insert(Partner {
                    id: PartnerId::from(id),
                    name: name.to_string(),
                    category: Category::Restaurant,
                    status,
                })
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_is_approved() {
        let registry = seeded();
        assert!(registry.is_approved(&PartnerId::from("v1")));
        assert!(!registry.is_approved(&PartnerId::from("v5")));
        assert!(!registry.is_approved(&PartnerId::from("unknown")));
    }

    #[test]
    fn test_set_approval() -> Result<()> {
        let mut registry = seeded();

        let partner = registry.set_approval(&PartnerId::from("v5"), true)?;
        assert_eq!(partner.status, PartnerStatus::Approved);
        assert!(registry.is_approved(&PartnerId::from("v5")));

        registry.set_approval(&PartnerId::from("v1"), false)?;
        assert!(!registry.is_approved(&PartnerId::from("v1")));

        let err = registry
            .set_approval(&PartnerId::from("missing"), true)
            .unwrap_err();
        assert!(matches!(err, Error::PartnerNotFound { .. }));
        Ok(())
    }

    #[test]
    fn test_register_starts_pending() -> Result<()> {
        let mut registry = PartnerRegistry::new();
        let partner = registry.register("  Bean Scene Café ", Category::Cafe)?;

        assert_eq!(partner.name, "Bean Scene Café");
        assert_eq!(partner.status, PartnerStatus::Pending);
        assert_eq!(registry.get(&partner.id), Some(&partner));
        assert_eq!(registry.pending().len(), 1);

        assert!(matches!(
            registry.register(" ", Category::Cafe).unwrap_err(),
            Error::Validation { .. }
        ));
        Ok(())
    }

    #[test]
    fn test_insert_rejects_duplicate_id() {
        let mut registry = seeded();
        let err = registry
            .insert(Partner {
                id: PartnerId::from("v1"),
                name: "Impostor".to_string(),
                category: Category::Bento,
                status: PartnerStatus::Approved,
            })
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        assert_eq!(registry.get(&PartnerId::from("v1")).unwrap().name, "Sunset Sushi");
    }

    #[test]
    fn test_listings_are_sorted_by_name() {
        let registry = seeded();
        let names: Vec<&str> = registry.approved().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Daily Bakery", "Sunset Sushi"]);

        let pending: Vec<&str> = registry.pending().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(pending, vec!["Aussie Foods Wholesale"]);
        assert!(registry.rejected().is_empty());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_revoked_partner_is_rejected_not_pending() -> Result<()> {
        let mut registry = seeded();

        let revoked = registry.set_approval(&PartnerId::from("v2"), false)?;
        assert_eq!(revoked.status, PartnerStatus::Rejected);
        assert!(!registry.is_approved(&PartnerId::from("v2")));

        let pending: Vec<&str> = registry.pending().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(pending, vec!["Aussie Foods Wholesale"]);
        let rejected: Vec<&str> = registry.rejected().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(rejected, vec!["Daily Bakery"]);

        registry.reject(&PartnerId::from("v5"))?;
        assert!(registry.pending().is_empty());
        assert_eq!(registry.rejected().len(), 2);

        // Rejected partners can still be approved later
        registry.set_status(&PartnerId::from("v5"), PartnerStatus::Approved)?;
        assert!(registry.is_approved(&PartnerId::from("v5")));
        Ok(())
    }
}
