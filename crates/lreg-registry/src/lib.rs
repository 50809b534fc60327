//! Access-controlled content-hash registry.
//!
//! This crate is the core of `lreg`. It provides:
//! - [`RegistryStore`], the single owner of the hash → provenance table, the
//!   registrant permission table, and the owner slot
//! - `RegistryWriter` / `RegistryReader` trait boundaries
//! - [`LedgerEntry`] and [`Verification`] records
//! - A [`Clock`] seam for registration times
//!
//! The ledger is append-only: an entry is created once per unique hash and
//! never updated or removed. Every successful mutation is journaled in the
//! same critical section (see `lreg-events`).
//!
//! # Quick Start
//!
//! ```rust
//! use lreg_registry::{RegistryReader, RegistryStore, RegistryWriter};
//! use lreg_types::{ContentHash, Identity, OrganizationId};
//!
//! let owner = Identity::named("deployer");
//! let registry = RegistryStore::new(owner.clone());
//! let hash = ContentHash::of(b"sample-data-hash");
//!
//! registry.register_hash(&owner, hash, OrganizationId::new(1)).unwrap();
//! assert!(registry.verify_hash(&hash).exists);
//! ```

pub mod clock;
pub mod entry;
pub mod error;
pub mod store;
pub mod traits;

pub use clock::{Clock, ManualClock, SystemClock};
pub use entry::{LedgerEntry, Verification};
pub use error::RegistryError;
pub use store::RegistryStore;
pub use traits::{RegistryReader, RegistryWriter};

#[cfg(test)]
mod tests {
    use super::*;
    use lreg_types::{ContentHash, Identity, OrganizationId, Timestamp};

    const ORGANIZATION_ID: OrganizationId = OrganizationId::new(1);

    struct Accounts {
        owner: Identity,
        authorized_user: Identity,
        unauthorized_user: Identity,
    }

    fn setup() -> (Accounts, RegistryStore) {
        let accounts = Accounts {
            owner: Identity::named("owner"),
            authorized_user: Identity::named("authorized-user"),
            unauthorized_user: Identity::named("unauthorized-user"),
        };
        let registry = RegistryStore::new(accounts.owner.clone());
        (accounts, registry)
    }

    fn sample_hash() -> ContentHash {
        ContentHash::of(b"sample-data-hash")
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------
    #[test]
    fn deployer_is_owner() {
        let (acc, registry) = setup();
        assert_eq!(registry.owner(), acc.owner);
    }

    #[test]
    fn deployer_is_authorized_registrant() {
        let (acc, registry) = setup();
        assert!(registry.authorized_registrants(&acc.owner));
        assert!(!registry.authorized_registrants(&acc.authorized_user));
        assert!(registry.is_empty());
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------
    #[test]
    fn registers_hash() {
        let (acc, registry) = setup();
        registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap();
        assert_eq!(registry.entry_count(), 1);
    }

    #[test]
    fn rejects_duplicate_hash() {
        let (acc, registry) = setup();
        registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap();

        let err = registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap_err();
        assert_eq!(err.reason(), "LedgerRegistry: hash already registered");
        assert_eq!(registry.entry_count(), 1);
    }

    #[test]
    fn rejects_unauthorized_registrant() {
        let (acc, registry) = setup();
        let err = registry
            .register_hash(&acc.unauthorized_user, sample_hash(), ORGANIZATION_ID)
            .unwrap_err();
        assert_eq!(err.reason(), "LedgerRegistry: caller is not authorized");
        assert!(registry.is_empty());
    }

    // -----------------------------------------------------------------------
    // Verification
    // -----------------------------------------------------------------------
    #[test]
    fn verifies_registered_hash() {
        let (acc, registry) = setup();
        registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap();

        let (exists, timestamp): (bool, u64) = registry.verify_hash(&sample_hash()).into();
        assert!(exists);
        assert!(timestamp > 0);
    }

    #[test]
    fn unregistered_hash_is_absent() {
        let (_acc, registry) = setup();
        let (exists, timestamp): (bool, u64) = registry.verify_hash(&sample_hash()).into();
        assert!(!exists);
        assert_eq!(timestamp, 0);
    }

    // -----------------------------------------------------------------------
    // Authorization
    // -----------------------------------------------------------------------
    #[test]
    fn owner_authorizes_new_registrant() {
        let (acc, registry) = setup();
        registry
            .set_authorized_registrant(&acc.owner, &acc.authorized_user, true)
            .unwrap();
        assert!(registry.authorized_registrants(&acc.authorized_user));
    }

    #[test]
    fn non_owner_cannot_authorize() {
        let (acc, registry) = setup();
        let err = registry
            .set_authorized_registrant(&acc.unauthorized_user, &acc.authorized_user, true)
            .unwrap_err();
        assert_eq!(err.reason(), "LedgerRegistry: caller is not the owner");
        assert!(!registry.authorized_registrants(&acc.authorized_user));
    }

    // -----------------------------------------------------------------------
    // Scenarios
    // -----------------------------------------------------------------------
    #[test]
    fn duplicate_keeps_first_organization() {
        let (acc, registry) = setup();
        let h1 = ContentHash::of(b"H1");

        registry
            .register_hash(&acc.owner, h1, OrganizationId::new(1))
            .unwrap();
        let err = registry
            .register_hash(&acc.owner, h1, OrganizationId::new(2))
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateEntry { hash: h1 });

        let v = registry.verify_hash(&h1);
        assert!(v.exists);
        assert!(v.timestamp > Timestamp::ZERO);
        assert_eq!(
            registry.entry(&h1).unwrap().organization_id,
            OrganizationId::new(1)
        );
    }

    #[test]
    fn entries_survive_revocation() {
        let (acc, registry) = setup();
        let h2 = ContentHash::of(b"H2");

        registry
            .set_authorized_registrant(&acc.owner, &acc.authorized_user, true)
            .unwrap();
        registry
            .register_hash(&acc.authorized_user, h2, ORGANIZATION_ID)
            .unwrap();
        let before = registry.verify_hash(&h2);

        registry
            .set_authorized_registrant(&acc.owner, &acc.authorized_user, false)
            .unwrap();

        assert!(!registry.authorized_registrants(&acc.authorized_user));
        assert_eq!(registry.verify_hash(&h2), before);
        assert!(before.exists);
        assert_eq!(
            registry.entry(&h2).unwrap().registered_by,
            acc.authorized_user
        );

        let err = registry
            .register_hash(&acc.authorized_user, ContentHash::of(b"H2b"), ORGANIZATION_ID)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
    }

    #[test]
    fn unauthorized_attempt_leaves_no_trace() {
        let (acc, registry) = setup();
        let h3 = ContentHash::of(b"H3");

        let err = registry
            .register_hash(&acc.unauthorized_user, h3, ORGANIZATION_ID)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));
        assert_eq!(registry.verify_hash(&h3), Verification::absent());
        assert!(registry.events().is_empty());
    }

    #[test]
    fn owner_may_revoke_own_registrant_flag() {
        let (acc, registry) = setup();

        registry
            .set_authorized_registrant(&acc.owner, &acc.owner, false)
            .unwrap();

        // Still owner, no longer a registrant.
        assert_eq!(registry.owner(), acc.owner);
        assert!(!registry.authorized_registrants(&acc.owner));
        let err = registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap_err();
        assert!(matches!(err, RegistryError::Unauthorized { .. }));

        // The owner can restore the flag.
        registry
            .set_authorized_registrant(&acc.owner, &acc.owner, true)
            .unwrap();
        registry
            .register_hash(&acc.owner, sample_hash(), ORGANIZATION_ID)
            .unwrap();
    }
}
