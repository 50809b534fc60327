use lreg_types::{ContentHash, Identity, OrganizationId};

use crate::entry::{LedgerEntry, Verification};
use crate::error::RegistryError;

/// Mutating boundary of the registry. Every call names its caller.
pub trait RegistryWriter: Send + Sync {
    /// Record `hash` for `organization_id`. The caller must be an authorized
    /// registrant and the hash must be new.
    fn register_hash(
        &self,
        caller: &Identity,
        hash: ContentHash,
        organization_id: OrganizationId,
    ) -> Result<(), RegistryError>;

    /// Grant or revoke registrant permission. Owner only.
    fn set_authorized_registrant(
        &self,
        caller: &Identity,
        identity: &Identity,
        authorized: bool,
    ) -> Result<(), RegistryError>;

    /// Hand the owner slot to `new_owner`. Owner only. Registrant flags are
    /// left as they are.
    fn transfer_ownership(&self, caller: &Identity, new_owner: &Identity)
        -> Result<(), RegistryError>;
}

/// Read-only boundary of the registry. Open to any caller; never fails.
pub trait RegistryReader: Send + Sync {
    fn verify_hash(&self, hash: &ContentHash) -> Verification;

    fn entry(&self, hash: &ContentHash) -> Option<LedgerEntry>;

    /// Current registrant flag, `false` for identities never seen.
    fn authorized_registrants(&self, identity: &Identity) -> bool;

    fn owner(&self) -> Identity;

    /// Number of registered hashes.
    fn entry_count(&self) -> usize;
}
