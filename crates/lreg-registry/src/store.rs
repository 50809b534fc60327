use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, warn};

use lreg_events::{EventFilter, EventJournal, EventKind, EventStream, JournalError, RegistryEvent};
use lreg_types::{ContentHash, Identity, OrganizationId, RegistryAddress};

use crate::clock::{Clock, SystemClock};
use crate::entry::{LedgerEntry, Verification};
use crate::error::RegistryError;
use crate::traits::{RegistryReader, RegistryWriter};

/// Access-controlled, append-only content-hash registry.
///
/// All state sits behind one `RwLock`. Mutations hold the write lock across
/// their check-then-write, and append their journal event before releasing
/// it, so concurrent registrations of the same hash produce exactly one
/// success and readers never see an entry without its event.
pub struct RegistryStore {
    address: RegistryAddress,
    clock: Arc<dyn Clock>,
    inner: RwLock<RegistryState>,
}

struct RegistryState {
    owner: Identity,
    registrants: HashMap<Identity, bool>,
    entries: HashMap<ContentHash, LedgerEntry>,
    journal: EventJournal,
}

impl RegistryStore {
    /// Create a registry owned by `creator`, using wall-clock time.
    pub fn new(creator: Identity) -> Self {
        Self::deploy(creator, 0, Arc::new(SystemClock))
    }

    /// Create a registry with an explicit clock.
    pub fn with_clock(creator: Identity, clock: Arc<dyn Clock>) -> Self {
        Self::deploy(creator, 0, clock)
    }

    /// Create the `nonce`-th registry of `creator`.
    ///
    /// The creator becomes owner and is registered as an authorized
    /// registrant. Those are two separate facts; only construction sets both.
    pub fn deploy(creator: Identity, nonce: u64, clock: Arc<dyn Clock>) -> Self {
        let address = RegistryAddress::derive(&creator, nonce);

        let mut registrants = HashMap::new();
        registrants.insert(creator.clone(), true);

        info!(%address, owner = %creator, "registry created");

        Self {
            address,
            clock,
            inner: RwLock::new(RegistryState {
                owner: creator,
                registrants,
                entries: HashMap::new(),
                journal: EventJournal::new(),
            }),
        }
    }

    /// Handle of this registry instance.
    pub fn address(&self) -> RegistryAddress {
        self.address
    }

    /// Subscribe to events appended from now on.
    pub fn subscribe(&self, filter: EventFilter) -> Result<EventStream, RegistryError> {
        Ok(self.write()?.journal.subscribe(filter))
    }

    /// Snapshot of the whole journal.
    pub fn events(&self) -> Vec<RegistryEvent> {
        self.read().journal.events().to_vec()
    }

    /// Journal events with `seq` greater than `after`.
    pub fn events_after(&self, after: u64) -> Vec<RegistryEvent> {
        self.read().journal.events_after(after).to_vec()
    }

    /// Check the journal's sequence numbers and hash links.
    pub fn verify_journal(&self) -> Result<(), JournalError> {
        self.read().journal.verify()
    }

    /// Number of registered hashes.
    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        self.inner.write().map_err(|_| RegistryError::LockPoisoned)
    }

    // No mutation panics halfway through, so a poisoned guard still holds a
    // consistent state and reads stay infallible.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RegistryState {
    fn is_registrant(&self, identity: &Identity) -> bool {
        self.registrants.get(identity).copied().unwrap_or(false)
    }
}

impl RegistryWriter for RegistryStore {
    fn register_hash(
        &self,
        caller: &Identity,
        hash: ContentHash,
        organization_id: OrganizationId,
    ) -> Result<(), RegistryError> {
        let mut state = self.write()?;

        if !state.is_registrant(caller) {
            warn!(%caller, hash = %hash.short_hex(), "registration rejected: unauthorized");
            return Err(RegistryError::Unauthorized {
                caller: caller.clone(),
            });
        }
        if state.entries.contains_key(&hash) {
            warn!(%caller, hash = %hash.short_hex(), "registration rejected: duplicate");
            return Err(RegistryError::DuplicateEntry { hash });
        }

        let timestamp = self.clock.now().non_zero();
        state.entries.insert(
            hash,
            LedgerEntry {
                hash,
                organization_id,
                registered_by: caller.clone(),
                timestamp,
            },
        );
        state.journal.append(
            timestamp,
            EventKind::HashRegistered {
                hash,
                organization_id,
                registered_by: caller.clone(),
            },
        );

        debug!(%caller, hash = %hash.short_hex(), %organization_id, %timestamp, "hash registered");
        Ok(())
    }

    fn set_authorized_registrant(
        &self,
        caller: &Identity,
        identity: &Identity,
        authorized: bool,
    ) -> Result<(), RegistryError> {
        let mut state = self.write()?;

        if state.owner != *caller {
            warn!(%caller, %identity, "permission change rejected: not owner");
            return Err(RegistryError::Forbidden {
                caller: caller.clone(),
            });
        }

        state.registrants.insert(identity.clone(), authorized);
        let timestamp = self.clock.now().non_zero();
        state.journal.append(
            timestamp,
            EventKind::RegistrantUpdated {
                identity: identity.clone(),
                authorized,
                updated_by: caller.clone(),
            },
        );

        debug!(%identity, authorized, "registrant updated");
        Ok(())
    }

    fn transfer_ownership(
        &self,
        caller: &Identity,
        new_owner: &Identity,
    ) -> Result<(), RegistryError> {
        let mut state = self.write()?;

        if state.owner != *caller {
            warn!(%caller, "ownership transfer rejected: not owner");
            return Err(RegistryError::Forbidden {
                caller: caller.clone(),
            });
        }

        let previous_owner = std::mem::replace(&mut state.owner, new_owner.clone());
        let timestamp = self.clock.now().non_zero();
        state.journal.append(
            timestamp,
            EventKind::OwnershipTransferred {
                previous_owner: previous_owner.clone(),
                new_owner: new_owner.clone(),
            },
        );

        info!(from = %previous_owner, to = %new_owner, "ownership transferred");
        Ok(())
    }
}

impl RegistryReader for RegistryStore {
    fn verify_hash(&self, hash: &ContentHash) -> Verification {
        Verification::from(self.read().entries.get(hash))
    }

    fn entry(&self, hash: &ContentHash) -> Option<LedgerEntry> {
        self.read().entries.get(hash).cloned()
    }

    fn authorized_registrants(&self, identity: &Identity) -> bool {
        self.read().is_registrant(identity)
    }

    fn owner(&self) -> Identity {
        self.read().owner.clone()
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}
