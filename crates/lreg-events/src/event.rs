use serde::{Deserialize, Serialize};

use lreg_crypto::ChainLink;
use lreg_types::{ContentHash, Identity, OrganizationId, Timestamp};

/// Classification of registry events, used for subscription filters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    HashRegistered,
    RegistrantUpdated,
    OwnershipTransferred,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::HashRegistered => "HashRegistered",
            Self::RegistrantUpdated => "RegistrantUpdated",
            Self::OwnershipTransferred => "OwnershipTransferred",
        };
        write!(f, "{s}")
    }
}

/// What happened.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A new content hash entered the ledger.
    HashRegistered {
        hash: ContentHash,
        organization_id: OrganizationId,
        registered_by: Identity,
    },
    /// The owner granted or revoked registrant permission.
    RegistrantUpdated {
        identity: Identity,
        authorized: bool,
        updated_by: Identity,
    },
    /// The owner slot changed hands.
    OwnershipTransferred {
        previous_owner: Identity,
        new_owner: Identity,
    },
}

impl EventKind {
    pub fn category(&self) -> EventCategory {
        match self {
            Self::HashRegistered { .. } => EventCategory::HashRegistered,
            Self::RegistrantUpdated { .. } => EventCategory::RegistrantUpdated,
            Self::OwnershipTransferred { .. } => EventCategory::OwnershipTransferred,
        }
    }

    /// The identity that caused the event.
    pub fn actor(&self) -> &Identity {
        match self {
            Self::HashRegistered { registered_by, .. } => registered_by,
            Self::RegistrantUpdated { updated_by, .. } => updated_by,
            Self::OwnershipTransferred { previous_owner, .. } => previous_owner,
        }
    }
}

/// A single journal record.
///
/// `event_hash` is BLAKE3 over the previous event's hash and the bincode
/// encoding of `(seq, timestamp, kind)`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEvent {
    /// Position in the journal, starting at 1.
    pub seq: u64,
    pub timestamp: Timestamp,
    pub kind: EventKind,
    pub prev_hash: Option<[u8; 32]>,
    pub event_hash: [u8; 32],
}

impl RegistryEvent {
    /// Build an event, computing its link hash from `prev_hash`.
    pub fn new(
        seq: u64,
        timestamp: Timestamp,
        kind: EventKind,
        prev_hash: Option<[u8; 32]>,
    ) -> Self {
        let payload = canonical_bytes(seq, timestamp, &kind);
        let event_hash = lreg_crypto::HashChainVerifier::compute_hash(&payload, prev_hash);
        Self {
            seq,
            timestamp,
            kind,
            prev_hash,
            event_hash,
        }
    }

    pub fn category(&self) -> EventCategory {
        self.kind.category()
    }

    /// Short hex form of the event hash.
    pub fn short_hash(&self) -> String {
        hex::encode(&self.event_hash[..4])
    }
}

impl ChainLink for RegistryEvent {
    fn link_hash(&self) -> [u8; 32] {
        self.event_hash
    }

    fn prev_hash(&self) -> Option<[u8; 32]> {
        self.prev_hash
    }

    fn payload_bytes(&self) -> Vec<u8> {
        canonical_bytes(self.seq, self.timestamp, &self.kind)
    }
}

fn canonical_bytes(seq: u64, timestamp: Timestamp, kind: &EventKind) -> Vec<u8> {
    // Encoding plain structs and enums into a Vec cannot fail.
    bincode::serialize(&(seq, timestamp, kind)).unwrap_or_default()
}
