use serde::{Deserialize, Serialize};

use lreg_types::{ContentHash, Identity, OrganizationId, Timestamp};

/// Provenance record for one registered content hash.
///
/// Created exactly once per unique hash and never updated or deleted.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub hash: ContentHash,
    pub organization_id: OrganizationId,
    pub registered_by: Identity,
    /// Never [`Timestamp::ZERO`].
    pub timestamp: Timestamp,
}

/// Result of a hash lookup.
///
/// An absent hash reports `exists == false` with the reserved zero
/// timestamp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verification {
    pub exists: bool,
    pub timestamp: Timestamp,
}

impl Verification {
    pub const fn absent() -> Self {
        Self {
            exists: false,
            timestamp: Timestamp::ZERO,
        }
    }

    pub const fn present(timestamp: Timestamp) -> Self {
        Self {
            exists: true,
            timestamp,
        }
    }
}

impl From<Option<&LedgerEntry>> for Verification {
    fn from(entry: Option<&LedgerEntry>) -> Self {
        entry.map_or_else(Self::absent, |e| Self::present(e.timestamp))
    }
}

impl From<Verification> for (bool, u64) {
    fn from(v: Verification) -> Self {
        (v.exists, v.timestamp.as_secs())
    }
}
