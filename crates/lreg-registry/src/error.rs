use lreg_types::{ContentHash, Identity};

/// Errors produced by registry operations.
///
/// Every variant is a rejected single operation that left the registry
/// unchanged. None are retryable as-is: the caller must fix the identity or
/// the input and resubmit.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("caller is not authorized")]
    Unauthorized { caller: Identity },

    #[error("hash already registered")]
    DuplicateEntry { hash: ContentHash },

    #[error("caller is not the owner")]
    Forbidden { caller: Identity },

    #[error("registry lock poisoned")]
    LockPoisoned,
}

impl RegistryError {
    /// Human-readable rejection reason, in the `LedgerRegistry: <reason>`
    /// shape downstream systems match on.
    pub fn reason(&self) -> String {
        format!("LedgerRegistry: {self}")
    }
}
