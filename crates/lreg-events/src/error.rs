use lreg_crypto::ChainError;

/// Errors produced by journal verification.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum JournalError {
    /// The hash links between events are broken or an event was altered.
    #[error("hash chain violation: {0}")]
    Chain(#[from] ChainError),

    /// Sequence numbers are not contiguous from 1.
    #[error("sequence gap: expected seq {expected}, found {found}")]
    SequenceGap { expected: u64, found: u64 },
}

/// Convenience alias used throughout the journal crate.
pub type Result<T> = std::result::Result<T, JournalError>;
