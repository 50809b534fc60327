/// An element of a hash-linked sequence.
pub trait ChainLink {
    /// The element's own hash.
    fn link_hash(&self) -> [u8; 32];
    /// The previous element's hash (None for the first element).
    fn prev_hash(&self) -> Option<[u8; 32]>;
    /// Canonical payload bytes for hash verification.
    fn payload_bytes(&self) -> Vec<u8>;
}

/// Hash chain integrity verifier.
///
/// Verifies that a sequence forms a valid hash chain: each element's
/// `prev_hash` matches the previous element's `link_hash`, and each
/// `link_hash` is correctly computed from its payload and predecessor.
pub struct HashChainVerifier;

impl HashChainVerifier {
    /// Verify a chain.
    pub fn verify_chain(links: &[impl ChainLink]) -> Result<(), ChainError> {
        let mut expected_prev: Option<[u8; 32]> = None;

        for (index, link) in links.iter().enumerate() {
            match (index, link.prev_hash(), expected_prev) {
                (0, Some(_), _) => return Err(ChainError::GenesisHasPrevHash),
                (_, None, Some(_)) => return Err(ChainError::MissingPrevHash { index }),
                (_, Some(prev), Some(expected)) if prev != expected => {
                    return Err(ChainError::BrokenLink { index })
                }
                _ => {}
            }

            let computed = Self::compute_hash(&link.payload_bytes(), expected_prev);
            if computed != link.link_hash() {
                return Err(ChainError::HashMismatch { index });
            }
            expected_prev = Some(computed);
        }

        Ok(())
    }

    /// Compute the expected hash for a payload and optional previous hash.
    pub fn compute_hash(payload: &[u8], prev_hash: Option<[u8; 32]>) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lreg-event-v1:");
        if let Some(prev) = prev_hash {
            hasher.update(&prev);
        }
        hasher.update(payload);
        *hasher.finalize().as_bytes()
    }
}

/// Errors from chain verification.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ChainError {
    #[error("first link has a previous hash (should be None)")]
    GenesisHasPrevHash,

    #[error("broken link at index {index}: prev_hash does not match")]
    BrokenLink { index: usize },

    #[error("missing prev_hash at index {index}")]
    MissingPrevHash { index: usize },

    #[error("hash mismatch at index {index}: computed hash differs from stored")]
    HashMismatch { index: usize },
}
