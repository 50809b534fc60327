use std::fmt;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{decode_32, TypeError};

/// Material used to derive an [`Identity`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityMaterial {
    /// An account public key (32 bytes).
    PublicKey([u8; 32]),
    /// A human-assigned principal name, e.g. a service account label.
    Named(String),
    /// Raw seed bytes.
    Seed([u8; 32]),
}

/// Opaque principal reference.
///
/// An `Identity` stands for the caller of a registry operation, the way an
/// account address does on a chain. It is derived deterministically from
/// [`IdentityMaterial`] using BLAKE3, so the same material always yields the
/// same identity. The registry never creates or destroys identities; it only
/// compares them.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Identity {
    hash: [u8; 32],
}

impl Identity {
    /// Derive an `Identity` from identity material.
    pub fn derive(material: &IdentityMaterial) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lreg-identity-v1:");
        match material {
            IdentityMaterial::PublicKey(pk) => {
                hasher.update(b"pubkey:");
                hasher.update(pk);
            }
            IdentityMaterial::Named(name) => {
                hasher.update(b"named:");
                hasher.update(name.as_bytes());
            }
            IdentityMaterial::Seed(seed) => {
                hasher.update(b"seed:");
                hasher.update(seed);
            }
        }
        Self {
            hash: *hasher.finalize().as_bytes(),
        }
    }

    /// Shorthand for `derive(&IdentityMaterial::Named(name))`.
    pub fn named(name: &str) -> Self {
        Self::derive(&IdentityMaterial::Named(name.to_string()))
    }

    /// Create an ephemeral (random) identity for tests and demos.
    pub fn ephemeral() -> Self {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        Self::derive(&IdentityMaterial::Seed(bytes))
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.hash
    }

    /// Full hex-encoded string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// Short identifier (first 8 hex characters).
    pub fn short_id(&self) -> String {
        format!("id:{}", hex::encode(&self.hash[..4]))
    }

    /// Parse from a hex string (64 hex characters, optional `id:` or `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let s = s.strip_prefix("id:").unwrap_or(s);
        decode_32(s).map(|hash| Self { hash })
    }

    /// Create from a raw 32-byte hash. Use `derive()` for production code.
    pub fn from_raw(hash: [u8; 32]) -> Self {
        Self { hash }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.short_id())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_id())
    }
}
