use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{decode_32, TypeError};
use crate::identity::Identity;

/// Handle of a registry instance.
///
/// Produced exactly once, when the registry is created, from the creator's
/// identity and a creator-local nonce. This is the one fact the registry
/// hands to the publication step.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegistryAddress([u8; 32]);

impl RegistryAddress {
    /// Derive the address of the `nonce`-th registry created by `creator`.
    pub fn derive(creator: &Identity, nonce: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(b"lreg-registry-address-v1:");
        hasher.update(creator.as_bytes());
        hasher.update(&nonce.to_le_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// The raw 32-byte handle.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// `0x`-prefixed hex form, as published to downstream systems.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// Parse from hex, with or without the `0x` prefix.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        decode_32(s).map(Self)
    }
}

impl fmt::Debug for RegistryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RegistryAddress(0x{})", hex::encode(&self.0[..4]))
    }
}

impl fmt::Display for RegistryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_depends_on_creator_and_nonce() {
        let alice = Identity::named("alice");
        let bob = Identity::named("bob");
        assert_eq!(RegistryAddress::derive(&alice, 0), RegistryAddress::derive(&alice, 0));
        assert_ne!(RegistryAddress::derive(&alice, 0), RegistryAddress::derive(&alice, 1));
        assert_ne!(RegistryAddress::derive(&alice, 0), RegistryAddress::derive(&bob, 0));
    }

    #[test]
    fn hex_is_prefixed_and_parses_back() {
        let addr = RegistryAddress::derive(&Identity::named("deployer"), 3);
        let hex = addr.to_hex();
        assert!(hex.starts_with("0x"));
        assert_eq!(hex.len(), 66);
        assert_eq!(RegistryAddress::from_hex(&hex).unwrap(), addr);
    }
}
