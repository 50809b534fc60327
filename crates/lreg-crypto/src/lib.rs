//! Cryptographic primitives for the ledger registry.
//!
//! Provides domain-separated BLAKE3 hashing of off-chain content and
//! hash-chain verification for the registry's event journal.
//!
//! All crypto operations wrap established libraries; there is no custom
//! cryptography here.

pub mod chain;
pub mod hasher;

pub use chain::{ChainError, ChainLink, HashChainVerifier};
pub use hasher::{ContentHasher, HasherError};
