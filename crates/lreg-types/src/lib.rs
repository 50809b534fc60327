//! Foundation types for the ledger registry.
//!
//! Every other `lreg` crate depends on `lreg-types`. The types here carry no
//! behavior beyond construction, encoding and ordering; authorization and
//! state transitions live in `lreg-registry`.
//!
//! # Key Types
//!
//! - [`Identity`] — Opaque principal reference used for authorization checks
//! - [`ContentHash`] — Fixed-width digest of off-chain content (the ledger key)
//! - [`OrganizationId`] — Caller-supplied classification tag for an entry
//! - [`Timestamp`] — Registration time in seconds since the UNIX epoch
//! - [`RegistryAddress`] — Handle of a registry instance, produced at creation

pub mod address;
pub mod error;
pub mod hash;
pub mod identity;
pub mod organization;
pub mod temporal;

pub use address::RegistryAddress;
pub use error::TypeError;
pub use hash::ContentHash;
pub use identity::{Identity, IdentityMaterial};
pub use organization::OrganizationId;
pub use temporal::Timestamp;
