//! Event journal for the ledger registry.
//!
//! Every successful registry mutation appends exactly one [`RegistryEvent`]
//! to an [`EventJournal`]. Events are sequence-numbered and hash-linked, so
//! the journal is tamper-evident, and they are fanned out to filtered
//! broadcast subscribers so external systems can react to new
//! registrations.
//!
//! The journal does no locking of its own. It is owned by the registry and
//! mutated inside the same critical section as the table it describes.

pub mod error;
pub mod event;
pub mod journal;

pub use error::JournalError;
pub use event::{EventCategory, EventKind, RegistryEvent};
pub use journal::{verify_events, EventFilter, EventJournal, EventStream};
