//! Publication of a freshly created registry's address.
//!
//! Once a registry exists, downstream systems need its address. This crate
//! writes that address, plus a provenance record describing the creation,
//! into an external key-value cache. The registry core never depends on
//! this crate and nothing here runs during registry operations.
//!
//! Failure to reach the cache is not fatal: the [`Publisher`] degrades to a
//! `KEY=VALUE` log line an operator can paste into downstream configuration.
//!
//! # Modules
//!
//! - [`error`] — Error types for cache and configuration failures
//! - [`types`] — [`DeploymentRecord`] and the [`CacheKeys`] layout
//! - [`traits`] — The [`KeyValueStore`] trait
//! - [`memory`] — In-memory [`InMemoryKvStore`] for tests
//! - [`file`] — [`FileKvStore`], a JSON file cache, and [`UnreachableKvStore`]
//! - [`config`] — [`PublishConfig`] loaded from TOML and the environment
//! - [`publisher`] — The [`Publisher`] itself

pub mod config;
pub mod error;
pub mod file;
pub mod memory;
pub mod publisher;
pub mod traits;
pub mod types;

pub use config::PublishConfig;
pub use error::{KvError, PublishError, Result};
pub use file::{FileKvStore, UnreachableKvStore};
pub use memory::InMemoryKvStore;
pub use publisher::{PublishOutcome, Publisher};
pub use traits::KeyValueStore;
pub use types::{CacheKeys, DeploymentRecord};
