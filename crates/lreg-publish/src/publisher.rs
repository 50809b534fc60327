//! Hand-off of a new registry's address to the external cache.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use lreg_types::{Identity, RegistryAddress};

use crate::config::PublishConfig;
use crate::error::KvError;
use crate::traits::KeyValueStore;
use crate::types::{CacheKeys, DeploymentRecord};

/// What happened to a publication attempt.
#[derive(Debug)]
pub enum PublishOutcome {
    /// Both keys were written.
    Published {
        record: DeploymentRecord,
        address_key: String,
        info_key: String,
    },
    /// The cache could not be written; the operator must configure
    /// downstream systems by hand using `line`.
    Fallback {
        record: DeploymentRecord,
        /// `<NAMESPACE>_CONTRACT_ADDRESS=<address>`
        line: String,
        error: KvError,
    },
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, Self::Published { .. })
    }

    pub fn record(&self) -> &DeploymentRecord {
        match self {
            Self::Published { record, .. } | Self::Fallback { record, .. } => record,
        }
    }
}

/// Writes registry provenance into a [`KeyValueStore`].
pub struct Publisher<S> {
    store: S,
    keys: CacheKeys,
    network: String,
    max_attempts: u32,
    retry_delay: Duration,
}

impl<S: KeyValueStore> Publisher<S> {
    pub fn new(store: S, config: &PublishConfig) -> Self {
        Self {
            store,
            keys: CacheKeys::new(config.namespace.clone()),
            network: config.network.clone(),
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &CacheKeys {
        &self.keys
    }

    /// Publish `address`, created by `deployer`, stamped with the current time.
    pub fn publish(&self, address: &RegistryAddress, deployer: &Identity) -> PublishOutcome {
        self.publish_at(address, deployer, Utc::now())
    }

    /// Publish with an explicit creation time.
    ///
    /// Never fails: an unreachable cache produces [`PublishOutcome::Fallback`].
    pub fn publish_at(
        &self,
        address: &RegistryAddress,
        deployer: &Identity,
        deployed_at: DateTime<Utc>,
    ) -> PublishOutcome {
        let record = DeploymentRecord::new(address, deployer, &self.network, deployed_at);

        match self.write_keys(&record) {
            Ok(()) => {
                info!(
                    backend = %self.store.describe(),
                    key = %self.keys.address_key(),
                    %address,
                    "registry address published"
                );
                PublishOutcome::Published {
                    record,
                    address_key: self.keys.address_key(),
                    info_key: self.keys.info_key(),
                }
            }
            Err(error) => {
                let line = format!("{}={}", self.keys.env_var(), record.contract_address);
                warn!(
                    backend = %self.store.describe(),
                    %error,
                    "cache write failed, manual configuration needed"
                );
                PublishOutcome::Fallback {
                    record,
                    line,
                    error,
                }
            }
        }
    }

    fn write_keys(&self, record: &DeploymentRecord) -> Result<(), KvError> {
        let info =
            serde_json::to_string(record).map_err(|e| KvError::Serialization(e.to_string()))?;
        self.set_with_attempts(&self.keys.address_key(), &record.contract_address)?;
        self.set_with_attempts(&self.keys.info_key(), &info)?;
        Ok(())
    }

    fn set_with_attempts(&self, key: &str, value: &str) -> Result<(), KvError> {
        let mut attempt = 1;
        loop {
            match self.store.set(key, value) {
                Ok(()) => return Ok(()),
                Err(error) if error.is_transient() && attempt < self.max_attempts => {
                    warn!(key, attempt, %error, "cache write failed, retrying");
                    std::thread::sleep(self.retry_delay);
                    attempt += 1;
                }
                Err(error) => return Err(error),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::error::Result;
    use crate::file::UnreachableKvStore;
    use crate::memory::InMemoryKvStore;

    /// Fails the first `failures` writes, then delegates to memory.
    struct FlakyStore {
        failures: AtomicU32,
        transient: bool,
        inner: InMemoryKvStore,
    }

    impl FlakyStore {
        fn new(failures: u32, transient: bool) -> Self {
            Self {
                failures: AtomicU32::new(failures),
                transient,
                inner: InMemoryKvStore::new(),
            }
        }
    }

    fn fast() -> PublishConfig {
        PublishConfig {
            retry_delay_ms: 1,
            ..Default::default()
        }
    }

    impl KeyValueStore for FlakyStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<()> {
            let remaining = self.failures.load(Ordering::SeqCst);
            if remaining > 0 {
                self.failures.store(remaining - 1, Ordering::SeqCst);
                return Err(if self.transient {
                    KvError::Unreachable("flaky".into())
                } else {
                    KvError::NotConfigured
                });
            }
            self.inner.set(key, value)
        }

        fn describe(&self) -> String {
            "flaky".into()
        }
    }

    fn deployer() -> Identity {
        Identity::named("deployer")
    }

    #[test]
    fn publishes_both_keys() {
        let publisher = Publisher::new(InMemoryKvStore::new(), &PublishConfig::default());
        let address = RegistryAddress::derive(&deployer(), 0);

        let outcome = publisher.publish(&address, &deployer());
        assert!(outcome.is_published());

        let store = publisher.store();
        assert_eq!(
            store.get("blockchain:contract:address").unwrap(),
            Some(address.to_hex())
        );
        let info = store.get("blockchain:contract:info").unwrap().unwrap();
        let record: DeploymentRecord = serde_json::from_str(&info).unwrap();
        assert_eq!(&record, outcome.record());
        assert_eq!(record.network, "localhost");
    }

    #[test]
    fn unreachable_store_falls_back_to_env_line() {
        let publisher = Publisher::new(UnreachableKvStore::new("redis:6379"), &fast());
        let address = RegistryAddress::derive(&deployer(), 0);

        match publisher.publish(&address, &deployer()) {
            PublishOutcome::Fallback { line, error, .. } => {
                assert_eq!(line, format!("BLOCKCHAIN_CONTRACT_ADDRESS={}", address.to_hex()));
                assert!(matches!(error, KvError::Unreachable(_)));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn transient_failures_are_retried() {
        let publisher = Publisher::new(FlakyStore::new(2, true), &fast());
        let outcome = publisher.publish(&RegistryAddress::derive(&deployer(), 1), &deployer());
        assert!(outcome.is_published());
        assert_eq!(publisher.store().inner.len(), 2);
    }

    #[test]
    fn retries_are_bounded() {
        let publisher = Publisher::new(FlakyStore::new(3, true), &fast());
        let outcome = publisher.publish(&RegistryAddress::derive(&deployer(), 1), &deployer());
        assert!(!outcome.is_published());
        assert!(publisher.store().inner.is_empty());
    }

    #[test]
    fn permanent_failures_are_not_retried() {
        let publisher = Publisher::new(FlakyStore::new(3, false), &fast());
        let outcome = publisher.publish(&RegistryAddress::derive(&deployer(), 1), &deployer());
        assert!(!outcome.is_published());
        assert_eq!(publisher.store().failures.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn unconfigured_cache_falls_back_immediately() {
        let publisher = Publisher::new(
            UnreachableKvStore::not_configured(),
            &PublishConfig::default(),
        );
        match publisher.publish(&RegistryAddress::derive(&deployer(), 0), &deployer()) {
            PublishOutcome::Fallback { error, .. } => {
                assert!(matches!(error, KvError::NotConfigured));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[test]
    fn custom_namespace_changes_keys() {
        let config = PublishConfig {
            namespace: "vericerti".into(),
            ..Default::default()
        };
        let publisher = Publisher::new(InMemoryKvStore::new(), &config);
        publisher.publish(&RegistryAddress::derive(&deployer(), 0), &deployer());
        assert!(publisher
            .store()
            .get("vericerti:contract:address")
            .unwrap()
            .is_some());
    }
}
