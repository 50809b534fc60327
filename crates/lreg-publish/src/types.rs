//! The provenance record and the cache key layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lreg_types::{Identity, RegistryAddress};

/// Provenance of a registry creation, stored as JSON under the info key.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub contract_address: String,
    pub deployed_at: DateTime<Utc>,
    pub deployer: String,
    pub network: String,
}

impl DeploymentRecord {
    pub fn new(
        address: &RegistryAddress,
        deployer: &Identity,
        network: &str,
        deployed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contract_address: address.to_hex(),
            deployed_at,
            deployer: format!("0x{}", deployer.to_hex()),
            network: network.to_string(),
        }
    }
}

/// Key layout under a namespace: `<ns>:contract:address` and
/// `<ns>:contract:info`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheKeys {
    namespace: String,
}

impl CacheKeys {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn address_key(&self) -> String {
        format!("{}:contract:address", self.namespace)
    }

    pub fn info_key(&self) -> String {
        format!("{}:contract:info", self.namespace)
    }

    /// Environment variable name used in the manual-configuration fallback,
    /// e.g. `BLOCKCHAIN_CONTRACT_ADDRESS`.
    pub fn env_var(&self) -> String {
        let ns: String = self
            .namespace
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{ns}_CONTRACT_ADDRESS")
    }
}
