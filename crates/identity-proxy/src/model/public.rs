//! The served (`hive.openshift.io` internal) schema of `SyncIdentityProvider`.
//!
//! Differs from the stored schema in two places: mapping methods are free-form strings,
//! and target clusters are listed by name instead of by object reference.

use super::common::{IdentityProviderConfig, IdentityProviderStatus};
use proxy_framework::{ObjectMeta, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub name: String,
    pub mapping_method: String,
    #[serde(flatten)]
    pub provider: IdentityProviderConfig,
}

impl IdentityProvider {
    /// A provider using the `claim` mapping method.
    pub fn new(name: impl Into<String>, provider: IdentityProviderConfig) -> Self {
        Self {
            name: name.into(),
            mapping_method: "claim".to_string(),
            provider,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncIdentityProviderSpec {
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
    #[serde(default)]
    pub cluster_deployments: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncIdentityProvider {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SyncIdentityProviderSpec,
    #[serde(default)]
    pub status: IdentityProviderStatus,
}

impl SyncIdentityProvider {
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            metadata: ObjectMeta::named(namespace, name),
            ..Default::default()
        }
    }
}

impl Resource for SyncIdentityProvider {
    const PLURAL: &'static str = "syncidentityproviders";

    fn metadata(&self) -> &ObjectMeta {
        &self.metadata
    }

    fn metadata_mut(&mut self) -> &mut ObjectMeta {
        &mut self.metadata
    }
}
