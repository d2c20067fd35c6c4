//! The stored (`hive.openshift.io/v1`) schema of `SyncIdentityProvider`.

use super::common::{IdentityProviderConfig, IdentityProviderStatus};
use proxy_framework::{BackingObject, ObjectMeta, Resource};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MappingMethod {
    #[default]
    Claim,
    Lookup,
    Add,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityProvider {
    pub name: String,
    #[serde(default)]
    pub mapping_method: MappingMethod,
    #[serde(flatten)]
    pub provider: IdentityProviderConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalObjectReference {
    pub name: String,
}

/// How the syncing controller applies providers to target clusters. Stored only; the
/// public schema has no counterpart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApplyBehavior {
    #[default]
    Apply,
    CreateOnly,
    CreateOrUpdate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncIdentityProviderSpec {
    #[serde(default)]
    pub identity_providers: Vec<IdentityProvider>,
    #[serde(default)]
    pub cluster_deployment_refs: Vec<LocalObjectReference>,
    #[serde(default)]
    pub apply_behavior: ApplyBehavior,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncIdentityProvider {
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: SyncIdentityProviderSpec,
    #[serde(default)]
    pub status: IdentityProviderStatus,
}

/// A stored `SyncIdentityProvider` without its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecView {
    pub metadata: ObjectMeta,
    pub spec: SyncIdentityProviderSpec,
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

impl BackingObject for SyncIdentityProvider {
    type SpecView = SpecView;
    type StatusView = IdentityProviderStatus;

    fn into_views(self) -> (SpecView, IdentityProviderStatus) {
        let view = SpecView {
            metadata: self.metadata,
            spec: self.spec,
        };
        (view, self.status)
    }

    fn from_views(view: SpecView, status: IdentityProviderStatus) -> Self {
        Self {
            metadata: view.metadata,
            spec: view.spec,
            status,
        }
    }
}
