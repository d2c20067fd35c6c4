//! # Backing Clients
//!
//! The proxy reaches the authoritative store only through these traits. A
//! [`BackingClient`] hands out clients bound to one namespace; every call on a
//! [`NamespacedClient`] is one round-trip and reports failures with the shared
//! [`ApiError`] taxonomy.

use crate::error::ApiError;
use crate::options::{BackingListOptions, DeleteOptions, GetOptions};
use crate::resource::{BackingObject, ObjectList};
use async_trait::async_trait;

/// Factory for namespace-bound clients of one backing kind.
pub trait BackingClient<B: BackingObject>: Send + Sync {
    type Namespaced: NamespacedClient<B>;

    fn namespaced(&self, namespace: &str) -> Self::Namespaced;
}

/// CRUD round-trips against one namespace of the backing store.
#[async_trait]
pub trait NamespacedClient<B: BackingObject>: Send + Sync {
    async fn get(&self, name: &str, options: &GetOptions) -> Result<B, ApiError>;

    async fn list(&self, options: &BackingListOptions) -> Result<ObjectList<B>, ApiError>;

    async fn create(&self, object: B) -> Result<B, ApiError>;

    /// Writes everything except status.
    async fn update(&self, object: B) -> Result<B, ApiError>;

    /// Writes only the status sub-resource.
    async fn update_status(&self, object: B) -> Result<B, ApiError>;

    async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<(), ApiError>;
}
