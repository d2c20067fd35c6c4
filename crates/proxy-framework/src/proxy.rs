//! # Resource Proxy
//!
//! [`ResourceProxy`] serves the public CRUD contract of one kind while the objects live in
//! a backing store with a different schema. Every operation resolves a namespace-bound
//! backing client, converts on the way in and on the way out, and performs its
//! round-trips strictly in sequence. The proxy holds no per-object state between calls.
//!
//! ## The split update
//!
//! Spec and status of a stored object are written through different endpoints. An update
//! request is therefore applied in two phases against a fresh read:
//!
//! 1. **Spec phase**: the object minus its status is written with `update`, but only if it
//!    differs from what was read.
//! 2. **Status phase**: the status is written with `update_status`, but only if it differs
//!    from what was read. It carries the resource version returned by the spec phase.
//!
//! An unchanged object produces no writes at all. A failure in the status phase leaves the
//! spec phase applied; the caller retries from a fresh read.

use crate::client::{BackingClient, NamespacedClient};
use crate::context::RequestContext;
use crate::convert::Converter;
use crate::error::ApiError;
use crate::meta::Status;
use crate::options::{
    BackingListOptions, CreateOptions, DeleteOptions, GetOptions, ListOptions, UpdateOptions,
};
use crate::resource::{BackingObject, ObjectList, Resource};
use crate::update::UpdateTransform;
use tracing::{debug, info, warn};

/// Public CRUD front for one kind, backed by `K` and mapped by `C`.
pub struct ResourceProxy<C, K> {
    converter: C,
    client: K,
}

impl<C, K> ResourceProxy<C, K>
where
    C: Converter,
    K: BackingClient<C::Backing>,
{
    pub fn new(converter: C, client: K) -> Self {
        Self { converter, client }
    }

    fn resource() -> &'static str {
        <C::Public as Resource>::PLURAL
    }

    /// Objects of this kind only exist inside a namespace.
    pub fn namespace_scoped(&self) -> bool {
        true
    }

    pub fn new_object(&self) -> C::Public {
        C::Public::default()
    }

    pub fn new_list(&self) -> ObjectList<C::Public> {
        ObjectList::default()
    }

    fn namespaced_client(&self, ctx: &RequestContext) -> Result<K::Namespaced, ApiError> {
        let namespace = ctx.require_namespace()?;
        Ok(self.client.namespaced(namespace))
    }

    /// Lists objects in the request namespace.
    ///
    /// List metadata (continue token, resource version) is returned as the backing store
    /// reported it. One unconvertible item fails the whole call.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        options: &ListOptions,
    ) -> Result<ObjectList<C::Public>, ApiError> {
        info!(resource = Self::resource(), "list");
        let client = self.namespaced_client(ctx)?;
        let options = BackingListOptions::try_from(options)?;

        let list = client.list(&options).await?;
        let items = list
            .items
            .iter()
            .map(|item| self.converter.to_public(item))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ObjectList::new(list.metadata, items))
    }

    pub async fn get(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &GetOptions,
    ) -> Result<C::Public, ApiError> {
        info!(resource = Self::resource(), name, "get");
        let client = self.namespaced_client(ctx)?;

        let object = client.get(name, options).await?;
        Ok(self.converter.to_public(&object)?)
    }

    pub async fn create(
        &self,
        ctx: &RequestContext,
        object: &C::Public,
        _options: &CreateOptions,
    ) -> Result<C::Public, ApiError> {
        info!(resource = Self::resource(), name = object.name(), "create");
        let client = self.namespaced_client(ctx)?;

        let mut converted = C::Backing::default();
        self.converter.to_backing(object, &mut converted)?;

        let created = client.create(converted).await?;
        Ok(self.converter.to_public(&created)?)
    }

    /// Applies `transform` to the live object and writes the result back with the split
    /// spec/status protocol. Returns the final object and `false`: this path never creates,
    /// whatever `force_allow_create` says.
    pub async fn update<T>(
        &self,
        ctx: &RequestContext,
        name: &str,
        transform: &T,
        force_allow_create: bool,
        _options: &UpdateOptions,
    ) -> Result<(C::Public, bool), ApiError>
    where
        T: UpdateTransform<C::Public> + ?Sized,
    {
        let resource = Self::resource();
        info!(resource, name, "update");
        if force_allow_create {
            debug!(resource, name, "force_allow_create ignored");
        }
        let client = self.namespaced_client(ctx)?;

        let live = client.get(name, &GetOptions::default()).await?;
        let (orig_spec, orig_status) = live.clone().into_views();

        let old = self.converter.to_public(&live)?;
        let desired = transform.updated_object(ctx, &old).await?;

        let mut converted = live;
        self.converter.to_backing(&desired, &mut converted)?;
        let (new_spec, new_status) = converted.into_views();

        let spec = if new_spec != orig_spec {
            info!(resource, name, "forwarding regular update");
            let object = C::Backing::from_views(new_spec, Default::default());
            let updated = client.update(object).await.inspect_err(|e| {
                warn!(resource, name, error = %e, "regular update failed");
            })?;
            updated.into_views().0
        } else {
            new_spec
        };

        let mut working = C::Backing::from_views(spec, new_status.clone());
        if new_status != orig_status {
            info!(
                resource,
                name,
                resource_version = %working.metadata().resource_version,
                "forwarding status update"
            );
            working = client.update_status(working).await.inspect_err(|e| {
                warn!(resource, name, error = %e, "status update failed");
            })?;
        }

        Ok((self.converter.to_public(&working)?, false))
    }

    /// Deletes the named object. Deletion is immediate from the proxy's point of view.
    pub async fn delete(
        &self,
        ctx: &RequestContext,
        name: &str,
        options: &DeleteOptions,
    ) -> Result<(Status, bool), ApiError> {
        info!(resource = Self::resource(), name, "delete");
        let client = self.namespaced_client(ctx)?;

        client.delete(name, options).await?;
        Ok((Status::success(), true))
    }
}
