//! # Update Transforms
//!
//! An update request does not carry a finished object. It carries a transform that the
//! proxy applies to the object it just read, so that preconditions are checked against
//! live state. Any `Fn(&P) -> Result<P, ApiError>` closure is a transform; [`ReplaceObject`]
//! is the transform behind a plain "replace with this body" request.

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::resource::Resource;
use async_trait::async_trait;

/// Produces the desired object from the current one.
#[async_trait]
pub trait UpdateTransform<P: Resource>: Send + Sync {
    async fn updated_object(&self, ctx: &RequestContext, old: &P) -> Result<P, ApiError>;
}

#[async_trait]
impl<P, F> UpdateTransform<P> for F
where
    P: Resource,
    F: Fn(&P) -> Result<P, ApiError> + Send + Sync,
{
    async fn updated_object(&self, _ctx: &RequestContext, old: &P) -> Result<P, ApiError> {
        self(old)
    }
}

/// Replaces the current object with a submitted one.
///
/// An empty resource version in the submitted object means "whatever is current". A
/// non-empty one must match the current object or the transform fails with `Conflict`.
#[derive(Debug, Clone)]
pub struct ReplaceObject<P> {
    object: P,
}

impl<P: Resource> ReplaceObject<P> {
    pub fn new(object: P) -> Self {
        Self { object }
    }
}

#[async_trait]
impl<P: Resource> UpdateTransform<P> for ReplaceObject<P> {
    async fn updated_object(&self, _ctx: &RequestContext, old: &P) -> Result<P, ApiError> {
        let current = old.metadata();
        let mut updated = self.object.clone();
        let submitted = updated.metadata_mut();

        if submitted.name.is_empty() {
            submitted.name = current.name.clone();
        } else if submitted.name != current.name {
            return Err(ApiError::BadRequest(format!(
                "the name of the object ({}) does not match the name on the URL ({})",
                submitted.name, current.name
            )));
        }

        if submitted.resource_version.is_empty() {
            submitted.resource_version = current.resource_version.clone();
        } else if submitted.resource_version != current.resource_version {
            return Err(ApiError::Conflict {
                resource: P::PLURAL.to_string(),
                name: current.name.clone(),
                message: "the object has been modified; please apply your changes to the latest version and try again".to_string(),
            });
        }

        if submitted.namespace.is_empty() {
            submitted.namespace = current.namespace.clone();
        }
        if submitted.uid.is_empty() {
            submitted.uid = current.uid.clone();
        }
        Ok(updated)
    }
}
