//! # Resource Traits
//!
//! [`Resource`] is implemented by both shapes of a kind (public and backing).
//! [`BackingObject`] adds the spec/status split the update protocol relies on: a stored
//! object decomposes into a *spec view* (everything except status, metadata included)
//! and a *status view*, and recomposes from the two. Comparing views instead of zeroing
//! and restoring a field keeps the two update phases independent.

use crate::meta::{ListMeta, ObjectMeta};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// A named, namespaced object of one kind.
pub trait Resource: Clone + Debug + Default + Send + Sync + 'static {
    /// Lower-case plural used in logs and error messages (e.g. `syncidentityproviders`).
    const PLURAL: &'static str;

    fn metadata(&self) -> &ObjectMeta;

    fn metadata_mut(&mut self) -> &mut ObjectMeta;

    fn name(&self) -> &str {
        &self.metadata().name
    }
}

/// The stored shape of a kind, split into spec and status views.
///
/// Implementations must satisfy `from_views(o.clone().into_views()) == o`.
pub trait BackingObject: Resource + PartialEq {
    /// The object without its status.
    type SpecView: Clone + Debug + PartialEq + Send + Sync;

    /// The status sub-resource. `Default` is the empty status.
    type StatusView: Clone + Debug + Default + PartialEq + Send + Sync;

    fn into_views(self) -> (Self::SpecView, Self::StatusView);

    fn from_views(spec: Self::SpecView, status: Self::StatusView) -> Self;
}

/// A page of objects plus list-level metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectList<T> {
    pub metadata: ListMeta,
    pub items: Vec<T>,
}

impl<T> ObjectList<T> {
    pub fn new(metadata: ListMeta, items: Vec<T>) -> Self {
        Self { metadata, items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
