//! # Proxy Framework
//!
//! Building blocks for serving one resource kind through a public CRUD contract while the
//! objects themselves live in a separate, versioned backing store with its own schema.
//!
//! ## Architecture Overview
//!
//! The framework separates concerns into three layers:
//!
//! 1. **Schema Layer** ([`Resource`], [`BackingObject`], [`Converter`]) - the two shapes of a
//!    kind and the mapping between them
//! 2. **Transport Layer** ([`BackingClient`], [`NamespacedClient`]) - round-trips to the store
//! 3. **Proxy Layer** ([`ResourceProxy`]) - list/get/create/update/delete orchestration
//!
//! The proxy is generic over the converter and the client, so a kind is wired by
//! implementing the schema traits once and handing the proxy a client.
//!
//! ## Update Semantics
//!
//! Spec and status are separate conflict domains in the backing store. An update is applied
//! against a fresh read, split into a spec write and a status write, and each write is
//! issued only when its half actually changed. See [`proxy`] for the full protocol.
//!
//! ```rust,ignore
//! let proxy = ResourceProxy::new(WidgetConverter, client);
//! let ctx = RequestContext::with_namespace("team-a");
//!
//! let (widget, created) = proxy
//!     .update(&ctx, "w1", &|old: &Widget| {
//!         let mut new = old.clone();
//!         new.spec.size = 3;
//!         Ok(new)
//!     }, false, &UpdateOptions::default())
//!     .await?;
//! assert!(!created);
//! ```
//!
//! ## Errors
//!
//! All operations return [`ApiError`]. The proxy raises `BadRequest` itself when a request
//! has no namespace; every other error comes from the backing client or the converter and
//! is passed through as-is.
//!
//! ## Testing
//!
//! [`mock::MockBackingClient`] records every backing call and replays queued responses, so
//! tests can assert exactly which writes an operation issued.

pub mod client;
pub mod context;
pub mod convert;
pub mod error;
pub mod meta;
pub mod mock;
pub mod options;
pub mod proxy;
pub mod resource;
pub mod update;

// Re-export core types for convenience
pub use client::{BackingClient, NamespacedClient};
pub use context::RequestContext;
pub use convert::Converter;
pub use error::{ApiError, ConversionError};
pub use meta::{ListMeta, ObjectMeta, Status, StatusKind};
pub use options::{
    BackingListOptions, CreateOptions, DeleteOptions, GetOptions, ListOptions, Requirement,
    Selector, UpdateOptions,
};
pub use proxy::ResourceProxy;
pub use resource::{BackingObject, ObjectList, Resource};
pub use update::{ReplaceObject, UpdateTransform};
