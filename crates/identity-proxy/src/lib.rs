//! # Identity Proxy
//!
//! Serves `SyncIdentityProvider` objects through
//! [`ResourceProxy`](proxy_framework::ResourceProxy) while storing them in a different
//! schema.
//!
//! - **[model]**: the public and the stored schema of the kind.
//! - **[convert]**: [`SyncIdentityProviderConverter`](convert::SyncIdentityProviderConverter).
//! - **[store]**: a versioned in-memory store run as an actor task.
//! - **[clients]**: [`StoreClient`](clients::StoreClient), the proxy's backing client.
//! - **[lifecycle]**: configuration, tracing and [`ProxySystem`](lifecycle::ProxySystem).

pub mod clients;
pub mod convert;
pub mod lifecycle;
pub mod model;
pub mod store;
