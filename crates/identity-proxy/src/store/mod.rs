//! # Backing Store
//!
//! An in-memory stand-in for the authoritative store, run as an actor task. Callers never
//! touch [`BackingStore`] directly after spawning it; they go through
//! [`StoreClient`](crate::clients::StoreClient), which implements the proxy's
//! `BackingClient` contract over the store's channel.
//!
//! ```rust,ignore
//! let (store, client) = BackingStore::<SyncIdentityProvider>::new(32);
//! let handle = tokio::spawn(store.run());
//! let proxy = ResourceProxy::new(SyncIdentityProviderConverter, client);
//! ```

pub mod actor;
pub mod message;

pub use actor::BackingStore;
pub use message::{Response, StoreRequest};
