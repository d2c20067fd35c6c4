//! # System Lifecycle
//!
//! Wiring, configuration and observability for the identity proxy.
//!
//! [`ProxySystem`] spawns the [`BackingStore`](crate::store::BackingStore) actor and puts a
//! [`ResourceProxy`](proxy_framework::ResourceProxy) in front of it. Shutdown follows the
//! channel-closure pattern: dropping every [`StoreClient`](crate::clients::StoreClient)
//! ends the store's receive loop, and `shutdown` awaits the task so no request is lost.
//!
//! [`SystemConfig`] is read from TOML; [`setup_tracing`] installs a compact `fmt` subscriber
//! filtered by `RUST_LOG`, falling back to the configured filter.

pub mod config;
pub mod system;
pub mod tracing;

pub use self::config::{ConfigError, SystemConfig};
pub use self::system::{ProxySystem, SyncIdentityProviderProxy, SystemError};
pub use self::tracing::setup_tracing;
