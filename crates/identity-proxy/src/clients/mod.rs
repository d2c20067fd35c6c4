//! Clients for the backing store.

pub mod store_client;

pub use store_client::{NamespacedStoreClient, StoreClient};
