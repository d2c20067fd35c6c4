use crate::clients::StoreClient;
use crate::convert::SyncIdentityProviderConverter;
use crate::lifecycle::config::SystemConfig;
use crate::model::backing;
use crate::store::BackingStore;
use proxy_framework::ResourceProxy;
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The public `SyncIdentityProvider` API served from the in-memory store.
pub type SyncIdentityProviderProxy =
    ResourceProxy<SyncIdentityProviderConverter, StoreClient<backing::SyncIdentityProvider>>;

#[derive(Error, Debug)]
pub enum SystemError {
    #[error("Store task failed: {0}")]
    StoreTask(#[from] tokio::task::JoinError),
}

/// A running store plus the proxy in front of it.
///
/// ```ignore
/// let system = ProxySystem::new(&SystemConfig::default());
/// let ctx = RequestContext::with_namespace("team-a");
/// let created = system.proxy.create(&ctx, &idp, &CreateOptions::default()).await?;
/// system.shutdown().await?;
/// ```
pub struct ProxySystem {
    /// The public CRUD contract.
    pub proxy: SyncIdentityProviderProxy,

    /// Direct access to the stored schema, for the controller side of the kind (status
    /// writes, stored-only fields).
    pub store: StoreClient<backing::SyncIdentityProvider>,

    handle: JoinHandle<()>,
}

impl ProxySystem {
    /// Spawns the store actor and wires a proxy to it. Must be called inside a Tokio runtime.
    pub fn new(config: &SystemConfig) -> Self {
        let (store, store_client) = BackingStore::new(config.store_buffer);
        let handle = tokio::spawn(store.run());
        let proxy = ResourceProxy::new(SyncIdentityProviderConverter, store_client.clone());

        info!(store_buffer = config.store_buffer, "Proxy system started");
        Self {
            proxy,
            store: store_client,
            handle,
        }
    }

    /// Stops the store task and waits for it. Clients obtained from `store` that are still
    /// alive do not hold the store open; their later calls fail with `Internal`.
    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down proxy system...");

        if let Err(e) = self.store.shutdown().await {
            warn!(error = %e, "Store did not acknowledge shutdown");
        }
        drop(self.proxy);
        drop(self.store);

        if let Err(e) = self.handle.await {
            error!("Store task failed: {:?}", e);
            return Err(e.into());
        }

        info!("Proxy system shutdown complete.");
        Ok(())
    }
}
