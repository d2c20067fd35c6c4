//! `BackingClient` implementation over the store actor's channel.

use crate::store::StoreRequest;
use async_trait::async_trait;
use proxy_framework::{
    ApiError, BackingClient, BackingListOptions, BackingObject, DeleteOptions, GetOptions,
    NamespacedClient, ObjectList,
};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, instrument};

fn store_closed<T>(_: T) -> ApiError {
    ApiError::Internal("backing store closed".to_string())
}

fn store_dropped<T>(_: T) -> ApiError {
    ApiError::Internal("backing store dropped response".to_string())
}

/// Handle to a running [`BackingStore`](crate::store::BackingStore). Cheap to clone; the
/// store shuts down once every clone has been dropped.
pub struct StoreClient<B: BackingObject> {
    sender: mpsc::Sender<StoreRequest<B>>,
}

impl<B: BackingObject> Clone for StoreClient<B> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<B: BackingObject> StoreClient<B> {
    pub fn new(sender: mpsc::Sender<StoreRequest<B>>) -> Self {
        Self { sender }
    }

    /// Asks the store to stop. Namespaced clients handed out earlier start failing with
    /// `Internal("backing store closed")`.
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Shutdown { respond_to })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }
}

impl<B: BackingObject> BackingClient<B> for StoreClient<B> {
    type Namespaced = NamespacedStoreClient<B>;

    fn namespaced(&self, namespace: &str) -> NamespacedStoreClient<B> {
        NamespacedStoreClient {
            sender: self.sender.clone(),
            namespace: namespace.to_string(),
        }
    }
}

/// A [`StoreClient`] bound to one namespace.
pub struct NamespacedStoreClient<B: BackingObject> {
    sender: mpsc::Sender<StoreRequest<B>>,
    namespace: String,
}

impl<B: BackingObject> NamespacedStoreClient<B> {
    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[async_trait]
impl<B: BackingObject> NamespacedClient<B> for NamespacedStoreClient<B> {
    #[instrument(skip(self, options), fields(namespace = %self.namespace))]
    async fn get(&self, name: &str, options: &GetOptions) -> Result<B, ApiError> {
        debug!(resource_version = %options.resource_version, "Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Get {
                namespace: self.namespace.clone(),
                name: name.to_string(),
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn list(&self, options: &BackingListOptions) -> Result<ObjectList<B>, ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::List {
                namespace: self.namespace.clone(),
                options: options.clone(),
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }

    #[instrument(skip(self, object), fields(namespace = %self.namespace, name = %object.name()))]
    async fn create(&self, object: B) -> Result<B, ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Create {
                namespace: self.namespace.clone(),
                object,
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }

    #[instrument(skip(self, object), fields(namespace = %self.namespace, name = %object.name()))]
    async fn update(&self, object: B) -> Result<B, ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Update {
                namespace: self.namespace.clone(),
                object,
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }

    #[instrument(skip(self, object), fields(namespace = %self.namespace, name = %object.name()))]
    async fn update_status(&self, object: B) -> Result<B, ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::UpdateStatus {
                namespace: self.namespace.clone(),
                object,
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }

    #[instrument(skip(self), fields(namespace = %self.namespace))]
    async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<(), ApiError> {
        debug!("Sending request");
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(StoreRequest::Delete {
                namespace: self.namespace.clone(),
                name: name.to_string(),
                options: options.clone(),
                respond_to,
            })
            .await
            .map_err(store_closed)?;
        response.await.map_err(store_dropped)?
    }
}
