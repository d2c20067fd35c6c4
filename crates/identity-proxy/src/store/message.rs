//! Requests understood by the [`BackingStore`](super::BackingStore) actor.

use proxy_framework::{ApiError, BackingListOptions, BackingObject, DeleteOptions, ObjectList};
use tokio::sync::oneshot;

/// One-shot channel carrying the outcome of a store request.
pub type Response<T> = oneshot::Sender<Result<T, ApiError>>;

/// A single round-trip to the store. Every request is scoped to one namespace.
#[derive(Debug)]
pub enum StoreRequest<B: BackingObject> {
    Get {
        namespace: String,
        name: String,
        respond_to: Response<B>,
    },
    List {
        namespace: String,
        options: BackingListOptions,
        respond_to: Response<ObjectList<B>>,
    },
    Create {
        namespace: String,
        object: B,
        respond_to: Response<B>,
    },
    Update {
        namespace: String,
        object: B,
        respond_to: Response<B>,
    },
    UpdateStatus {
        namespace: String,
        object: B,
        respond_to: Response<B>,
    },
    Delete {
        namespace: String,
        name: String,
        options: DeleteOptions,
        respond_to: Response<()>,
    },
    /// Stops the store even while other clients are still alive. Requests sent afterwards
    /// fail with a closed channel.
    Shutdown { respond_to: Response<()> },
}
