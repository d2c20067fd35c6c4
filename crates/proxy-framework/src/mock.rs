//! # Mock Backing Client
//!
//! [`MockBackingClient`] stands in for a real backing store in tests. Queue the responses
//! you want with the `expect_*` builders, hand the mock to a
//! [`ResourceProxy`](crate::ResourceProxy), then assert on [`MockBackingClient::calls`].
//! Every call is recorded with the namespace and the payload it carried, which makes
//! write counts and write order directly observable.
//!
//! Expectations are consumed in order. A call that does not match the next expectation
//! panics, as does [`MockBackingClient::verify`] when expectations are left over.
//!
//! ```rust,ignore
//! let mock = MockBackingClient::<Widget>::new();
//! mock.expect_get("w1").return_ok(widget.clone());
//! mock.expect_update().return_ok(updated);
//!
//! let proxy = ResourceProxy::new(WidgetConverter, mock.clone());
//! proxy.update(&ctx, "w1", &transform, false, &UpdateOptions::default()).await?;
//!
//! assert_eq!(mock.writes().len(), 1);
//! mock.verify();
//! ```

use crate::client::{BackingClient, NamespacedClient};
use crate::error::ApiError;
use crate::options::{BackingListOptions, DeleteOptions, GetOptions};
use crate::resource::{BackingObject, ObjectList};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// A queued response.
enum Expectation<B> {
    Get {
        name: String,
        response: Result<B, ApiError>,
    },
    List {
        response: Result<ObjectList<B>, ApiError>,
    },
    Create {
        response: Result<B, ApiError>,
    },
    Update {
        response: Result<B, ApiError>,
    },
    UpdateStatus {
        response: Result<B, ApiError>,
    },
    Delete {
        name: String,
        response: Result<(), ApiError>,
    },
}

impl<B> Expectation<B> {
    fn label(&self) -> &'static str {
        match self {
            Expectation::Get { .. } => "get",
            Expectation::List { .. } => "list",
            Expectation::Create { .. } => "create",
            Expectation::Update { .. } => "update",
            Expectation::UpdateStatus { .. } => "update_status",
            Expectation::Delete { .. } => "delete",
        }
    }
}

/// A call received by the mock, in arrival order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call<B> {
    Get {
        namespace: String,
        name: String,
    },
    List {
        namespace: String,
        options: BackingListOptions,
    },
    Create {
        namespace: String,
        object: B,
    },
    Update {
        namespace: String,
        object: B,
    },
    UpdateStatus {
        namespace: String,
        object: B,
    },
    Delete {
        namespace: String,
        name: String,
        options: DeleteOptions,
    },
}

impl<B> Call<B> {
    /// Whether the call mutates the store.
    pub fn is_write(&self) -> bool {
        !matches!(self, Call::Get { .. } | Call::List { .. })
    }

    fn label(&self) -> &'static str {
        match self {
            Call::Get { .. } => "get",
            Call::List { .. } => "list",
            Call::Create { .. } => "create",
            Call::Update { .. } => "update",
            Call::UpdateStatus { .. } => "update_status",
            Call::Delete { .. } => "delete",
        }
    }
}

struct MockState<B> {
    expectations: VecDeque<Expectation<B>>,
    calls: Vec<Call<B>>,
}

/// Expectation-driven [`BackingClient`]. Clones share expectations and the call log.
pub struct MockBackingClient<B> {
    state: Arc<Mutex<MockState<B>>>,
}

impl<B> Clone for MockBackingClient<B> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
        }
    }
}

impl<B: BackingObject> Default for MockBackingClient<B> {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<B>(state: &Mutex<MockState<B>>) -> MutexGuard<'_, MockState<B>> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl<B: BackingObject> MockBackingClient<B> {
    /// Creates a mock with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                expectations: VecDeque::new(),
                calls: Vec::new(),
            })),
        }
    }

    fn builder<T>(
        &self,
        make: impl FnOnce(Result<T, ApiError>) -> Expectation<B> + Send + 'static,
    ) -> ExpectationBuilder<B, T> {
        ExpectationBuilder {
            state: self.state.clone(),
            make: Box::new(make),
        }
    }

    /// Expects a `get` of `name`.
    pub fn expect_get(&self, name: impl Into<String>) -> ExpectationBuilder<B, B> {
        let name = name.into();
        self.builder(move |response| Expectation::Get { name, response })
    }

    pub fn expect_list(&self) -> ExpectationBuilder<B, ObjectList<B>> {
        self.builder(|response| Expectation::List { response })
    }

    pub fn expect_create(&self) -> ExpectationBuilder<B, B> {
        self.builder(|response| Expectation::Create { response })
    }

    pub fn expect_update(&self) -> ExpectationBuilder<B, B> {
        self.builder(|response| Expectation::Update { response })
    }

    pub fn expect_update_status(&self) -> ExpectationBuilder<B, B> {
        self.builder(|response| Expectation::UpdateStatus { response })
    }

    /// Expects a `delete` of `name`.
    pub fn expect_delete(&self, name: impl Into<String>) -> ExpectationBuilder<B, ()> {
        let name = name.into();
        self.builder(move |response| Expectation::Delete { name, response })
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<Call<B>> {
        lock(&self.state).calls.clone()
    }

    /// Calls that mutate the store, in order.
    pub fn writes(&self) -> Vec<Call<B>> {
        self.calls().into_iter().filter(Call::is_write).collect()
    }

    /// Panics if any expectation was not consumed.
    pub fn verify(&self) {
        let state = lock(&self.state);
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
    }

    fn next(&self, call: Call<B>) -> Expectation<B> {
        let mut state = lock(&self.state);
        let label = call.label();
        state.calls.push(call);
        match state.expectations.pop_front() {
            Some(expectation) if expectation.label() == label => expectation,
            Some(expectation) => panic!(
                "Unexpected {label} request: expected {}",
                expectation.label()
            ),
            None => panic!("Unexpected {label} request: no expectations left"),
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<B, T> {
    state: Arc<Mutex<MockState<B>>>,
    make: Box<dyn FnOnce(Result<T, ApiError>) -> Expectation<B> + Send>,
}

impl<B, T> ExpectationBuilder<B, T> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: T) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ApiError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<T, ApiError>) {
        let expectation = (self.make)(response);
        lock(&self.state).expectations.push_back(expectation);
    }
}

impl<B: BackingObject> BackingClient<B> for MockBackingClient<B> {
    type Namespaced = MockNamespacedClient<B>;

    fn namespaced(&self, namespace: &str) -> Self::Namespaced {
        MockNamespacedClient {
            mock: self.clone(),
            namespace: namespace.to_string(),
        }
    }
}

/// Namespace-bound view of a [`MockBackingClient`].
pub struct MockNamespacedClient<B> {
    mock: MockBackingClient<B>,
    namespace: String,
}

#[async_trait]
impl<B: BackingObject> NamespacedClient<B> for MockNamespacedClient<B> {
    async fn get(&self, name: &str, _options: &GetOptions) -> Result<B, ApiError> {
        let call = Call::Get {
            namespace: self.namespace.clone(),
            name: name.to_string(),
        };
        match self.mock.next(call) {
            Expectation::Get {
                name: expected,
                response,
            } => {
                assert_eq!(name, expected, "get called with unexpected name");
                response
            }
            _ => unreachable!("expectation label checked in next()"),
        }
    }

    async fn list(&self, options: &BackingListOptions) -> Result<ObjectList<B>, ApiError> {
        let call = Call::List {
            namespace: self.namespace.clone(),
            options: options.clone(),
        };
        match self.mock.next(call) {
            Expectation::List { response } => response,
            _ => unreachable!("expectation label checked in next()"),
        }
    }

    async fn create(&self, object: B) -> Result<B, ApiError> {
        let call = Call::Create {
            namespace: self.namespace.clone(),
            object,
        };
        match self.mock.next(call) {
            Expectation::Create { response } => response,
            _ => unreachable!("expectation label checked in next()"),
        }
    }

    async fn update(&self, object: B) -> Result<B, ApiError> {
        let call = Call::Update {
            namespace: self.namespace.clone(),
            object,
        };
        match self.mock.next(call) {
            Expectation::Update { response } => response,
            _ => unreachable!("expectation label checked in next()"),
        }
    }

    async fn update_status(&self, object: B) -> Result<B, ApiError> {
        let call = Call::UpdateStatus {
            namespace: self.namespace.clone(),
            object,
        };
        match self.mock.next(call) {
            Expectation::UpdateStatus { response } => response,
            _ => unreachable!("expectation label checked in next()"),
        }
    }

    async fn delete(&self, name: &str, options: &DeleteOptions) -> Result<(), ApiError> {
        let call = Call::Delete {
            namespace: self.namespace.clone(),
            name: name.to_string(),
            options: options.clone(),
        };
        match self.mock.next(call) {
            Expectation::Delete {
                name: expected,
                response,
            } => {
                assert_eq!(name, expected, "delete called with unexpected name");
                response
            }
            _ => unreachable!("expectation label checked in next()"),
        }
    }
}
