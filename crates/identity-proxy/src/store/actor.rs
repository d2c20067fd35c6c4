//! # Backing Store Actor
//!
//! `BackingStore` owns every stored object of one kind and processes requests one at a
//! time from its channel, so the revision counter and the object map need no locking.
//!
//! ## Versioning
//!
//! A single store-wide revision counter is bumped by every successful write, and the new
//! value becomes the written object's `resource_version`. Writes that carry a non-empty
//! `resource_version` must match the stored value or fail with `Conflict`. Writes that
//! change nothing are acknowledged without a bump.
//!
//! ## Spec and status
//!
//! * **Update** writes the spec view (metadata included) and keeps the stored status.
//!   `generation` is bumped only when something other than labels/annotations changed.
//! * **UpdateStatus** writes the status view and keeps the stored spec view.
//! * **Create** resets status to empty, assigns a uid and starts `generation` at 1.
//!
//! ## Shutdown
//!
//! The loop ends when every client is dropped or on an explicit `Shutdown` request. The
//! latter does not wait for outstanding clients.

use crate::clients::StoreClient;
use crate::store::message::StoreRequest;
use proxy_framework::{
    ApiError, BackingListOptions, BackingObject, DeleteOptions, ListMeta, ObjectList, Selector,
};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const FIELD_NAME: &str = "metadata.name";
const FIELD_NAMESPACE: &str = "metadata.namespace";

type ObjectKey = (String, String);

/// In-memory, versioned store for one backing kind.
pub struct BackingStore<B: BackingObject> {
    receiver: mpsc::Receiver<StoreRequest<B>>,
    objects: BTreeMap<ObjectKey, B>,
    revision: u64,
}

impl<B: BackingObject> BackingStore<B> {
    /// Creates the store and a client sharing its channel. `buffer_size` bounds the number
    /// of queued requests; senders wait when it is full.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<B>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let store = Self {
            receiver,
            objects: BTreeMap::new(),
            revision: 0,
        };
        (store, StoreClient::new(sender))
    }

    /// Processes requests until a `Shutdown` request arrives or every client has been dropped.
    pub async fn run(mut self) {
        let resource = B::PLURAL;
        info!(resource, "Store started");

        while let Some(request) = self.receiver.recv().await {
            match request {
                StoreRequest::Get {
                    namespace,
                    name,
                    respond_to,
                } => {
                    let result = self.get(&namespace, &name);
                    debug!(resource, %namespace, %name, found = result.is_ok(), "Get");
                    let _ = respond_to.send(result);
                }
                StoreRequest::List {
                    namespace,
                    options,
                    respond_to,
                } => {
                    let result = self.list(&namespace, &options);
                    match &result {
                        Ok(list) => debug!(resource, %namespace, items = list.len(), "List"),
                        Err(e) => warn!(resource, %namespace, error = %e, "List failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Create {
                    namespace,
                    object,
                    respond_to,
                } => {
                    let result = self.create(&namespace, object);
                    match &result {
                        Ok(created) => info!(
                            resource,
                            %namespace,
                            name = created.name(),
                            resource_version = %created.metadata().resource_version,
                            size = self.objects.len(),
                            "Created"
                        ),
                        Err(e) => warn!(resource, %namespace, error = %e, "Create failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Update {
                    namespace,
                    object,
                    respond_to,
                } => {
                    let result = self.update(&namespace, object);
                    match &result {
                        Ok(updated) => info!(
                            resource,
                            %namespace,
                            name = updated.name(),
                            resource_version = %updated.metadata().resource_version,
                            generation = updated.metadata().generation,
                            "Updated"
                        ),
                        Err(e) => warn!(resource, %namespace, error = %e, "Update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::UpdateStatus {
                    namespace,
                    object,
                    respond_to,
                } => {
                    let result = self.update_status(&namespace, object);
                    match &result {
                        Ok(updated) => info!(
                            resource,
                            %namespace,
                            name = updated.name(),
                            resource_version = %updated.metadata().resource_version,
                            "Status updated"
                        ),
                        Err(e) => warn!(resource, %namespace, error = %e, "Status update failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Delete {
                    namespace,
                    name,
                    options,
                    respond_to,
                } => {
                    let result = self.delete(&namespace, &name, &options);
                    match &result {
                        Ok(()) => info!(resource, %namespace, %name, size = self.objects.len(), "Deleted"),
                        Err(e) => warn!(resource, %namespace, %name, error = %e, "Delete failed"),
                    }
                    let _ = respond_to.send(result);
                }
                StoreRequest::Shutdown { respond_to } => {
                    info!(resource, "Shutdown requested");
                    self.receiver.close();
                    let _ = respond_to.send(Ok(()));
                    break;
                }
            }
        }

        info!(resource, size = self.objects.len(), "Shutdown");
    }

    fn next_revision(&mut self) -> String {
        self.revision += 1;
        self.revision.to_string()
    }

    fn not_found(name: &str) -> ApiError {
        ApiError::NotFound {
            resource: B::PLURAL.to_string(),
            name: name.to_string(),
        }
    }

    fn stale(name: &str, expected: &str, actual: &str) -> ApiError {
        ApiError::Conflict {
            resource: B::PLURAL.to_string(),
            name: name.to_string(),
            message: format!(
                "resource version {expected} is stale (current {actual}); \
                 the object has been modified"
            ),
        }
    }

    fn current(&self, namespace: &str, name: &str) -> Result<&B, ApiError> {
        self.objects
            .get(&(namespace.to_string(), name.to_string()))
            .ok_or_else(|| Self::not_found(name))
    }

    fn check_resource_version(current: &B, incoming: &B) -> Result<(), ApiError> {
        let expected = &incoming.metadata().resource_version;
        let actual = &current.metadata().resource_version;
        if !expected.is_empty() && expected != actual {
            return Err(Self::stale(current.name(), expected, actual));
        }
        Ok(())
    }

    fn get(&self, namespace: &str, name: &str) -> Result<B, ApiError> {
        self.current(namespace, name).cloned()
    }

    fn list(
        &self,
        namespace: &str,
        options: &BackingListOptions,
    ) -> Result<ObjectList<B>, ApiError> {
        let labels = Selector::parse(&options.label_selector)?;
        let fields = Selector::parse(&options.field_selector)?;
        if let Some(unsupported) = fields
            .requirements()
            .iter()
            .find(|r| r.key != FIELD_NAME && r.key != FIELD_NAMESPACE)
        {
            return Err(ApiError::BadRequest(format!(
                "field label not supported: {}",
                unsupported.key
            )));
        }

        // Keys are ordered by (namespace, name), so a namespace is one contiguous run.
        let matching: Vec<&B> = self
            .objects
            .iter()
            .filter(|((ns, _), _)| ns == namespace)
            .map(|(_, object)| object)
            .filter(|object| labels.matches(&object.metadata().labels))
            .filter(|object| {
                let mut values = BTreeMap::new();
                values.insert(FIELD_NAME.to_string(), object.name().to_string());
                values.insert(FIELD_NAMESPACE.to_string(), namespace.to_string());
                fields.matches(&values)
            })
            .filter(|object| {
                options.continue_token.is_empty() || object.name() > options.continue_token.as_str()
            })
            .collect();

        let page_size = match options.limit {
            0 => matching.len(),
            limit => usize::try_from(limit).unwrap_or(usize::MAX).min(matching.len()),
        };
        let items: Vec<B> = matching[..page_size].iter().map(|o| (*o).clone()).collect();
        let remaining = matching.len() - page_size;

        let mut metadata = ListMeta {
            resource_version: self.revision.to_string(),
            ..Default::default()
        };
        if remaining > 0 {
            if let Some(last) = items.last() {
                metadata.continue_token = last.name().to_string();
            }
            metadata.remaining_item_count = Some(remaining as u64);
        }
        Ok(ObjectList::new(metadata, items))
    }

    fn create(&mut self, namespace: &str, object: B) -> Result<B, ApiError> {
        let name = object.name().to_string();
        if name.is_empty() {
            return Err(ApiError::Invalid {
                resource: B::PLURAL.to_string(),
                name,
                message: "metadata.name is required".to_string(),
            });
        }
        let object_namespace = &object.metadata().namespace;
        if !object_namespace.is_empty() && object_namespace != namespace {
            return Err(ApiError::BadRequest(format!(
                "the namespace of the object ({object_namespace}) does not match the namespace \
                 of the request ({namespace})"
            )));
        }
        let key = (namespace.to_string(), name.clone());
        if self.objects.contains_key(&key) {
            return Err(ApiError::AlreadyExists {
                resource: B::PLURAL.to_string(),
                name,
            });
        }

        let (spec, _) = object.into_views();
        let mut created = B::from_views(spec, Default::default());
        let resource_version = self.next_revision();
        let meta = created.metadata_mut();
        meta.namespace = namespace.to_string();
        meta.uid = Uuid::new_v4().to_string();
        meta.resource_version = resource_version;
        meta.generation = 1;

        self.objects.insert(key, created.clone());
        Ok(created)
    }

    fn update(&mut self, namespace: &str, object: B) -> Result<B, ApiError> {
        let current = self.current(namespace, object.name())?.clone();
        Self::check_resource_version(&current, &object)?;

        let mut incoming = object;
        {
            let from = current.metadata();
            let meta = incoming.metadata_mut();
            meta.namespace = from.namespace.clone();
            meta.uid = from.uid.clone();
            meta.resource_version = from.resource_version.clone();
            meta.generation = from.generation;
        }
        let (incoming_spec, _) = incoming.into_views();
        let (current_spec, current_status) = current.clone().into_views();
        if incoming_spec == current_spec {
            debug!(resource = B::PLURAL, name = current.name(), "Update is a no-op");
            return Ok(current);
        }

        // Label and annotation edits do not count towards generation.
        let mut probe = B::from_views(incoming_spec.clone(), Default::default());
        probe.metadata_mut().labels = current.metadata().labels.clone();
        probe.metadata_mut().annotations = current.metadata().annotations.clone();
        let spec_changed = probe.into_views().0 != current_spec;

        let mut updated = B::from_views(incoming_spec, current_status);
        let resource_version = self.next_revision();
        let meta = updated.metadata_mut();
        meta.resource_version = resource_version;
        if spec_changed {
            meta.generation += 1;
        }

        let key = (namespace.to_string(), updated.name().to_string());
        self.objects.insert(key, updated.clone());
        Ok(updated)
    }

    fn update_status(&mut self, namespace: &str, object: B) -> Result<B, ApiError> {
        let current = self.current(namespace, object.name())?.clone();
        Self::check_resource_version(&current, &object)?;

        let (_, incoming_status) = object.into_views();
        let (current_spec, current_status) = current.clone().into_views();
        if incoming_status == current_status {
            debug!(resource = B::PLURAL, name = current.name(), "Status update is a no-op");
            return Ok(current);
        }

        let mut updated = B::from_views(current_spec, incoming_status);
        updated.metadata_mut().resource_version = self.next_revision();

        let key = (namespace.to_string(), updated.name().to_string());
        self.objects.insert(key, updated.clone());
        Ok(updated)
    }

    fn delete(&mut self, namespace: &str, name: &str, options: &DeleteOptions) -> Result<(), ApiError> {
        let current = self.current(namespace, name)?;

        if let Some(preconditions) = &options.preconditions {
            let meta = current.metadata();
            if let Some(uid) = &preconditions.uid {
                if uid != &meta.uid {
                    return Err(ApiError::Conflict {
                        resource: B::PLURAL.to_string(),
                        name: name.to_string(),
                        message: format!("precondition failed: uid {uid} does not match {}", meta.uid),
                    });
                }
            }
            if let Some(resource_version) = &preconditions.resource_version {
                if resource_version != &meta.resource_version {
                    return Err(Self::stale(name, resource_version, &meta.resource_version));
                }
            }
        }

        if !options.dry_run.is_empty() {
            debug!(resource = B::PLURAL, %namespace, %name, "Dry-run delete");
            return Ok(());
        }
        self.objects.remove(&(namespace.to_string(), name.to_string()));
        Ok(())
    }
}
