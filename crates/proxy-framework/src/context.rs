//! Per-request context handed to every proxy operation.

use crate::error::ApiError;

/// Request-scoped values supplied by the caller's framework.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    namespace: Option<String>,
}

impl RequestContext {
    /// Context without a namespace (cluster-wide request).
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
        }
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref().filter(|ns| !ns.is_empty())
    }

    /// The namespace, or `BadRequest` when the request is not namespaced.
    pub fn require_namespace(&self) -> Result<&str, ApiError> {
        self.namespace()
            .ok_or_else(|| ApiError::BadRequest("namespace parameter required".to_string()))
    }
}
