//! # Proxy Errors
//!
//! One error taxonomy shared by the proxy and every backing client. Backing-store errors
//! travel through the proxy unchanged, so a caller matching on [`ApiError::Conflict`]
//! sees exactly what the store reported.

/// Failure of a schema mapping in either direction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("conversion of {field} failed: {message}")]
pub struct ConversionError {
    pub field: String,
    pub message: String,
}

impl ConversionError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors returned by proxy operations and backing clients.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request itself is malformed. Raised by the proxy before any backing call.
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("{resource} {name:?} not found")]
    NotFound { resource: String, name: String },

    #[error("{resource} {name:?} already exists")]
    AlreadyExists { resource: String, name: String },

    /// Optimistic-concurrency failure; retry from a fresh read.
    #[error("operation on {resource} {name:?} conflicted: {message}")]
    Conflict {
        resource: String,
        name: String,
        message: String,
    },

    #[error("{resource} {name:?} is invalid: {message}")]
    Invalid {
        resource: String,
        name: String,
        message: String,
    },

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

impl ApiError {
    /// HTTP-style status code for this error.
    pub fn code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::NotFound { .. } => 404,
            ApiError::AlreadyExists { .. } | ApiError::Conflict { .. } => 409,
            ApiError::Invalid { .. } => 422,
            ApiError::Internal(_) | ApiError::Conversion(_) => 500,
        }
    }

    pub fn reason(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BadRequest",
            ApiError::NotFound { .. } => "NotFound",
            ApiError::AlreadyExists { .. } => "AlreadyExists",
            ApiError::Conflict { .. } => "Conflict",
            ApiError::Invalid { .. } => "Invalid",
            ApiError::Internal(_) => "InternalError",
            ApiError::Conversion(_) => "ConversionError",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, ApiError::Conflict { .. })
    }
}
