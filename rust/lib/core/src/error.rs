use quorum_sql::SQLError;
use thiserror::Error;

// ── Error codes ─────────────────────────────────────────────────────
//
// Stable, machine-readable identifiers. Callers match on these,
// never on the human-readable message string.

/// Stable error code constants.
pub mod error_code {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const MALFORMED_QUERY: &str = "MALFORMED_QUERY";
    pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const INTERNAL: &str = "INTERNAL";
}

// ── ServiceError ────────────────────────────────────────────────────

/// Unified error type for the mapping layer and the forum entities.
///
/// Absence is not an error: singular lookups return `Ok(None)`.
/// `NotFound` is reserved for callers that require a record to exist.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// A record the caller required does not exist.
    #[error("{0}")]
    NotFound(String),

    /// A dynamic finder or predicate that cannot be turned into a query.
    #[error("{0}")]
    MalformedQuery(String),

    /// Statement execution failed in the backing store.
    #[error("{0}")]
    Storage(String),

    /// A row could not be materialized into an entity.
    #[error("{0}")]
    Decode(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    /// Stable, machine-readable error code.
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::NotFound(_) => error_code::NOT_FOUND,
            ServiceError::MalformedQuery(_) => error_code::MALFORMED_QUERY,
            ServiceError::Storage(_) => error_code::STORAGE_ERROR,
            ServiceError::Decode(_) => error_code::DECODE_ERROR,
            ServiceError::Internal(_) => error_code::INTERNAL,
        }
    }
}

impl From<SQLError> for ServiceError {
    fn from(e: SQLError) -> Self {
        ServiceError::Storage(e.to_string())
    }
}
