//! Error types for the resource store.

/// Errors that can occur when working with the resource store.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    /// Database error
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Access filter serialization error
    #[error("invalid access filters: {0}")]
    AccessFilters(#[from] serde_json::Error),

    /// The null resource, an unknown id, or a record whose file is gone
    #[error("resource not found: {0}")]
    NotFound(i64),

    /// The resource outlived its duration
    #[error("resource {id} expired {overdue_secs} seconds ago")]
    Expired { id: i64, overdue_secs: i64 },
}

/// Result type alias for resource store operations.
pub type Result<T> = std::result::Result<T, ResourceError>;
