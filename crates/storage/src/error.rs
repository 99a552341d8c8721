use thiserror::Error;

/// Errors that can occur when interacting with a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A record with the same identity already exists.
    #[error("{entity} already exists: {id}")]
    Duplicate { entity: &'static str, id: String },

    /// A record the operation requires is missing.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The backend reported a failure that is not tied to a single record.
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl StorageError {
    /// Convenience constructor for [`StorageError::Duplicate`].
    pub fn duplicate(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::Duplicate {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`StorageError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        let err = StorageError::duplicate("Product", "SKU-001");
        assert_eq!(err.to_string(), "Product already exists: SKU-001");

        let err = StorageError::not_found("Customer", "c1");
        assert_eq!(err.to_string(), "Customer not found: c1");
    }
}
