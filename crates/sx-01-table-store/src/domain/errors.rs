use thiserror::Error;

/// Table Store failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    #[error("Schema conflict on {table}: defined with {existing} keys, requested {requested}")]
    SchemaConflict {
        table: String,
        existing: usize,
        requested: usize,
    },

    #[error("Invalid key for {table}: {reason}")]
    InvalidKey { table: String, reason: String },

    #[error("Duplicate key in {table}: {keys:?}")]
    DuplicateKey { table: String, keys: Vec<String> },

    #[error("Row not found in {table}: {keys:?}")]
    NotFound { table: String, keys: Vec<String> },

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),
}

impl TableError {
    pub(crate) fn invalid_key(table: &str, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            table: table.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the error came from the host rather than from local checks.
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::StorageUnavailable(_))
    }
}

/// Failure reported by the host ledger.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct HostError(pub String);

impl From<HostError> for TableError {
    fn from(err: HostError) -> Self {
        TableError::StorageUnavailable(err.0)
    }
}
