use crate::domain::{RowStream, TableError};

/// Primary API for composite-key row storage
pub trait TableStore: Send + Sync {
    // === Schema ===

    /// Idempotent for an identical arity; `SchemaConflict` otherwise.
    fn define_table(&self, name: &str, key_count: usize) -> Result<(), TableError>;

    fn drop_table(&self, name: &str) -> Result<(), TableError>;

    /// Key arity of a declared table.
    fn key_count(&self, name: &str) -> Result<usize, TableError>;

    // === Writes ===

    /// `DuplicateKey` if the composite key exists.
    fn insert(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<(), TableError>;

    /// `NotFound` if the composite key is absent.
    fn replace(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<(), TableError>;

    /// Deleting an absent row succeeds.
    fn delete(&self, table: &str, keys: &[&str]) -> Result<(), TableError>;

    // === Reads ===

    fn get(&self, table: &str, keys: &[&str]) -> Result<Vec<u8>, TableError>;

    fn list(&self, table: &str, prefix: &[&str]) -> Result<RowStream, TableError>;

    // === Scalar state ===

    fn read_state(&self, key: &str) -> Result<Option<Vec<u8>>, TableError>;

    fn write_state(&self, key: &str, value: &[u8]) -> Result<(), TableError>;
}
