use crate::domain::{HostError, HostRows};

/// Host ledger surface. The Table Store calls exactly these operations.
///
/// Atomic commit of the writes issued during one request is the host's
/// responsibility.
pub trait LedgerHost: Send + Sync {
    // === Tables ===

    fn create_table(&self, name: &str, key_count: usize) -> Result<(), HostError>;

    fn delete_table(&self, name: &str) -> Result<(), HostError>;

    // === Rows ===

    fn get_row(&self, table: &str, keys: &[&str]) -> Result<Option<Vec<u8>>, HostError>;

    /// Rows whose leading key columns equal `prefix`.
    fn get_rows(&self, table: &str, prefix: &[&str]) -> Result<HostRows, HostError>;

    /// Returns `false` without writing if the key already exists.
    fn insert_row(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<bool, HostError>;

    /// Returns `false` without writing if the key does not exist.
    fn replace_row(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<bool, HostError>;

    fn delete_row(&self, table: &str, keys: &[&str]) -> Result<(), HostError>;

    // === Scalar state ===

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, HostError>;

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), HostError>;
}
