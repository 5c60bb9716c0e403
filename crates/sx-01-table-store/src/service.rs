//! # Ledger-backed Table Store
//!
//! Implements [`TableStore`] over any [`LedgerHost`]. Schema and key-arity
//! checks run locally and fail before the host is touched. Host failures
//! surface verbatim as [`TableError::StorageUnavailable`].

use crate::domain::{RowStream, SchemaRegistry, TableError, TableSchema};
use crate::ports::{LedgerHost, TableStore};

use std::sync::{Arc, RwLock};
use tracing::{debug, instrument};

/// Table Store over a host ledger.
pub struct LedgerTableStore<H: LedgerHost> {
    host: Arc<H>,
    schemas: RwLock<SchemaRegistry>,
}

impl<H: LedgerHost> LedgerTableStore<H> {
    pub fn new(host: Arc<H>) -> Self {
        Self {
            host,
            schemas: RwLock::new(SchemaRegistry::new()),
        }
    }

    /// Underlying host handle.
    pub fn host(&self) -> &Arc<H> {
        &self.host
    }

    fn schema(&self, table: &str) -> Result<TableSchema, TableError> {
        self.schemas
            .read()
            .map_err(|_| TableError::StorageUnavailable("schema registry lock poisoned".into()))?
            .get(table)
    }

    fn checked_keys(&self, table: &str, keys: &[&str]) -> Result<(), TableError> {
        self.schema(table)?.check_keys(table, keys)
    }
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

impl<H: LedgerHost> TableStore for LedgerTableStore<H> {
    #[instrument(skip(self))]
    fn define_table(&self, name: &str, key_count: usize) -> Result<(), TableError> {
        let mut schemas = self
            .schemas
            .write()
            .map_err(|_| TableError::StorageUnavailable("schema registry lock poisoned".into()))?;

        if !schemas.declare(name, key_count)? {
            return Ok(());
        }
        if let Err(err) = self.host.create_table(name, key_count) {
            schemas.forget(name);
            return Err(err.into());
        }
        debug!(table = name, key_count, "Table defined");
        Ok(())
    }

    fn drop_table(&self, name: &str) -> Result<(), TableError> {
        let mut schemas = self
            .schemas
            .write()
            .map_err(|_| TableError::StorageUnavailable("schema registry lock poisoned".into()))?;
        schemas.get(name)?;
        self.host.delete_table(name)?;
        schemas.forget(name);
        debug!(table = name, "Table dropped");
        Ok(())
    }

    fn key_count(&self, name: &str) -> Result<usize, TableError> {
        Ok(self.schema(name)?.key_count)
    }

    fn insert(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<(), TableError> {
        self.checked_keys(table, keys)?;
        if !self.host.insert_row(table, keys, payload)? {
            return Err(TableError::DuplicateKey {
                table: table.to_string(),
                keys: owned(keys),
            });
        }
        debug!(table, ?keys, bytes = payload.len(), "Row inserted");
        Ok(())
    }

    fn replace(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<(), TableError> {
        self.checked_keys(table, keys)?;
        if !self.host.replace_row(table, keys, payload)? {
            return Err(TableError::NotFound {
                table: table.to_string(),
                keys: owned(keys),
            });
        }
        debug!(table, ?keys, bytes = payload.len(), "Row replaced");
        Ok(())
    }

    fn delete(&self, table: &str, keys: &[&str]) -> Result<(), TableError> {
        self.checked_keys(table, keys)?;
        self.host.delete_row(table, keys)?;
        debug!(table, ?keys, "Row deleted");
        Ok(())
    }

    fn get(&self, table: &str, keys: &[&str]) -> Result<Vec<u8>, TableError> {
        self.checked_keys(table, keys)?;
        self.host
            .get_row(table, keys)?
            .ok_or_else(|| TableError::NotFound {
                table: table.to_string(),
                keys: owned(keys),
            })
    }

    fn list(&self, table: &str, prefix: &[&str]) -> Result<RowStream, TableError> {
        self.schema(table)?.check_prefix(table, prefix)?;
        let rows = self.host.get_rows(table, prefix)?;
        debug!(table, ?prefix, "Row scan opened");
        Ok(RowStream::new(table, rows))
    }

    fn read_state(&self, key: &str) -> Result<Option<Vec<u8>>, TableError> {
        Ok(self.host.get_state(key)?)
    }

    fn write_state(&self, key: &str, value: &[u8]) -> Result<(), TableError> {
        self.host.put_state(key, value)?;
        debug!(key, "State written");
        Ok(())
    }
}
