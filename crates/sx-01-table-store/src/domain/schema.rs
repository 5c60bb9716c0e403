use super::TableError;
use std::collections::HashMap;

/// Declared shape of a table: `key_count` key columns plus a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSchema {
    pub key_count: usize,
}

impl TableSchema {
    /// Exact-key check used by insert, replace, delete and get.
    pub fn check_keys(&self, table: &str, keys: &[&str]) -> Result<(), TableError> {
        if keys.len() != self.key_count {
            return Err(TableError::invalid_key(
                table,
                format!("expected {} key columns, got {}", self.key_count, keys.len()),
            ));
        }
        check_columns(table, keys)
    }

    /// Partial-key check used by list. An empty prefix is a full scan.
    pub fn check_prefix(&self, table: &str, prefix: &[&str]) -> Result<(), TableError> {
        if prefix.len() > self.key_count {
            return Err(TableError::invalid_key(
                table,
                format!(
                    "prefix of {} columns exceeds {} key columns",
                    prefix.len(),
                    self.key_count
                ),
            ));
        }
        check_columns(table, prefix)
    }
}

fn check_columns(table: &str, keys: &[&str]) -> Result<(), TableError> {
    match keys.iter().position(|k| k.is_empty()) {
        Some(idx) => Err(TableError::invalid_key(
            table,
            format!("key column {idx} is empty"),
        )),
        None => Ok(()),
    }
}

/// Tables declared in this process.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    tables: HashMap<String, TableSchema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Result<TableSchema, TableError> {
        self.tables
            .get(name)
            .copied()
            .ok_or_else(|| TableError::UnknownTable(name.to_string()))
    }

    /// Returns `Ok(true)` if the table is new and must be created on the host.
    pub fn declare(&mut self, name: &str, key_count: usize) -> Result<bool, TableError> {
        if key_count == 0 {
            return Err(TableError::invalid_key(name, "a table needs at least one key column"));
        }
        match self.tables.get(name) {
            Some(existing) if existing.key_count == key_count => Ok(false),
            Some(existing) => Err(TableError::SchemaConflict {
                table: name.to_string(),
                existing: existing.key_count,
                requested: key_count,
            }),
            None => {
                self.tables
                    .insert(name.to_string(), TableSchema { key_count });
                Ok(true)
            }
        }
    }

    pub fn forget(&mut self, name: &str) -> Option<TableSchema> {
        self.tables.remove(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
