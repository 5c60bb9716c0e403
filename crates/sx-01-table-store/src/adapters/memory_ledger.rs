use crate::domain::{HostError, HostRows, Row};
use crate::ports::LedgerHost;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, RwLock};

struct MemTable {
    key_count: usize,
    /// Composite key -> (write sequence, payload).
    rows: HashMap<Vec<String>, (u64, Vec<u8>)>,
}

/// In-memory implementation of LedgerHost for testing.
///
/// Scans return rows in first-write order. Faults can be injected with
/// [`set_unavailable`](Self::set_unavailable) and
/// [`fail_writes_after`](Self::fail_writes_after).
pub struct InMemoryLedger {
    tables: RwLock<HashMap<String, MemTable>>,
    state: RwLock<HashMap<String, Vec<u8>>>,
    sequence: AtomicU64,
    calls: AtomicU64,
    unavailable: AtomicBool,
    write_budget: Mutex<Option<u64>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            state: RwLock::new(HashMap::new()),
            sequence: AtomicU64::new(0),
            calls: AtomicU64::new(0),
            unavailable: AtomicBool::new(false),
            write_budget: Mutex::new(None),
        }
    }

    /// Make every host call fail until cleared.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Allow `n` more writes, then fail every write. Reads keep working.
    pub fn fail_writes_after(&self, n: u64) {
        if let Ok(mut budget) = self.write_budget.lock() {
            *budget = Some(n);
        }
    }

    /// Remove any write budget.
    pub fn clear_faults(&self) {
        self.set_unavailable(false);
        if let Ok(mut budget) = self.write_budget.lock() {
            *budget = None;
        }
    }

    /// Number of host calls made so far, including failed ones.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of rows currently stored in `table`.
    pub fn row_count(&self, table: &str) -> usize {
        self.tables
            .read()
            .ok()
            .and_then(|tables| tables.get(table).map(|t| t.rows.len()))
            .unwrap_or(0)
    }

    fn enter(&self) -> Result<(), HostError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(HostError("ledger unavailable".into()));
        }
        Ok(())
    }

    fn enter_write(&self) -> Result<(), HostError> {
        self.enter()?;
        let mut budget = self
            .write_budget
            .lock()
            .map_err(|_| HostError("lock poisoned".into()))?;
        match budget.as_mut() {
            Some(0) => Err(HostError("ledger write failed".into())),
            Some(remaining) => {
                *remaining -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn next_sequence(&self) -> u64 {
        self.sequence.fetch_add(1, Ordering::SeqCst)
    }
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new()
    }
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}

fn missing_table(name: &str) -> HostError {
    HostError(format!("no such table: {name}"))
}

fn poisoned<T>(_: T) -> HostError {
    HostError("lock poisoned".into())
}

impl LedgerHost for InMemoryLedger {
    fn create_table(&self, name: &str, key_count: usize) -> Result<(), HostError> {
        self.enter_write()?;
        let mut tables = self.tables.write().map_err(poisoned)?;
        match tables.get(name) {
            Some(existing) if existing.key_count != key_count => Err(HostError(format!(
                "table {name} exists with {} key columns",
                existing.key_count
            ))),
            Some(_) => Ok(()),
            None => {
                tables.insert(
                    name.to_string(),
                    MemTable {
                        key_count,
                        rows: HashMap::new(),
                    },
                );
                Ok(())
            }
        }
    }

    fn delete_table(&self, name: &str) -> Result<(), HostError> {
        self.enter_write()?;
        let mut tables = self.tables.write().map_err(poisoned)?;
        tables.remove(name);
        Ok(())
    }

    fn get_row(&self, table: &str, keys: &[&str]) -> Result<Option<Vec<u8>>, HostError> {
        self.enter()?;
        let tables = self.tables.read().map_err(poisoned)?;
        let t = tables.get(table).ok_or_else(|| missing_table(table))?;
        Ok(t.rows.get(&owned(keys)).map(|(_, payload)| payload.clone()))
    }

    fn get_rows(&self, table: &str, prefix: &[&str]) -> Result<HostRows, HostError> {
        self.enter()?;
        let tables = self.tables.read().map_err(poisoned)?;
        let t = tables.get(table).ok_or_else(|| missing_table(table))?;

        let mut matched: Vec<(u64, Row)> = t
            .rows
            .iter()
            .map(|(keys, (seq, payload))| (*seq, Row::new(keys.clone(), payload.clone())))
            .filter(|(_, row)| row.matches_prefix(prefix))
            .collect();
        matched.sort_by_key(|(seq, _)| *seq);

        Ok(Box::new(matched.into_iter().map(|(_, row)| Ok(row))))
    }

    fn insert_row(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<bool, HostError> {
        self.enter_write()?;
        let seq = self.next_sequence();
        let mut tables = self.tables.write().map_err(poisoned)?;
        let t = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        let key = owned(keys);
        if t.rows.contains_key(&key) {
            return Ok(false);
        }
        t.rows.insert(key, (seq, payload.to_vec()));
        Ok(true)
    }

    fn replace_row(&self, table: &str, keys: &[&str], payload: &[u8]) -> Result<bool, HostError> {
        self.enter_write()?;
        let mut tables = self.tables.write().map_err(poisoned)?;
        let t = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        match t.rows.get_mut(&owned(keys)) {
            Some((_, existing)) => {
                *existing = payload.to_vec();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn delete_row(&self, table: &str, keys: &[&str]) -> Result<(), HostError> {
        self.enter_write()?;
        let mut tables = self.tables.write().map_err(poisoned)?;
        let t = tables.get_mut(table).ok_or_else(|| missing_table(table))?;
        t.rows.remove(&owned(keys));
        Ok(())
    }

    fn get_state(&self, key: &str) -> Result<Option<Vec<u8>>, HostError> {
        self.enter()?;
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.get(key).cloned())
    }

    fn put_state(&self, key: &str, value: &[u8]) -> Result<(), HostError> {
        self.enter_write()?;
        let mut state = self.state.write().map_err(poisoned)?;
        state.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
