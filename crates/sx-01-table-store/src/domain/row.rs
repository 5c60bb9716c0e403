use super::TableError;

/// One stored row: composite key columns and the opaque payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub keys: Vec<String>,
    pub payload: Vec<u8>,
}

impl Row {
    pub fn new(keys: Vec<String>, payload: Vec<u8>) -> Self {
        Self { keys, payload }
    }

    /// True if the leading key columns equal `prefix`.
    pub fn matches_prefix(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.keys.len()
            && self
                .keys
                .iter()
                .zip(prefix)
                .all(|(key, wanted)| key == wanted)
    }
}

/// Rows yielded by the host, in host iteration order.
pub type HostRows = Box<dyn Iterator<Item = Result<Row, super::HostError>> + Send>;

/// Finite, non-restartable sequence of rows returned by `list`.
///
/// Each item is fallible because a streaming host may fail mid-scan.
pub struct RowStream {
    table: String,
    inner: HostRows,
}

impl RowStream {
    pub fn new(table: impl Into<String>, inner: HostRows) -> Self {
        Self {
            table: table.into(),
            inner,
        }
    }

    /// Table the scan runs over.
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Drain the stream, stopping at the first host failure.
    pub fn collect_rows(self) -> Result<Vec<Row>, TableError> {
        self.collect()
    }

    /// Drain the stream into payloads only.
    pub fn payloads(self) -> Result<Vec<Vec<u8>>, TableError> {
        self.map(|row| row.map(|r| r.payload)).collect()
    }
}

impl Iterator for RowStream {
    type Item = Result<Row, TableError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|row| row.map_err(TableError::from))
    }
}

impl std::fmt::Debug for RowStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowStream")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
