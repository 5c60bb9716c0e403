//! # Codec
//!
//! Canonical JSON encoding of ledger records and query results.

use crate::domain::{Record, StoredRecord};
use crate::errors::ExchangeError;
use serde::Serialize;

/// Encode one record with its `recordType` tag.
pub fn encode<T: StoredRecord>(record: &T) -> Result<Vec<u8>, ExchangeError> {
    Ok(serde_json::to_vec(&record.clone().into_record())?)
}

/// Encode several records as a JSON array of tagged objects.
pub fn encode_all<T: StoredRecord>(records: &[T]) -> Result<Vec<u8>, ExchangeError> {
    let tagged: Vec<Record> = records.iter().cloned().map(T::into_record).collect();
    Ok(serde_json::to_vec(&tagged)?)
}

/// Encode an untagged response body such as `{"count": 3}`.
pub fn encode_value<V: Serialize>(value: &V) -> Result<Vec<u8>, ExchangeError> {
    Ok(serde_json::to_vec(value)?)
}

pub fn decode_record(bytes: &[u8]) -> Result<Record, ExchangeError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Decode a payload that must be a `T`.
pub fn decode<T: StoredRecord>(bytes: &[u8]) -> Result<T, ExchangeError> {
    let record = decode_record(bytes)?;
    let found = record.tag();
    T::from_record(record).ok_or_else(|| {
        ExchangeError::Codec(format!("expected {} record, found {found}", T::TAG))
    })
}

/// Decode every payload of a drained scan.
pub fn decode_all<T: StoredRecord>(payloads: &[Vec<u8>]) -> Result<Vec<T>, ExchangeError> {
    payloads.iter().map(|p| decode(p)).collect()
}
