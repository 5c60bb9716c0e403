//! # Error Types
//!
//! Every failure of the exchange, its taxonomy, and the uniform
//! `{"Error": ...}` payload returned to callers.

use crate::domain::ContractStatus;
use serde::{Deserialize, Serialize};
use shared_crypto::CryptoError;
use sx_01_table_store::TableError;
use thiserror::Error;

// =============================================================================
// TAXONOMY
// =============================================================================

/// Error classes reported at the handler boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing arguments.
    Validation,
    /// Unknown user, contract, bid or transaction.
    NotFound,
    /// Operation illegal in the current contract state.
    State,
    /// Ledger I/O, schema or stored-payload failure.
    Storage,
    /// Cipher or entropy failure.
    Crypto,
}

// =============================================================================
// EXCHANGE ERRORS
// =============================================================================

/// Errors raised by routing, workflows and queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ExchangeError {
    /// No whitelisted record-type token among the arguments.
    #[error("Invalid recType in arguments {0:?}")]
    InvalidRecordType(Vec<String>),

    #[error("Invalid function: {0}")]
    InvalidFunction(String),

    #[error("{function}: expected {expected} arguments, got {actual}")]
    ArgumentCount {
        function: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid {field}: {reason}")]
    InvalidArgument { field: &'static str, reason: String },

    #[error("Malformed amount in {field}: {value:?}")]
    MalformedAmount { field: &'static str, value: String },

    #[error("Unknown user: {0}")]
    UnknownUser(String),

    #[error("Contract not found: {0}")]
    ContractNotFound(u64),

    #[error("Bid {bid_number} not found for contract {contract_id}")]
    BidNotFound { contract_id: u64, bid_number: u64 },

    #[error("Transaction {transaction_id} not found for buyer {buyer_user_id}")]
    TransactionNotFound {
        transaction_id: String,
        buyer_user_id: String,
    },

    #[error("No value stored under state key {0}")]
    StateKeyNotFound(String),

    #[error("Contract {contract_id} is {status}, cannot {operation}")]
    InvalidState {
        contract_id: u64,
        status: ContractStatus,
        operation: &'static str,
    },

    #[error("Bid on contract {contract_id} arrived at {submitted}, bidding closed at {closes_at}")]
    BidTooLate {
        contract_id: u64,
        submitted: String,
        closes_at: String,
    },

    #[error("Bid references contract {contract_ref:?}, expected {contract_id}")]
    ItemMismatch { contract_id: u64, contract_ref: String },

    #[error("Bid price {bid_price} is below reserve {reserve}")]
    PriceTooLow { bid_price: u64, reserve: u64 },

    #[error("No bids received for contract {0}")]
    NoBids(u64),

    /// Rows of one contract disagree after an interrupted write.
    #[error("Contract {contract_id} is in an indeterminate state: {reason}; re-read before retrying")]
    IndeterminateState {
        contract_id: u64,
        reason: &'static str,
    },

    #[error("Settlement of contract {contract_id} does not match the selected bid: {reason}")]
    BidMismatch { contract_id: u64, reason: String },

    /// A stored payload could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(String),

    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Crypto(#[from] CryptoError),
}

impl ExchangeError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRecordType(_)
            | Self::InvalidFunction(_)
            | Self::ArgumentCount { .. }
            | Self::InvalidArgument { .. }
            | Self::MalformedAmount { .. } => ErrorKind::Validation,

            Self::UnknownUser(_)
            | Self::ContractNotFound(_)
            | Self::BidNotFound { .. }
            | Self::TransactionNotFound { .. }
            | Self::StateKeyNotFound(_)
            | Self::Table(TableError::NotFound { .. }) => ErrorKind::NotFound,

            Self::InvalidState { .. }
            | Self::BidTooLate { .. }
            | Self::ItemMismatch { .. }
            | Self::PriceTooLow { .. }
            | Self::NoBids(_)
            | Self::BidMismatch { .. }
            | Self::IndeterminateState { .. }
            | Self::Table(TableError::DuplicateKey { .. }) => ErrorKind::State,

            Self::Codec(_) | Self::Table(_) => ErrorKind::Storage,

            Self::Crypto(_) => ErrorKind::Crypto,
        }
    }

    /// Only entropy exhaustion must stop the process.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Crypto(err) if err.is_fatal())
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field,
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for ExchangeError {
    fn from(err: serde_json::Error) -> Self {
        ExchangeError::Codec(err.to_string())
    }
}

// =============================================================================
// ERROR PAYLOAD
// =============================================================================

/// Uniform error response body: `{"Error": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(rename = "Error")]
    pub error: String,
}

impl From<&ExchangeError> for ErrorPayload {
    fn from(err: &ExchangeError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl ErrorPayload {
    pub fn to_bytes(&self) -> Vec<u8> {
        // A struct with one string field always serializes
        serde_json::to_vec(self).unwrap_or_else(|_| br#"{"Error":"unencodable error"}"#.to_vec())
    }
}
