//! # Ledger Records
//!
//! Every stored payload is one variant of [`Record`], tagged on the wire by
//! `recordType`. Field names are camelCase. Numeric identifiers and amounts
//! travel as decimal strings, byte fields as lowercase hex.

use super::value_objects::{ContractStatus, LogEvent, RecordType, UserType};
use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_with::{hex::Hex, serde_as, DisplayFromStr};
use std::fmt;

/// Timestamp layout used for every date on the ledger.
pub const TIMESTAMP_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Parse a ledger timestamp (`YYYY-MM-DD HH:MM:SS`, optional fraction).
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_LAYOUT)
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(TIMESTAMP_LAYOUT).to_string()
}

mod ledger_time {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

// =============================================================================
// USER
// =============================================================================

/// Registered participant. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub name: String,
    pub user_type: UserType,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub bank: String,
    pub account_number: String,
    pub rating: String,
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Auctionable unit with a status lifecycle and an encrypted asset.
#[serde_as]
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    #[serde_as(as = "DisplayFromStr")]
    pub contract_id: u64,
    #[serde_as(as = "Hex")]
    pub symmetric_key: Vec<u8>,
    /// `nonce || ciphertext`, emptied on every read path.
    #[serde_as(as = "Hex")]
    pub asset: Vec<u8>,
    #[serde_as(as = "Hex")]
    pub asset_digest: [u8; 32],
    /// Reserve price; the hammer price once settled.
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    /// Bidding window in minutes.
    #[serde_as(as = "DisplayFromStr")]
    pub duration: u64,
    pub business_rule: String,
    #[serde(rename = "type")]
    pub category: String,
    pub requirement_description: String,
    pub description: String,
    pub terms: String,
    #[serde(with = "ledger_time")]
    pub creation_date: NaiveDateTime,
    pub owner_user_id: String,
    pub status: ContractStatus,
}

impl Contract {
    /// Table key.
    pub fn key(&self) -> String {
        self.contract_id.to_string()
    }

    /// End of the bidding window. Saturates instead of overflowing.
    pub fn close_time(&self) -> NaiveDateTime {
        i64::try_from(self.duration)
            .ok()
            .and_then(Duration::try_minutes)
            .and_then(|window| self.creation_date.checked_add_signed(window))
            .unwrap_or(NaiveDateTime::MAX)
    }

    /// Copy safe to return to readers: no sealed asset, no key.
    pub fn redacted(&self) -> Self {
        Self {
            symmetric_key: Vec::new(),
            asset: Vec::new(),
            ..self.clone()
        }
    }
}

impl fmt::Debug for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Contract")
            .field("contract_id", &self.contract_id)
            .field("symmetric_key", &"<redacted>")
            .field("asset_len", &self.asset.len())
            .field("amount", &self.amount)
            .field("duration", &self.duration)
            .field("category", &self.category)
            .field("creation_date", &self.creation_date)
            .field("owner_user_id", &self.owner_user_id)
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// BID
// =============================================================================

/// Priced, timestamped offer. Immutable once written.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    #[serde_as(as = "DisplayFromStr")]
    pub contract_id: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub bid_number: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub contract_ref: u64,
    pub bidder_user_id: String,
    #[serde_as(as = "DisplayFromStr")]
    pub bid_price: u64,
    /// Assigned by the server on acceptance.
    #[serde(with = "ledger_time")]
    pub bid_timestamp: NaiveDateTime,
}

// =============================================================================
// TRANSACTION
// =============================================================================

/// Settlement record, one per settled contract.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde_as(as = "DisplayFromStr")]
    pub contract_id: u64,
    pub transaction_id: String,
    pub transaction_type: String,
    pub buyer_user_id: String,
    #[serde(with = "ledger_time")]
    pub transaction_date: NaiveDateTime,
    /// Hammer price.
    #[serde_as(as = "DisplayFromStr")]
    pub transaction_amount: u64,
    #[serde_as(as = "DisplayFromStr")]
    pub bid_number: u64,
}

// =============================================================================
// CONTRACT LOG
// =============================================================================

/// History entry appended on every contract transition.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractLogEntry {
    #[serde_as(as = "DisplayFromStr")]
    pub contract_id: u64,
    pub sequence: u32,
    pub event: LogEvent,
    pub status: ContractStatus,
    pub owner_user_id: String,
    #[serde_as(as = "DisplayFromStr")]
    pub amount: u64,
    #[serde(with = "ledger_time")]
    pub date: NaiveDateTime,
}

impl ContractLogEntry {
    pub fn for_contract(contract: &Contract, sequence: u32, event: LogEvent, date: NaiveDateTime) -> Self {
        Self {
            contract_id: contract.contract_id,
            sequence,
            event,
            status: contract.status,
            owner_user_id: contract.owner_user_id.clone(),
            amount: contract.amount,
            date,
        }
    }
}

// =============================================================================
// TAGGED RECORD
// =============================================================================

/// Any stored payload, discriminated by `recordType`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "recordType")]
pub enum Record {
    #[serde(rename = "USER")]
    User(User),
    #[serde(rename = "CREATECONTR")]
    Contract(Contract),
    #[serde(rename = "BID")]
    Bid(Bid),
    #[serde(rename = "POSTTRAN")]
    Transaction(Transaction),
    #[serde(rename = "CONTRACTLOG")]
    ContractLog(ContractLogEntry),
}

impl Record {
    /// Wire tag of this variant.
    pub fn tag(&self) -> &'static str {
        match self {
            Record::User(_) => RecordType::User.token(),
            Record::Contract(_) => RecordType::CreateContract.token(),
            Record::Bid(_) => RecordType::Bid.token(),
            Record::Transaction(_) => RecordType::PostTransaction.token(),
            Record::ContractLog(_) => "CONTRACTLOG",
        }
    }
}

/// A concrete record type that round-trips through [`Record`].
pub trait StoredRecord: Clone + Sized {
    /// Wire tag expected when decoding.
    const TAG: &'static str;

    fn into_record(self) -> Record;

    fn from_record(record: Record) -> Option<Self>;
}

macro_rules! stored_record {
    ($ty:ident, $variant:ident, $tag:expr) => {
        impl StoredRecord for $ty {
            const TAG: &'static str = $tag;

            fn into_record(self) -> Record {
                Record::$variant(self)
            }

            fn from_record(record: Record) -> Option<Self> {
                match record {
                    Record::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

stored_record!(User, User, "USER");
stored_record!(Contract, Contract, "CREATECONTR");
stored_record!(Bid, Bid, "BID");
stored_record!(Transaction, Transaction, "POSTTRAN");
stored_record!(ContractLogEntry, ContractLog, "CONTRACTLOG");
