//! # Value Objects
//!
//! Closed vocabularies of the exchange: record-type tokens, contract
//! statuses, user roles and log events.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

// =============================================================================
// RECORD TYPES
// =============================================================================

/// Record-type tokens a request may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordType {
    User,
    CreateContract,
    Bid,
    PostTransaction,
    CloseContract,
    CancelContract,
}

impl RecordType {
    pub const ALL: [RecordType; 6] = [
        RecordType::User,
        RecordType::CreateContract,
        RecordType::Bid,
        RecordType::PostTransaction,
        RecordType::CloseContract,
        RecordType::CancelContract,
    ];

    pub const fn token(self) -> &'static str {
        match self {
            RecordType::User => "USER",
            RecordType::CreateContract => "CREATECONTR",
            RecordType::Bid => "BID",
            RecordType::PostTransaction => "POSTTRAN",
            RecordType::CloseContract => "CLOSECONTRACT",
            RecordType::CancelContract => "CANCELCONTRACT",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Whitelist of record-type tokens, built once.
#[derive(Debug, Clone)]
pub struct RecordTypeWhitelist {
    tokens: HashSet<&'static str>,
}

impl RecordTypeWhitelist {
    pub fn new() -> Self {
        Self {
            tokens: RecordType::ALL.iter().map(|rt| rt.token()).collect(),
        }
    }

    pub fn is_recognized(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    /// First recognized token among `args`, at any position.
    pub fn find<'a>(&self, args: &[&'a str]) -> Option<&'a str> {
        args.iter().copied().find(|arg| self.is_recognized(arg))
    }
}

impl Default for RecordTypeWhitelist {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// CONTRACT STATUS
// =============================================================================

/// Contract lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContractStatus {
    Open,
    InProgress,
    Closed,
    Cancelled,
}

impl ContractStatus {
    /// OPEN→IN_PROGRESS→CLOSED and OPEN→CANCELLED only.
    pub fn can_transition_to(self, next: ContractStatus) -> bool {
        matches!(
            (self, next),
            (ContractStatus::Open, ContractStatus::InProgress)
                | (ContractStatus::InProgress, ContractStatus::Closed)
                | (ContractStatus::Open, ContractStatus::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, ContractStatus::Closed | ContractStatus::Cancelled)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ContractStatus::Open => "OPEN",
            ContractStatus::InProgress => "IN_PROGRESS",
            ContractStatus::Closed => "CLOSED",
            ContractStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for ContractStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// USER TYPE
// =============================================================================

/// Participant role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserType {
    /// Auction house
    #[serde(rename = "AH")]
    AuctionHouse,
    /// Buyer or seller
    #[serde(rename = "TR")]
    Trader,
    #[serde(rename = "AP")]
    Appraiser,
    #[serde(rename = "IN")]
    Insurer,
    #[serde(rename = "BK")]
    Bank,
    #[serde(rename = "SH")]
    Shipper,
}

impl UserType {
    pub const fn code(self) -> &'static str {
        match self {
            UserType::AuctionHouse => "AH",
            UserType::Trader => "TR",
            UserType::Appraiser => "AP",
            UserType::Insurer => "IN",
            UserType::Bank => "BK",
            UserType::Shipper => "SH",
        }
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AH" => Ok(UserType::AuctionHouse),
            "TR" => Ok(UserType::Trader),
            "AP" => Ok(UserType::Appraiser),
            "IN" => Ok(UserType::Insurer),
            "BK" => Ok(UserType::Bank),
            "SH" => Ok(UserType::Shipper),
            other => Err(format!("unknown user type {other:?}, expected AH, TR, AP, IN, BK or SH")),
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// LOG EVENTS
// =============================================================================

/// What a contract log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogEvent {
    Initial,
    WinnerSelected,
    Settled,
    Cancelled,
}
