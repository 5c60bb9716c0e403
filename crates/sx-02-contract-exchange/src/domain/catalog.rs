//! # Table Catalog
//!
//! Physical tables of the exchange and their composite-key arity.
//!
//! | Table | Keys |
//! |-------|------|
//! | UserTable | userId |
//! | UserCatTable | userType, userId |
//! | ContractTable | contractId |
//! | ContractCatTable | type, contractId |
//! | ContractOpenTable | partition, contractId |
//! | BidTable | contractId, bidNumber |
//! | BidCatTable | partition, contractId |
//! | BidHistoryTable | bidderUserId, contractId, bidNumber |
//! | TransTable | transactionId, buyerUserId |
//! | ContractLogTable | contractId, sequence |

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableName {
    User,
    UserCat,
    Contract,
    ContractCat,
    ContractOpen,
    Bid,
    BidCat,
    BidHistory,
    Trans,
    ContractLog,
}

impl TableName {
    pub const ALL: [TableName; 10] = [
        TableName::User,
        TableName::UserCat,
        TableName::Contract,
        TableName::ContractCat,
        TableName::ContractOpen,
        TableName::Bid,
        TableName::BidCat,
        TableName::BidHistory,
        TableName::Trans,
        TableName::ContractLog,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TableName::User => "UserTable",
            TableName::UserCat => "UserCatTable",
            TableName::Contract => "ContractTable",
            TableName::ContractCat => "ContractCatTable",
            TableName::ContractOpen => "ContractOpenTable",
            TableName::Bid => "BidTable",
            TableName::BidCat => "BidCatTable",
            TableName::BidHistory => "BidHistoryTable",
            TableName::Trans => "TransTable",
            TableName::ContractLog => "ContractLogTable",
        }
    }

    pub const fn key_count(self) -> usize {
        match self {
            TableName::User | TableName::Contract => 1,
            TableName::BidHistory => 3,
            _ => 2,
        }
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Width of the zero-padded sequence key in ContractLogTable.
pub const LOG_SEQUENCE_WIDTH: usize = 6;

/// Log sequence key; padding keeps lexical and numeric order aligned.
pub fn log_sequence_key(sequence: u32) -> String {
    format!("{sequence:0width$}", width = LOG_SEQUENCE_WIDTH)
}
