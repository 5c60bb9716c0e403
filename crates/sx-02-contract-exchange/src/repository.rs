//! # Record Repository
//!
//! Typed access to the exchange tables on top of a [`TableStore`]. Knows
//! every table's key layout and maps missing rows to domain errors.

use crate::codec;
use crate::domain::{
    log_sequence_key, Bid, Contract, ContractLogEntry, StoredRecord, TableName, Transaction, User,
};
use crate::errors::ExchangeError;
use sx_01_table_store::{TableError, TableStore};

/// Borrowed view over the exchange tables.
pub struct Repository<'a, S: TableStore> {
    store: &'a S,
    partition: &'a str,
}

fn not_found_as(err: ExchangeError, mapped: impl FnOnce() -> ExchangeError) -> ExchangeError {
    match err {
        ExchangeError::Table(TableError::NotFound { .. }) => mapped(),
        other => other,
    }
}

impl<'a, S: TableStore> Repository<'a, S> {
    pub fn new(store: &'a S, partition: &'a str) -> Self {
        Self { store, partition }
    }

    pub fn partition(&self) -> &'a str {
        self.partition
    }

    // === Generic row access ===

    fn get<T: StoredRecord>(&self, table: TableName, keys: &[&str]) -> Result<T, ExchangeError> {
        codec::decode(&self.store.get(table.as_str(), keys)?)
    }

    fn scan<T: StoredRecord>(&self, table: TableName, prefix: &[&str]) -> Result<Vec<T>, ExchangeError> {
        let payloads = self.store.list(table.as_str(), prefix)?.payloads()?;
        codec::decode_all(&payloads)
    }

    fn insert<T: StoredRecord>(&self, table: TableName, keys: &[&str], record: &T) -> Result<(), ExchangeError> {
        Ok(self.store.insert(table.as_str(), keys, &codec::encode(record)?)?)
    }

    fn replace<T: StoredRecord>(&self, table: TableName, keys: &[&str], record: &T) -> Result<(), ExchangeError> {
        Ok(self.store.replace(table.as_str(), keys, &codec::encode(record)?)?)
    }

    fn delete(&self, table: TableName, keys: &[&str]) -> Result<(), ExchangeError> {
        Ok(self.store.delete(table.as_str(), keys)?)
    }

    // === Users ===

    pub fn user(&self, user_id: &str) -> Result<User, ExchangeError> {
        self.get(TableName::User, &[user_id])
            .map_err(|e| not_found_as(e, || ExchangeError::UnknownUser(user_id.to_string())))
    }

    pub fn insert_user(&self, user: &User) -> Result<(), ExchangeError> {
        self.insert(TableName::User, &[&user.user_id], user)?;
        self.insert(
            TableName::UserCat,
            &[user.user_type.code(), &user.user_id],
            user,
        )
    }

    pub fn users_by_type(&self, user_type: &str) -> Result<Vec<User>, ExchangeError> {
        self.scan(TableName::UserCat, &[user_type])
    }

    // === Contracts ===

    pub fn contract(&self, contract_id: u64) -> Result<Contract, ExchangeError> {
        self.get(TableName::Contract, &[&contract_id.to_string()])
            .map_err(|e| not_found_as(e, || ExchangeError::ContractNotFound(contract_id)))
    }

    pub fn all_contracts(&self) -> Result<Vec<Contract>, ExchangeError> {
        self.scan(TableName::Contract, &[])
    }

    pub fn contracts_in_category(&self, category: &str) -> Result<Vec<Contract>, ExchangeError> {
        self.scan(TableName::ContractCat, &[category])
    }

    pub fn open_contracts(&self) -> Result<Vec<Contract>, ExchangeError> {
        self.scan(TableName::ContractOpen, &[self.partition])
    }

    /// Primary row, category row and open-index row of a new contract.
    pub fn insert_contract(&self, contract: &Contract) -> Result<(), ExchangeError> {
        let key = contract.key();
        self.insert(TableName::Contract, &[&key], contract)?;
        self.insert(TableName::ContractCat, &[&contract.category, &key], contract)?;
        self.insert(TableName::ContractOpen, &[self.partition, &key], contract)
    }

    pub fn replace_contract(&self, contract: &Contract) -> Result<(), ExchangeError> {
        self.replace(TableName::Contract, &[&contract.key()], contract)
    }

    /// Refresh the denormalized category copy.
    pub fn refresh_category(&self, contract: &Contract) -> Result<(), ExchangeError> {
        self.replace(TableName::ContractCat, &[&contract.category, &contract.key()], contract)
    }

    pub fn remove_from_open_index(&self, contract: &Contract) -> Result<(), ExchangeError> {
        self.delete(TableName::ContractOpen, &[self.partition, &contract.key()])
    }

    // === Bids ===

    pub fn bid(&self, contract_id: u64, bid_number: u64) -> Result<Bid, ExchangeError> {
        self.get(
            TableName::Bid,
            &[&contract_id.to_string(), &bid_number.to_string()],
        )
        .map_err(|e| {
            not_found_as(e, || ExchangeError::BidNotFound {
                contract_id,
                bid_number,
            })
        })
    }

    pub fn bids(&self, contract_id: u64) -> Result<Vec<Bid>, ExchangeError> {
        self.scan(TableName::Bid, &[&contract_id.to_string()])
    }

    pub fn bids_by_user(&self, user_id: &str) -> Result<Vec<Bid>, ExchangeError> {
        self.scan(TableName::BidHistory, &[user_id])
    }

    /// Bid row first; its uniqueness is what rejects a reused bid number.
    pub fn insert_bid(&self, bid: &Bid) -> Result<(), ExchangeError> {
        let contract_id = bid.contract_id.to_string();
        let bid_number = bid.bid_number.to_string();
        self.insert(TableName::Bid, &[&contract_id, &bid_number], bid)?;
        self.insert(
            TableName::BidHistory,
            &[&bid.bidder_user_id, &contract_id, &bid_number],
            bid,
        )
    }

    /// Winner recorded by selection. Missing on an IN_PROGRESS contract only
    /// when selection was interrupted.
    pub fn selected_bid(&self, contract_id: u64) -> Result<Bid, ExchangeError> {
        self.get(TableName::BidCat, &[self.partition, &contract_id.to_string()])
            .map_err(|e| {
                not_found_as(e, || ExchangeError::IndeterminateState {
                    contract_id,
                    reason: "no recorded winner",
                })
            })
    }

    /// Record the winner, overwriting a row left by an interrupted selection.
    pub fn record_selected_bid(&self, bid: &Bid) -> Result<(), ExchangeError> {
        let contract_id = bid.contract_id.to_string();
        let keys = [self.partition, contract_id.as_str()];
        match self.insert(TableName::BidCat, &keys, bid) {
            Err(ExchangeError::Table(TableError::DuplicateKey { .. })) => {
                self.replace(TableName::BidCat, &keys, bid)
            }
            other => other,
        }
    }

    // === Transactions ===

    pub fn transaction(&self, transaction_id: &str, buyer_user_id: &str) -> Result<Transaction, ExchangeError> {
        self.get(TableName::Trans, &[transaction_id, buyer_user_id])
            .map_err(|e| {
                not_found_as(e, || ExchangeError::TransactionNotFound {
                    transaction_id: transaction_id.to_string(),
                    buyer_user_id: buyer_user_id.to_string(),
                })
            })
    }

    pub fn insert_transaction(&self, txn: &Transaction) -> Result<(), ExchangeError> {
        self.insert(
            TableName::Trans,
            &[&txn.transaction_id, &txn.buyer_user_id],
            txn,
        )
    }

    // === Contract log ===

    pub fn log_entries(&self, contract_id: u64) -> Result<Vec<ContractLogEntry>, ExchangeError> {
        self.scan(TableName::ContractLog, &[&contract_id.to_string()])
    }

    /// Sequence number the next log entry for this contract takes.
    pub fn next_log_sequence(&self, contract_id: u64) -> Result<u32, ExchangeError> {
        let rows = self
            .store
            .list(TableName::ContractLog.as_str(), &[&contract_id.to_string()])?
            .collect_rows()?;
        u32::try_from(rows.len()).map_err(|_| {
            ExchangeError::Codec(format!("contract {contract_id} log is full"))
        })
    }

    pub fn append_log(&self, entry: &ContractLogEntry) -> Result<(), ExchangeError> {
        self.insert(
            TableName::ContractLog,
            &[&entry.contract_id.to_string(), &log_sequence_key(entry.sequence)],
            entry,
        )
    }

    // === Scalar state ===

    pub fn read_state(&self, key: &str) -> Result<Option<Vec<u8>>, ExchangeError> {
        Ok(self.store.read_state(key)?)
    }

    pub fn write_state(&self, key: &str, value: &[u8]) -> Result<(), ExchangeError> {
        Ok(self.store.write_state(key, value)?)
    }
}
