//! # Contract/Bid Workflow
//!
//! Write path of the exchange.
//!
//! ```text
//!            PostRequest
//!                 │
//!                 ↓
//!              [OPEN] ──── CloseContract(CANCELCONTRACT) ───→ [CANCELLED]
//!                 │
//!    PostBid*  ───┤
//!                 │ SelectBidder
//!                 ↓
//!          [IN_PROGRESS]
//!                 │ PostTransaction  (key rotated, owner/amount updated)
//!                 ↓
//!             [CLOSED]
//! ```
//!
//! `CloseContract(CLOSECONTRACT)` chains selection and settlement in-process.
//!
//! Writes within one operation are not rolled back on failure. Selection and
//! cancellation write the contract row after its index rows, so an
//! interrupted attempt can be rerun. A failed settlement may leave the
//! contract CLOSED without its Transaction row; the caller must re-read
//! before resubmitting.

use crate::codec;
use crate::config::ExchangeConfig;
use crate::domain::{
    check_bid_window, check_contract_ref, check_reserve, check_settles_selected_bid, check_status,
    generated_transaction_id, parse_amount, parse_timestamp, select_winner, transition, Bid,
    Contract, ContractLogEntry, ContractStatus, LogEvent, RecordType, Transaction, User,
    UserType,
};
use crate::errors::ExchangeError;
use crate::ports::Clock;
use crate::queries::OPEN_VIEW;
use crate::repository::Repository;
use crate::router::Args;
use crate::SUBSYSTEM;

use chrono::NaiveDateTime;
use exchange_telemetry::{log_bid_event, log_contract_event};
use shared_crypto::{asset_fingerprint, decrypt, encrypt, rotate, verify_fingerprint, SecretKey};
use sx_01_table_store::TableStore;
use tracing::warn;
use zeroize::Zeroize;

/// Transaction type recorded when a close request settles a contract.
pub const SALE: &str = "SALE";

/// Settlement terms, either supplied by the caller or derived on close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settlement {
    pub transaction_id: String,
    pub transaction_type: String,
    pub buyer_user_id: String,
    pub transaction_date: NaiveDateTime,
    pub amount: u64,
    pub bid_number: u64,
}

/// Write handlers over a table store and a clock.
pub struct Workflow<'a, S: TableStore, C: Clock> {
    repo: Repository<'a, S>,
    clock: &'a C,
}

impl<'a, S: TableStore, C: Clock> Workflow<'a, S, C> {
    pub fn new(store: &'a S, clock: &'a C, config: &'a ExchangeConfig) -> Self {
        Self {
            repo: Repository::new(store, &config.index_partition),
            clock,
        }
    }

    // =========================================================================
    // USERS
    // =========================================================================

    /// `[userId, "USER", name, userType, address, phone, email, bank,
    /// accountNumber, rating]`
    pub fn post_user(&self, args: &Args<'_>) -> Result<User, ExchangeError> {
        args.expect(10)?;
        let user_type = args
            .text(3, "userType")?
            .parse::<UserType>()
            .map_err(|reason: String| ExchangeError::invalid("userType", reason))?;

        let user = User {
            user_id: args.text(0, "userId")?.to_string(),
            name: args.get(2).unwrap_or_default().to_string(),
            user_type,
            address: args.get(4).unwrap_or_default().to_string(),
            phone: args.get(5).unwrap_or_default().to_string(),
            email: args.get(6).unwrap_or_default().to_string(),
            bank: args.get(7).unwrap_or_default().to_string(),
            account_number: args.get(8).unwrap_or_default().to_string(),
            rating: args.get(9).unwrap_or_default().to_string(),
        };

        self.repo.insert_user(&user)?;
        exchange_telemetry::log_event!(
            info,
            SUBSYSTEM,
            "User registered",
            user_id = %user.user_id,
            user_type = %user.user_type
        );
        Ok(user)
    }

    // =========================================================================
    // POST CONTRACT
    // =========================================================================

    /// `[contractId, amount, duration, businessRule, type,
    /// requirementDescription, description, terms, creationDate, ownerUserId,
    /// "CREATECONTR", assetHex]`
    pub fn post_contract(&self, args: &Args<'_>) -> Result<Contract, ExchangeError> {
        args.expect(12)?;
        let contract_id = args.id(0, "contractId")?;
        let amount = parse_amount("amount", args.get(1).unwrap_or_default())?;
        let duration = args.id(2, "duration")?;
        let category = args.text(4, "type")?;
        if category == OPEN_VIEW {
            return Err(ExchangeError::invalid("type", "OPEN is reserved for the open-contract view"));
        }
        let creation_date = parse_timestamp(args.text(8, "creationDate")?)
            .map_err(|e| ExchangeError::invalid("creationDate", e.to_string()))?;
        let owner_user_id = args.text(9, "ownerUserId")?;
        let mut plaintext = hex::decode(args.get(11).unwrap_or_default().trim())
            .map_err(|e| ExchangeError::invalid("asset", e.to_string()))?;

        self.repo.user(owner_user_id)?;

        let key = SecretKey::generate()?;
        let sealed = encrypt(&key, &plaintext);
        let asset_digest = asset_fingerprint(&plaintext);
        plaintext.zeroize();

        let contract = Contract {
            contract_id,
            symmetric_key: key.to_vec(),
            asset: sealed?,
            asset_digest,
            amount,
            duration,
            business_rule: args.get(3).unwrap_or_default().to_string(),
            category: category.to_string(),
            requirement_description: args.get(5).unwrap_or_default().to_string(),
            description: args.get(6).unwrap_or_default().to_string(),
            terms: args.get(7).unwrap_or_default().to_string(),
            creation_date,
            owner_user_id: owner_user_id.to_string(),
            status: ContractStatus::Open,
        };

        self.repo.insert_contract(&contract)?;
        self.append_log(&contract, LogEvent::Initial)?;

        log_contract_event!(
            info,
            SUBSYSTEM,
            "Contract posted",
            contract.contract_id,
            contract.status,
            reserve = contract.amount,
            closes_at = %contract.close_time()
        );
        Ok(contract)
    }

    // =========================================================================
    // POST BID
    // =========================================================================

    /// `[contractId, "BID", bidNumber, contractRef, bidderUserId, bidPrice]`
    ///
    /// Checks run in a fixed order: bidder, contract, status, window,
    /// contract reference, price format, reserve.
    pub fn post_bid(&self, args: &Args<'_>) -> Result<Bid, ExchangeError> {
        args.expect(6)?;
        let contract_id = args.id(0, "contractId")?;
        let bid_number = args.id(2, "bidNumber")?;
        let bidder_user_id = args.text(4, "bidderUserId")?;

        self.repo.user(bidder_user_id)?;
        let contract = self.repo.contract(contract_id)?;
        check_status(&contract, ContractStatus::Open, "accept bids")?;

        let submitted = self.clock.now();
        check_bid_window(&contract, submitted)?;
        let contract_ref = check_contract_ref(&contract, args.get(3).unwrap_or_default())?;
        let bid_price = parse_amount("bidPrice", args.get(5).unwrap_or_default())?;
        check_reserve(&contract, bid_price)?;

        let bid = Bid {
            contract_id,
            bid_number,
            contract_ref,
            bidder_user_id: bidder_user_id.to_string(),
            bid_price,
            bid_timestamp: submitted,
        };
        self.repo.insert_bid(&bid)?;

        log_bid_event!(
            info,
            SUBSYSTEM,
            "Bid accepted",
            bid.contract_id,
            bid.bid_number,
            bidder = %bid.bidder_user_id,
            price = bid.bid_price
        );
        Ok(bid)
    }

    // =========================================================================
    // SELECT WINNER
    // =========================================================================

    /// `[contractId, "BID"]`
    pub fn select_bidder(&self, args: &Args<'_>) -> Result<Bid, ExchangeError> {
        args.expect(2)?;
        let contract = self.repo.contract(args.id(0, "contractId")?)?;
        let (_, winner) = self.select_winner_for(contract)?;
        Ok(winner)
    }

    /// Derived rows are written before the contract row, so a failure before
    /// the contract row lands leaves it OPEN and selection can simply rerun.
    fn select_winner_for(&self, mut contract: Contract) -> Result<(Contract, Bid), ExchangeError> {
        check_status(&contract, ContractStatus::Open, "select a winner")?;

        let bids = self.repo.bids(contract.contract_id)?;
        let winner = select_winner(&bids)
            .cloned()
            .ok_or(ExchangeError::NoBids(contract.contract_id))?;

        transition(&mut contract, ContractStatus::InProgress, "select a winner")?;
        self.repo.record_selected_bid(&winner)?;
        self.repo.refresh_category(&contract)?;
        self.repo.remove_from_open_index(&contract)?;
        self.repo.replace_contract(&contract)?;
        self.append_log_after_commit(&contract, LogEvent::WinnerSelected)?;

        log_contract_event!(
            info,
            SUBSYSTEM,
            "Winner selected",
            contract.contract_id,
            contract.status,
            bid_number = winner.bid_number,
            price = winner.bid_price,
            bids = bids.len()
        );
        Ok((contract, winner))
    }

    // =========================================================================
    // SETTLE
    // =========================================================================

    /// `[contractId, "POSTTRAN", transactionId, transactionType, buyerUserId,
    /// transactionDate, transactionAmount, bidNumber]`
    pub fn post_transaction(&self, args: &Args<'_>) -> Result<Transaction, ExchangeError> {
        args.expect(8)?;
        let contract_id = args.id(0, "contractId")?;
        let transaction_id = args.text(2, "transactionId")?;
        let transaction_type = args.text(3, "transactionType")?;
        let buyer_user_id = args.text(4, "buyerUserId")?;
        let transaction_date = parse_timestamp(args.text(5, "transactionDate")?)
            .map_err(|e| ExchangeError::invalid("transactionDate", e.to_string()))?;
        let amount = parse_amount("transactionAmount", args.get(6).unwrap_or_default())?;
        let bid_number = args.id(7, "bidNumber")?;

        self.repo.user(buyer_user_id)?;
        let contract = self.repo.contract(contract_id)?;

        self.settle(
            contract,
            Settlement {
                transaction_id: transaction_id.to_string(),
                transaction_type: transaction_type.to_string(),
                buyer_user_id: buyer_user_id.to_string(),
                transaction_date,
                amount,
                bid_number,
            },
        )
    }

    fn settle(&self, mut contract: Contract, terms: Settlement) -> Result<Transaction, ExchangeError> {
        check_status(&contract, ContractStatus::InProgress, "settle")?;
        let selected = self.repo.selected_bid(contract.contract_id)?;
        check_settles_selected_bid(&selected, terms.bid_number, &terms.buyer_user_id, terms.amount)?;

        let (new_key, new_asset) = self.rekey_asset(&contract)?;
        contract.symmetric_key = new_key.to_vec();
        contract.asset = new_asset;
        contract.owner_user_id = terms.buyer_user_id.clone();
        contract.amount = terms.amount;
        transition(&mut contract, ContractStatus::Closed, "settle")?;

        let txn = Transaction {
            contract_id: contract.contract_id,
            transaction_id: terms.transaction_id,
            transaction_type: terms.transaction_type,
            buyer_user_id: terms.buyer_user_id,
            transaction_date: terms.transaction_date,
            transaction_amount: terms.amount,
            bid_number: terms.bid_number,
        };

        self.repo.replace_contract(&contract)?;
        if let Err(err) = self.finish_settlement(&contract, &txn) {
            warn!(
                subsystem = SUBSYSTEM,
                contract_id = contract.contract_id,
                transaction_id = %txn.transaction_id,
                error = %err,
                "Settlement partially applied; contract must be re-read before retrying"
            );
            return Err(err);
        }

        log_contract_event!(
            info,
            SUBSYSTEM,
            "Contract settled",
            contract.contract_id,
            contract.status,
            buyer = %txn.buyer_user_id,
            hammer_price = txn.transaction_amount
        );
        Ok(txn)
    }

    fn finish_settlement(&self, contract: &Contract, txn: &Transaction) -> Result<(), ExchangeError> {
        self.repo.refresh_category(contract)?;
        self.append_log(contract, LogEvent::Settled)?;
        self.repo.insert_transaction(txn)
    }

    /// Decrypt under the current key, re-encrypt under a fresh one, and
    /// confirm the plaintext still matches the recorded fingerprint.
    fn rekey_asset(&self, contract: &Contract) -> Result<(SecretKey, Vec<u8>), ExchangeError> {
        let old_key = SecretKey::from_slice(&contract.symmetric_key)?;
        let (new_key, new_asset) = rotate(&old_key, &contract.asset)?;

        let mut plaintext = decrypt(&new_key, &new_asset)?;
        let verified = verify_fingerprint(&contract.asset_digest, &plaintext);
        plaintext.zeroize();
        verified?;

        Ok((new_key, new_asset))
    }

    // =========================================================================
    // CLOSE / CANCEL
    // =========================================================================

    /// `[contractId, "CLOSECONTRACT"]` or `[contractId, "CANCELCONTRACT"]`
    pub fn close_contract(&self, args: &Args<'_>) -> Result<Closed, ExchangeError> {
        args.expect(2)?;
        let contract_id = args.id(0, "contractId")?;

        if args.contains(RecordType::CancelContract.token()) {
            let contract = self.repo.contract(contract_id)?;
            return self.cancel(contract).map(Closed::Cancelled);
        }
        if args.contains(RecordType::CloseContract.token()) {
            let contract = self.repo.contract(contract_id)?;
            return self.close(contract).map(Closed::Settled);
        }
        Err(ExchangeError::invalid(
            "recordType",
            "CloseContract needs CLOSECONTRACT or CANCELCONTRACT",
        ))
    }

    /// Same ordering as selection: the contract row is written last.
    fn cancel(&self, mut contract: Contract) -> Result<Contract, ExchangeError> {
        transition(&mut contract, ContractStatus::Cancelled, "cancel")?;
        self.repo.remove_from_open_index(&contract)?;
        self.repo.refresh_category(&contract)?;
        self.repo.replace_contract(&contract)?;
        self.append_log_after_commit(&contract, LogEvent::Cancelled)?;

        log_contract_event!(info, SUBSYSTEM, "Contract cancelled", contract.contract_id, contract.status);
        Ok(contract)
    }

    fn close(&self, contract: Contract) -> Result<Transaction, ExchangeError> {
        let (contract, winner) = match contract.status {
            ContractStatus::Open => self.select_winner_for(contract)?,
            ContractStatus::InProgress => {
                let winner = self.recorded_winner(&contract)?;
                (contract, winner)
            }
            status => {
                return Err(ExchangeError::InvalidState {
                    contract_id: contract.contract_id,
                    status,
                    operation: "close",
                })
            }
        };

        let terms = Settlement {
            transaction_id: generated_transaction_id(contract.contract_id, winner.bid_number),
            transaction_type: SALE.to_string(),
            buyer_user_id: winner.bidder_user_id.clone(),
            transaction_date: self.clock.now(),
            amount: winner.bid_price,
            bid_number: winner.bid_number,
        };
        self.settle(contract, terms)
    }

    // =========================================================================
    // HELPERS
    // =========================================================================

    /// Winner of an IN_PROGRESS contract. A contract whose selection row is
    /// missing gets its winner recomputed from the bid table and recorded.
    fn recorded_winner(&self, contract: &Contract) -> Result<Bid, ExchangeError> {
        match self.repo.selected_bid(contract.contract_id) {
            Err(ExchangeError::IndeterminateState { .. }) => {
                let bids = self.repo.bids(contract.contract_id)?;
                let winner = select_winner(&bids)
                    .cloned()
                    .ok_or(ExchangeError::IndeterminateState {
                        contract_id: contract.contract_id,
                        reason: "in progress without bids",
                    })?;
                warn!(
                    subsystem = SUBSYSTEM,
                    contract_id = contract.contract_id,
                    bid_number = winner.bid_number,
                    "Selected bid missing; recorded recomputed winner"
                );
                self.repo.record_selected_bid(&winner)?;
                Ok(winner)
            }
            other => other,
        }
    }

    /// Log entry written once the contract row holds the new status.
    fn append_log_after_commit(&self, contract: &Contract, event: LogEvent) -> Result<(), ExchangeError> {
        self.append_log(contract, event).map_err(|err| {
            warn!(
                subsystem = SUBSYSTEM,
                contract_id = contract.contract_id,
                status = %contract.status,
                error = %err,
                "Contract updated but its log entry was not written"
            );
            err
        })
    }

    fn append_log(&self, contract: &Contract, event: LogEvent) -> Result<(), ExchangeError> {
        let sequence = self.repo.next_log_sequence(contract.contract_id)?;
        let entry = ContractLogEntry::for_contract(contract, sequence, event, self.clock.now());
        self.repo.append_log(&entry)
    }
}

/// Outcome of `CloseContract`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Closed {
    Cancelled(Contract),
    Settled(Transaction),
}

impl Closed {
    /// Response body: the redacted contract or the transaction.
    pub fn encode(&self) -> Result<Vec<u8>, ExchangeError> {
        match self {
            Closed::Cancelled(contract) => codec::encode(&contract.redacted()),
            Closed::Settled(txn) => codec::encode(txn),
        }
    }
}
