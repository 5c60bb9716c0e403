//! # Query Façade
//!
//! Read handlers. Every contract leaves this module with its asset and key blanked.

use crate::codec;
use crate::config::ExchangeConfig;
use crate::domain::{latest_bid, select_winner, Contract};
use crate::errors::ExchangeError;
use crate::repository::Repository;
use crate::router::{Args, Function};
use serde::Serialize;
use sx_01_table_store::TableStore;

/// `ViewContracts` argument selecting the open index instead of a category.
/// Reserved: `PostRequest` refuses it as a category name.
pub const OPEN_VIEW: &str = "OPEN";

#[derive(Debug, Serialize)]
struct VersionView<'a> {
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct CountView {
    count: usize,
}

/// Read handlers over a table store.
pub struct Queries<'a, S: TableStore> {
    repo: Repository<'a, S>,
    config: &'a ExchangeConfig,
}

impl<'a, S: TableStore> Queries<'a, S> {
    pub fn new(store: &'a S, config: &'a ExchangeConfig) -> Self {
        Self {
            repo: Repository::new(store, &config.index_partition),
            config,
        }
    }

    /// Answer a read function. Write functions are refused.
    pub fn answer(&self, function: Function, args: &Args<'_>) -> Result<Vec<u8>, ExchangeError> {
        match function {
            Function::GetUser => codec::encode(&self.repo.user(args.text(0, "userId")?)?),
            Function::GetUsersByType => {
                codec::encode_all(&self.repo.users_by_type(args.text(0, "userType")?)?)
            }
            Function::GetContract => {
                let contract = self.repo.contract(args.id(0, "contractId")?)?;
                codec::encode(&contract.redacted())
            }
            Function::GetUserContract => self.user_contracts(args.text(0, "userId")?),
            Function::ViewContracts => self.view_contracts(args.text(0, "category")?),
            Function::GetBidders => codec::encode_all(&self.repo.bids(args.id(0, "contractId")?)?),
            Function::GetUserBidds => {
                codec::encode_all(&self.repo.bids_by_user(args.text(0, "userId")?)?)
            }
            Function::GetBid => {
                args.expect(3)?;
                let bid = self.repo.bid(args.id(0, "contractId")?, args.id(2, "bidNumber")?)?;
                codec::encode(&bid)
            }
            Function::GetTransaction => {
                args.expect(3)?;
                let txn = self
                    .repo
                    .transaction(args.text(0, "transactionId")?, args.text(2, "buyerUserId")?)?;
                codec::encode(&txn)
            }
            Function::GetContractLog => {
                codec::encode_all(&self.repo.log_entries(args.id(0, "contractId")?)?)
            }
            Function::GetHighestBid => {
                let contract_id = args.id(0, "contractId")?;
                let bids = self.repo.bids(contract_id)?;
                let winner = select_winner(&bids).ok_or(ExchangeError::NoBids(contract_id))?;
                codec::encode(winner)
            }
            Function::GetLastBid => {
                let contract_id = args.id(0, "contractId")?;
                let bids = self.repo.bids(contract_id)?;
                let last = latest_bid(&bids).ok_or(ExchangeError::NoBids(contract_id))?;
                codec::encode(last)
            }
            Function::GetNoOfBids => {
                let bids = self.repo.bids(args.id(0, "contractId")?)?;
                codec::encode_value(&CountView { count: bids.len() })
            }
            Function::GetVersion => self.version(args.get(0)),
            write => Err(ExchangeError::InvalidFunction(write.name().to_string())),
        }
    }

    fn user_contracts(&self, user_id: &str) -> Result<Vec<u8>, ExchangeError> {
        let owned: Vec<Contract> = self
            .repo
            .all_contracts()?
            .into_iter()
            .filter(|c| c.owner_user_id == user_id)
            .map(|c| c.redacted())
            .collect();
        codec::encode_all(&owned)
    }

    /// [`OPEN_VIEW`] lists open contracts; any other selector is a category.
    fn view_contracts(&self, selector: &str) -> Result<Vec<u8>, ExchangeError> {
        let contracts = if selector == OPEN_VIEW {
            self.repo.open_contracts()?
        } else {
            self.repo.contracts_in_category(selector)?
        };
        let redacted: Vec<Contract> = contracts.iter().map(Contract::redacted).collect();
        codec::encode_all(&redacted)
    }

    fn version(&self, key: Option<&str>) -> Result<Vec<u8>, ExchangeError> {
        let key = key
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .unwrap_or(&self.config.version_key);
        let raw = self
            .repo
            .read_state(key)?
            .ok_or_else(|| ExchangeError::StateKeyNotFound(key.to_string()))?;
        let version = String::from_utf8_lossy(&raw);
        codec::encode_value(&VersionView { version: &version })
    }
}
