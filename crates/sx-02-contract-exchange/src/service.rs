//! # Exchange Service
//!
//! Entry point the host calls. Routes each request, runs it against the
//! table store, and turns every recoverable failure into an
//! `{"Error": ...}` response body.
//!
//! ## Request Flow
//!
//! ```text
//! invoke / query
//!       │
//!       ├── Router: record-type gate → function lookup → entry split
//!       │
//!       ├── Workflow (writes) / Queries (reads)
//!       │
//!       └── Ok(bytes) │ Ok(ErrorPayload) │ Err(fatal)
//! ```

use crate::codec;
use crate::config::ExchangeConfig;
use crate::domain::TableName;
use crate::errors::{ErrorPayload, ExchangeError};
use crate::ports::{Clock, ExchangeApi};
use crate::queries::Queries;
use crate::router::{Args, Function, Router};
use crate::workflow::Workflow;
use crate::SUBSYSTEM;

use std::sync::{Arc, RwLock};
use sx_01_table_store::TableStore;
use tracing::{debug, error, info, instrument, warn};

/// Statistics for the Exchange Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Write functions that completed.
    pub writes_committed: u64,
    /// Read functions that completed.
    pub queries_answered: u64,
    /// Requests answered with an error payload.
    pub rejected_requests: u64,
}

/// Which host entry point a request came through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Entry {
    Invoke,
    Query,
}

/// The Sealed-Bid Exchange service.
pub struct ExchangeService<S: TableStore, C: Clock> {
    config: ExchangeConfig,
    store: Arc<S>,
    clock: Arc<C>,
    router: Router,
    stats: RwLock<ServiceStats>,
}

impl<S: TableStore, C: Clock> ExchangeService<S, C> {
    pub fn new(store: Arc<S>, clock: Arc<C>, config: ExchangeConfig) -> Self {
        Self {
            config,
            store,
            clock,
            router: Router::new(),
            stats: RwLock::new(ServiceStats::default()),
        }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats
            .read()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn record<F: FnOnce(&mut ServiceStats)>(&self, update: F) {
        if let Ok(mut stats) = self.stats.write() {
            update(&mut stats);
        }
    }

    /// Define every catalog table and write the version marker.
    #[instrument(skip(self), fields(version = %self.config.version))]
    pub fn initialize(&self) -> Result<(), ExchangeError> {
        for table in TableName::ALL {
            if self.config.reset_on_init {
                self.store.define_table(table.as_str(), table.key_count())?;
                self.store.drop_table(table.as_str())?;
            }
            self.store.define_table(table.as_str(), table.key_count())?;
        }
        self.store
            .write_state(&self.config.version_key, self.config.version.as_bytes())?;

        info!(
            subsystem = SUBSYSTEM,
            tables = TableName::ALL.len(),
            reset = self.config.reset_on_init,
            "Exchange initialized"
        );
        Ok(())
    }

    /// Run any function with typed errors, ignoring the invoke/query split.
    pub fn execute(&self, function: &str, args: &[&str]) -> Result<Vec<u8>, ExchangeError> {
        let (function, args) = self.router.route(function, args)?;
        self.run(function, &args)
    }

    fn run(&self, function: Function, args: &Args<'_>) -> Result<Vec<u8>, ExchangeError> {
        if !function.is_write() {
            return Queries::new(self.store.as_ref(), &self.config).answer(function, args);
        }

        let workflow = Workflow::new(self.store.as_ref(), self.clock.as_ref(), &self.config);
        match function {
            Function::PostUser => codec::encode(&workflow.post_user(args)?),
            Function::PostRequest => {
                let contract = workflow.post_contract(args)?;
                codec::encode_value(&contract.key())
            }
            Function::PostBid => codec::encode(&workflow.post_bid(args)?),
            Function::SelectBidder => codec::encode(&workflow.select_bidder(args)?),
            Function::PostTransaction => codec::encode(&workflow.post_transaction(args)?),
            Function::CloseContract => workflow.close_contract(args)?.encode(),
            read => Err(ExchangeError::InvalidFunction(read.name().to_string())),
        }
    }

    fn dispatch(&self, entry: Entry, name: &str, args: &[String]) -> Result<Vec<u8>, ExchangeError> {
        let values: Vec<&str> = args.iter().map(String::as_str).collect();

        let outcome = self.router.route(name, &values).and_then(|(function, args)| {
            let allowed = match entry {
                Entry::Invoke => function.is_write(),
                Entry::Query => !function.is_write(),
            };
            if !allowed {
                return Err(ExchangeError::InvalidFunction(name.to_string()));
            }
            self.run(function, &args)
        });

        match outcome {
            Ok(bytes) => {
                self.record(|s| match entry {
                    Entry::Invoke => s.writes_committed += 1,
                    Entry::Query => s.queries_answered += 1,
                });
                debug!(subsystem = SUBSYSTEM, function = name, bytes = bytes.len(), "Request served");
                Ok(bytes)
            }
            Err(err) if err.is_fatal() => {
                error!(subsystem = SUBSYSTEM, function = name, error = %err, "Fatal failure");
                Err(err)
            }
            Err(err) => {
                self.record(|s| s.rejected_requests += 1);
                warn!(
                    subsystem = SUBSYSTEM,
                    function = name,
                    kind = ?err.kind(),
                    error = %err,
                    "Request rejected"
                );
                Ok(ErrorPayload::from(&err).to_bytes())
            }
        }
    }
}

impl<S: TableStore, C: Clock> ExchangeApi for ExchangeService<S, C> {
    #[instrument(skip(self, args), fields(args = args.len()))]
    fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ExchangeError> {
        self.dispatch(Entry::Invoke, function, args)
    }

    #[instrument(skip(self, args), fields(args = args.len()))]
    fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ExchangeError> {
        self.dispatch(Entry::Query, function, args)
    }
}
