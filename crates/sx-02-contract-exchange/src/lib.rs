//! # SX-02 Contract Exchange - Sealed-Bid Contract Subsystem
//!
//! **Subsystem ID:** 2
//!
//! ## Purpose
//!
//! Runs the sealed-bid contract lifecycle on top of the composite-key Table
//! Store: users post contracts carrying an encrypted asset, bidders post
//! bids until the contract closes, a winner is selected, and settlement
//! transfers ownership under a freshly rotated asset key.
//!
//! ## Domain Invariants
//!
//! | Invariant | Enforcement Location |
//! |-----------|---------------------|
//! | Record-type token present before any ledger access | `router.rs` - `Router::route()` |
//! | Lifecycle OPEN → IN_PROGRESS → CLOSED, OPEN → CANCELLED | `domain/invariants.rs` - `transition()` |
//! | Bids strictly before close time | `domain/invariants.rs` - `check_bid_window()` |
//! | Bid meets reserve | `domain/invariants.rs` - `check_reserve()` |
//! | One bid per `(contractId, bidNumber)` | Table Store `insert` uniqueness |
//! | Settlement restates the selected bid | `domain/invariants.rs` - `check_settles_selected_bid()` |
//! | Asset plaintext survives key rotation | `workflow.rs` - fingerprint check |
//! | Contracts leave reads with asset and key blanked | `queries.rs` |
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 1 (Table Store) | `TableStore` | Rows, prefix scans, scalar state |
//! | host | `Clock` | Server time for bids and log entries |
//!
//! ## Usage Example
//!
//! ```ignore
//! use sx_02_contract_exchange::prelude::*;
//!
//! let service = ExchangeService::new(store, Arc::new(SystemClock), ExchangeConfig::from_env());
//! service.initialize()?;
//! let body = service.invoke("PostBid", &args)?;
//! ```

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod codec;
pub mod config;
pub mod domain;
pub mod errors;
pub mod ports;
pub mod queries;
pub mod repository;
pub mod router;
pub mod service;
pub mod workflow;

/// Crate version, written as the default version marker.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Value of the `subsystem` field on every log line from this crate.
pub const SUBSYSTEM: &str = "sx-02-contract-exchange";

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::adapters::{FixedClock, SystemClock};
    pub use crate::config::ExchangeConfig;
    pub use crate::domain::{
        Bid, Contract, ContractLogEntry, ContractStatus, LogEvent, Record, RecordType,
        StoredRecord, TableName, Transaction, User, UserType,
    };
    pub use crate::errors::{ErrorKind, ErrorPayload, ExchangeError};
    pub use crate::ports::{Clock, ExchangeApi};
    pub use crate::router::{Function, Router};
    pub use crate::service::{ExchangeService, ServiceStats};
    pub use crate::workflow::{Closed, SALE};
}

pub use errors::{ErrorKind, ExchangeError};
pub use service::ExchangeService;
