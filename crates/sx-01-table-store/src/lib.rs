//! # sx-01-table-store
//!
//! Composite-key Table Store for the Sealed-Bid Exchange.
//!
//! ## Role in System
//!
//! - **Row Model**: N ordered string key columns plus one opaque payload column
//! - **Uniqueness**: `insert` refuses an existing composite key, which is the
//!   only guard against two bids sharing `(contractId, bidNumber)`
//! - **Prefix Scans**: `list` matches leading key columns for category,
//!   open-contract and history lookups
//!
//! ## Layering
//!
//! ```text
//! [Exchange workflow / queries]
//!            │  TableStore (inbound port)
//!            ↓
//!   [LedgerTableStore]  ── schema + arity checks, no host access on failure
//!            │  LedgerHost (outbound port)
//!            ↓
//!   [Host ledger]  (InMemoryLedger in tests)
//! ```
//!
//! Host failures surface verbatim as [`TableError::StorageUnavailable`].

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

pub use adapters::*;
pub use domain::*;
pub use ports::*;
pub use service::LedgerTableStore;
