//! # Outbound Ports
//!
//! Dependencies the exchange needs beyond the Table Store.

use chrono::NaiveDateTime;

/// Source of server time for bid timestamps and log entries.
///
/// Times are UTC and compared against contract creation dates as written.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}
