//! Structured log macros.
//!
//! Every event carries a `subsystem` field. The contract and bid forms also
//! stamp the ids a settlement dispute is traced by.

/// Log an event at `$level` with a subsystem field.
#[macro_export]
macro_rules! log_event {
    ($level:ident, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a contract lifecycle event with standard fields.
#[macro_export]
macro_rules! log_contract_event {
    ($level:ident, $subsystem:expr, $msg:expr, $contract_id:expr, $status:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            contract_id = %$contract_id,
            status = %$status,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a bid event with standard fields.
#[macro_export]
macro_rules! log_bid_event {
    ($level:ident, $subsystem:expr, $msg:expr, $contract_id:expr, $bid_number:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            contract_id = %$contract_id,
            bid_number = %$bid_number,
            $($($field)*,)?
            $msg
        )
    };
}
