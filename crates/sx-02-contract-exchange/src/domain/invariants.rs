//! # Domain Invariants
//!
//! Checks that must hold before a contract or bid write is issued. Each
//! returns the precise [`ExchangeError`] the caller surfaces.

use super::records::{format_timestamp, Bid, Contract};
use super::value_objects::ContractStatus;
use crate::errors::ExchangeError;
use chrono::NaiveDateTime;

// =============================================================================
// CONTRACT STATE
// =============================================================================

/// Contract must currently be in `expected` to run `operation`.
pub fn check_status(
    contract: &Contract,
    expected: ContractStatus,
    operation: &'static str,
) -> Result<(), ExchangeError> {
    if contract.status == expected {
        Ok(())
    } else {
        Err(ExchangeError::InvalidState {
            contract_id: contract.contract_id,
            status: contract.status,
            operation,
        })
    }
}

/// Move a contract to `next`, rejecting any edge outside the lifecycle.
pub fn transition(
    contract: &mut Contract,
    next: ContractStatus,
    operation: &'static str,
) -> Result<(), ExchangeError> {
    if !contract.status.can_transition_to(next) {
        return Err(ExchangeError::InvalidState {
            contract_id: contract.contract_id,
            status: contract.status,
            operation,
        });
    }
    contract.status = next;
    Ok(())
}

// =============================================================================
// BID ACCEPTANCE
// =============================================================================

/// Bid timestamp must be strictly before the close time.
pub fn check_bid_window(contract: &Contract, submitted: NaiveDateTime) -> Result<(), ExchangeError> {
    let closes_at = contract.close_time();
    if submitted < closes_at {
        Ok(())
    } else {
        Err(ExchangeError::BidTooLate {
            contract_id: contract.contract_id,
            submitted: format_timestamp(&submitted),
            closes_at: format_timestamp(&closes_at),
        })
    }
}

/// The bid's contract reference must name the contract it is filed under.
pub fn check_contract_ref(contract: &Contract, contract_ref: &str) -> Result<u64, ExchangeError> {
    match contract_ref.trim().parse::<u64>() {
        Ok(parsed) if parsed == contract.contract_id => Ok(parsed),
        _ => Err(ExchangeError::ItemMismatch {
            contract_id: contract.contract_id,
            contract_ref: contract_ref.to_string(),
        }),
    }
}

/// Parse a price or amount as a non-negative integer.
pub fn parse_amount(field: &'static str, raw: &str) -> Result<u64, ExchangeError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ExchangeError::MalformedAmount {
            field,
            value: raw.to_string(),
        })
}

/// Bid price must meet the reserve.
pub fn check_reserve(contract: &Contract, bid_price: u64) -> Result<(), ExchangeError> {
    if bid_price >= contract.amount {
        Ok(())
    } else {
        Err(ExchangeError::PriceTooLow {
            bid_price,
            reserve: contract.amount,
        })
    }
}

// =============================================================================
// SETTLEMENT
// =============================================================================

/// The settlement request must restate the selected bid exactly.
pub fn check_settles_selected_bid(
    selected: &Bid,
    bid_number: u64,
    buyer_user_id: &str,
    amount: u64,
) -> Result<(), ExchangeError> {
    let mismatch = |reason: String| ExchangeError::BidMismatch {
        contract_id: selected.contract_id,
        reason,
    };
    if selected.bid_number != bid_number {
        return Err(mismatch(format!(
            "bid {bid_number} is not the selected bid {}",
            selected.bid_number
        )));
    }
    if selected.bidder_user_id != buyer_user_id {
        return Err(mismatch(format!(
            "buyer {buyer_user_id} did not place bid {bid_number}"
        )));
    }
    if selected.bid_price != amount {
        return Err(mismatch(format!(
            "amount {amount} differs from winning price {}",
            selected.bid_price
        )));
    }
    Ok(())
}
