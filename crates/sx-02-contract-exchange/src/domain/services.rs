//! # Domain Services
//!
//! Pure functions over bid sets.

use super::records::Bid;
use std::cmp::{Ordering, Reverse};

/// Ranking used to pick a winner: highest price, then earliest timestamp,
/// then lowest bid number. Total, so the result never depends on scan order.
pub fn compare_bids(a: &Bid, b: &Bid) -> Ordering {
    a.bid_price
        .cmp(&b.bid_price)
        .then_with(|| Reverse(a.bid_timestamp).cmp(&Reverse(b.bid_timestamp)))
        .then_with(|| Reverse(a.bid_number).cmp(&Reverse(b.bid_number)))
}

/// Winning bid, or `None` when there are no bids.
pub fn select_winner(bids: &[Bid]) -> Option<&Bid> {
    bids.iter().max_by(|a, b| compare_bids(a, b))
}

/// Most recent bid; bid number breaks timestamp ties.
pub fn latest_bid(bids: &[Bid]) -> Option<&Bid> {
    bids.iter()
        .max_by_key(|bid| (bid.bid_timestamp, bid.bid_number))
}

/// Transaction id used when a close request settles a contract itself.
pub fn generated_transaction_id(contract_id: u64, bid_number: u64) -> String {
    format!("{contract_id}-{bid_number}")
}
