//! # Bid Race Exploits
//!
//! Bidders racing each other or gaming the ordering rules.
//!
//! ## Attack Vectors
//!
//! 1. **Bid-number squatting**: many bidders claim the same `(contractId, bidNumber)`
//! 2. **Submission-order games**: winner must not depend on arrival order
//! 3. **Race against selection**: no bid lands after the contract leaves OPEN

#[cfg(test)]
mod tests {
    use crate::fixtures::{Exchange, Reply};
    use rand::seq::SliceRandom;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use sx_02_contract_exchange::prelude::*;

    fn with_bidders(n: usize) -> Exchange {
        let ex = Exchange::new();
        ex.register("U0", "AH");
        for i in 1..=n {
            ex.register(&format!("B{i}"), "TR");
        }
        ex.post_contract("1001", "100", "U0");
        ex
    }

    fn bid_args(number: &str, bidder: &str, price: &str) -> Vec<String> {
        ["1001", "BID", number, "1001", bidder, price]
            .iter()
            .map(|a| a.to_string())
            .collect()
    }

    // =========================================================================
    // ATTACK: Bid-number squatting
    // =========================================================================

    #[test]
    fn test_racing_bidders_on_one_bid_number() {
        let bidders = 12;
        let ex = with_bidders(bidders);
        let barrier = Arc::new(Barrier::new(bidders));

        let handles: Vec<_> = (1..=bidders)
            .map(|i| {
                let service = ex.service.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let args = bid_args("1", &format!("B{i}"), &(100 + i).to_string());
                    barrier.wait();
                    service.invoke("PostBid", &args).unwrap()
                })
            })
            .collect();

        let replies: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let accepted = replies
            .iter()
            .filter(|bytes| serde_json::from_slice::<ErrorPayload>(bytes).is_err())
            .count();
        assert_eq!(accepted, 1);

        let bids: Vec<Bid> = ex.query("GetBidders", &["1001", "BID"]).records();
        assert_eq!(bids.len(), 1);
        assert_eq!(ex.ledger.row_count(TableName::BidHistory.as_str()), 1);
    }

    #[test]
    fn test_racing_bidders_on_distinct_numbers_all_land() {
        let bidders = 8;
        let ex = with_bidders(bidders);
        let barrier = Arc::new(Barrier::new(bidders));

        let handles: Vec<_> = (1..=bidders)
            .map(|i| {
                let service = ex.service.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    let args = bid_args(&i.to_string(), &format!("B{i}"), "150");
                    barrier.wait();
                    service.invoke("PostBid", &args).unwrap()
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let count = ex.query("GetNoOfBids", &["1001", "BID"]).json();
        assert_eq!(count["count"], bidders);
    }

    // =========================================================================
    // ATTACK: Submission-order games
    // =========================================================================

    #[test]
    fn test_tied_winner_independent_of_arrival_order() {
        let mut rng = rand::thread_rng();
        for _ in 0..10 {
            let ex = with_bidders(5);
            let mut numbers = vec![31, 7, 12, 44, 9];
            numbers.shuffle(&mut rng);
            for (i, number) in numbers.iter().enumerate() {
                let reply = ex.bid("1001", &number.to_string(), &format!("B{}", i + 1), "500");
                assert!(reply.is_ok());
            }

            let winner: Bid = ex.invoke("SelectBidder", &["1001", "BID"]).record();
            assert_eq!(winner.bid_number, 7);
        }
    }

    #[test]
    fn test_early_bird_beats_lower_number_on_tie() {
        let ex = with_bidders(2);
        ex.bid("1001", "9", "B1", "500");
        ex.clock.advance(chrono::TimeDelta::milliseconds(1));
        ex.bid("1001", "1", "B2", "500");

        let winner: Bid = ex.invoke("SelectBidder", &["1001", "BID"]).record();
        assert_eq!(winner.bid_number, 9);
    }

    // =========================================================================
    // ATTACK: Bidding after selection
    // =========================================================================

    #[test]
    fn test_bid_after_selection_refused() {
        let ex = with_bidders(2);
        ex.bid("1001", "1", "B1", "200");
        let _: Bid = ex.invoke("SelectBidder", &["1001", "BID"]).record();

        let reply: Reply = ex.bid("1001", "2", "B2", "10000");
        assert!(reply.error().contains("IN_PROGRESS"), "{}", reply.error());

        let again = ex.invoke("SelectBidder", &["1001", "BID"]);
        assert!(again.error().contains("cannot select a winner"), "{}", again.error());
    }
}
