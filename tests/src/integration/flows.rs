//! # Integration Test Flows
//!
//! Full contract lifecycles through `invoke` and `query`, the way the host
//! drives the exchange.
//!
//! ## Flows Tested:
//!
//! 1. **Post → Bid → Select → Settle**: the canonical sale
//! 2. **Post → Cancel**: withdrawn contract refuses bids, writes no transaction
//! 3. **Read surface**: category and open views, per-user listings, version

#[cfg(test)]
mod tests {
    use crate::fixtures::{Exchange, Reply, ASSET};
    use chrono::TimeDelta;
    use shared_crypto::{decrypt, SecretKey};
    use sx_02_contract_exchange::prelude::*;

    // =============================================================================
    // CANONICAL SALE
    // =============================================================================

    #[test]
    fn test_reserve_sale_end_to_end() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");

        let reply = ex.post_contract("1001", "1000", "U1");
        assert_eq!(reply.json(), serde_json::json!("1001"));
        let before = ex.stored_contract("1001");

        // First bid above reserve is accepted
        let bid: Bid = ex.bid("1001", "1", "U2", "1200").record();
        assert_eq!(bid.bid_price, 1200);
        assert_eq!(bid.bid_timestamp, ex.clock.now());

        // Same bid number again is a duplicate, original untouched
        let dup = ex.bid("1001", "1", "U2", "5000");
        assert!(dup.error().contains("Duplicate"), "{}", dup.error());
        let bids: Vec<Bid> = ex.query("GetBidders", &["1001", "BID"]).records();
        assert_eq!(bids, vec![bid.clone()]);

        let winner: Bid = ex.invoke("SelectBidder", &["1001", "BID"]).record();
        assert_eq!(winner, bid);

        let txn: Transaction = ex
            .invoke(
                "PostTransaction",
                &["1001", "POSTTRAN", "T-77", "SALE", "U2", "2016-06-28 20:00:00", "1200", "1"],
            )
            .record();
        assert_eq!(txn.buyer_user_id, "U2");

        let after = ex.contract("1001");
        assert_eq!(after.status, ContractStatus::Closed);
        assert_eq!(after.owner_user_id, "U2");
        assert_eq!(after.amount, 1200);
        assert!(after.asset.is_empty());

        // Exactly one transaction under (T-77, U2)
        let fetched: Transaction = ex
            .query("GetTransaction", &["T-77", "POSTTRAN", "U2"])
            .record();
        assert_eq!(fetched, txn);
        assert_eq!(ex.ledger.row_count(TableName::Trans.as_str()), 1);

        // Key rotated, plaintext preserved
        let sealed = ex.stored_contract("1001");
        assert_ne!(sealed.symmetric_key, before.symmetric_key);
        let key = SecretKey::from_slice(&sealed.symmetric_key).unwrap();
        assert_eq!(decrypt(&key, &sealed.asset).unwrap(), ASSET);
    }

    #[test]
    fn test_get_contract_matches_posted_except_secrets() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.post_contract("1001", "1000", "U1");

        let stored = ex.stored_contract("1001");
        let read = ex.contract("1001");
        assert!(!stored.symmetric_key.is_empty());
        assert_eq!(
            read,
            Contract {
                symmetric_key: Vec::new(),
                asset: Vec::new(),
                ..stored
            }
        );
    }

    #[test]
    fn test_settled_contract_refuses_bids() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");
        assert!(ex.invoke("CloseContract", &["1001", "CLOSECONTRACT"]).is_ok());

        let late = ex.bid("1001", "2", "U2", "9000");
        assert!(late.error().contains("CLOSED"), "{}", late.error());
    }

    // =============================================================================
    // BID REJECTIONS
    // =============================================================================

    #[test]
    fn test_only_bid_below_reserve_is_rejected() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "1000", "U1");

        let reply = ex.bid("1001", "1", "U2", "999");
        assert_eq!(
            reply.error(),
            ExchangeError::PriceTooLow {
                bid_price: 999,
                reserve: 1000
            }
            .to_string()
        );
        let count = ex.query("GetNoOfBids", &["1001", "BID"]).json();
        assert_eq!(count["count"], 0);
    }

    #[test]
    fn test_highest_bid_after_close_time_is_rejected() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.register("U3", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");

        ex.clock.advance(TimeDelta::hours(1));
        let late = ex.bid("1001", "2", "U3", "100000");
        assert!(late.error().contains("bidding closed"), "{}", late.error());

        let highest: Bid = ex.query("GetHighestBid", &["1001", "BID"]).record();
        assert_eq!(highest.bidder_user_id, "U2");
    }

    #[test]
    fn test_bid_from_unknown_user() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.post_contract("1001", "1000", "U1");
        assert_eq!(
            ex.bid("1001", "1", "ghost", "1200").error(),
            "Unknown user: ghost"
        );
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[test]
    fn test_cancel_withdraws_contract() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");

        let cancelled: Contract = ex
            .invoke("CloseContract", &["1001", "CANCELCONTRACT"])
            .record();
        assert_eq!(cancelled.status, ContractStatus::Cancelled);
        assert!(cancelled.asset.is_empty());

        assert!(ex.bid("1001", "2", "U2", "1300").error().contains("CANCELLED"));
        assert_eq!(ex.ledger.row_count(TableName::Trans.as_str()), 0);

        let open: Vec<Contract> = ex.query("ViewContracts", &["OPEN", "CREATECONTR"]).records();
        assert!(open.is_empty());

        let log: Vec<ContractLogEntry> = ex
            .query("GetContractLog", &["1001", "CREATECONTR"])
            .records();
        let events: Vec<LogEvent> = log.iter().map(|e| e.event).collect();
        assert_eq!(events, vec![LogEvent::Initial, LogEvent::Cancelled]);
    }

    // =============================================================================
    // READ SURFACE
    // =============================================================================

    #[test]
    fn test_category_and_open_views() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract_in("1001", "1000", "U1", "Modern");
        ex.post_contract_in("1002", "500", "U1", "Baroque");
        ex.post_contract_in("1003", "700", "U1", "Modern");
        ex.bid("1003", "1", "U2", "800");
        ex.invoke("SelectBidder", &["1003", "BID"]);

        let modern: Vec<Contract> = ex.query("ViewContracts", &["Modern", "CREATECONTR"]).records();
        let ids: Vec<u64> = modern.iter().map(|c| c.contract_id).collect();
        assert_eq!(ids, vec![1001, 1003]);
        assert_eq!(modern[1].status, ContractStatus::InProgress);
        assert!(modern.iter().all(|c| c.asset.is_empty()));

        let open: Vec<Contract> = ex.query("ViewContracts", &["OPEN", "CREATECONTR"]).records();
        let ids: Vec<u64> = open.iter().map(|c| c.contract_id).collect();
        assert_eq!(ids, vec![1001, 1002]);
    }

    #[test]
    fn test_user_listings() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.register("U3", "TR");
        ex.post_contract("1001", "100", "U1");
        ex.post_contract("1002", "100", "U2");
        ex.bid("1001", "1", "U2", "150");
        ex.bid("1001", "2", "U3", "160");

        let owned: Vec<Contract> = ex.query("GetUserContract", &["U1", "CREATECONTR"]).records();
        assert_eq!(owned.len(), 1);
        assert_eq!(owned[0].contract_id, 1001);

        let placed: Vec<Bid> = ex.query("GetUserBidds", &["U2", "BID"]).records();
        assert_eq!(placed.len(), 1);
        assert_eq!(placed[0].bid_price, 150);

        let traders: Vec<User> = ex.query("GetUsersByType", &["TR", "USER"]).records();
        assert_eq!(traders.len(), 2);
        assert!(traders.iter().all(|u| u.user_type == UserType::Trader));

        let bid: Bid = ex.query("GetBid", &["1001", "BID", "2"]).record();
        assert_eq!(bid.bidder_user_id, "U3");
    }

    #[test]
    fn test_last_bid_follows_the_clock() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "100", "U1");

        ex.bid("1001", "5", "U2", "300");
        ex.clock.advance(TimeDelta::seconds(30));
        ex.bid("1001", "2", "U2", "200");

        let last: Bid = ex.query("GetLastBid", &["1001", "BID"]).record();
        assert_eq!(last.bid_number, 2);
        let highest: Bid = ex.query("GetHighestBid", &["1001", "BID"]).record();
        assert_eq!(highest.bid_number, 5);
    }

    #[test]
    fn test_version_marker() {
        let ex = Exchange::with_config(ExchangeConfig {
            version: "2.0-test".into(),
            ..ExchangeConfig::default()
        });
        let version = ex.query("GetVersion", &[]).json();
        assert_eq!(version["version"], "2.0-test");

        let missing: Reply = ex.query("GetVersion", &["no-such-key"]);
        assert!(missing.error().contains("no-such-key"));
    }
}
