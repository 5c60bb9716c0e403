//! # Settlement Integration Tests
//!
//! Settlement is the only multi-row write with no rollback. These tests pin
//! what the ledger holds when it succeeds, when the request is wrong, and
//! when the host fails halfway.

#[cfg(test)]
mod tests {
    use crate::fixtures::{Exchange, ASSET};
    use shared_crypto::{decrypt, SecretKey};
    use sx_02_contract_exchange::prelude::*;

    fn sold_to_u2() -> Exchange {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.register("U3", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");
        ex.bid("1001", "2", "U3", "1100");
        ex.invoke("SelectBidder", &["1001", "BID"]);
        ex
    }

    fn settle(ex: &Exchange, buyer: &str, amount: &str, bid_number: &str) -> crate::fixtures::Reply {
        ex.invoke(
            "PostTransaction",
            &["1001", "POSTTRAN", "T1", "SALE", buyer, "2016-06-28 20:00:00", amount, bid_number],
        )
    }

    #[test]
    fn test_settlement_must_name_the_winner() {
        let ex = sold_to_u2();

        let reply = settle(&ex, "U3", "1100", "2");
        assert!(reply.error().contains("selected bid"), "{}", reply.error());
        let reply = settle(&ex, "U2", "1000", "1");
        assert!(reply.error().contains("winning price"), "{}", reply.error());

        assert_eq!(ex.contract("1001").status, ContractStatus::InProgress);
        assert_eq!(ex.ledger.row_count(TableName::Trans.as_str()), 0);
    }

    #[test]
    fn test_settlement_requires_selection() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");

        let reply = settle(&ex, "U2", "1200", "1");
        assert!(reply.error().contains("is OPEN"), "{}", reply.error());
    }

    #[test]
    fn test_second_settlement_is_refused() {
        let ex = sold_to_u2();
        assert!(settle(&ex, "U2", "1200", "1").is_ok());

        let again = settle(&ex, "U2", "1200", "1");
        assert!(again.error().contains("CLOSED"), "{}", again.error());
        assert_eq!(ex.ledger.row_count(TableName::Trans.as_str()), 1);
    }

    #[test]
    fn test_each_settlement_rotates_to_a_fresh_key() {
        let first = sold_to_u2();
        let second = sold_to_u2();
        let keys_before = (
            first.stored_contract("1001").symmetric_key,
            second.stored_contract("1001").symmetric_key,
        );
        assert_ne!(keys_before.0, keys_before.1);

        settle(&first, "U2", "1200", "1");
        settle(&second, "U2", "1200", "1");
        let a = first.stored_contract("1001");
        let b = second.stored_contract("1001");

        assert_ne!(a.symmetric_key, keys_before.0);
        assert_ne!(b.symmetric_key, keys_before.1);
        assert_ne!(a.symmetric_key, b.symmetric_key);
        for contract in [a, b] {
            let key = SecretKey::from_slice(&contract.symmetric_key).unwrap();
            assert_eq!(decrypt(&key, &contract.asset).unwrap(), ASSET);
        }
    }

    #[test]
    fn test_partial_settlement_leaves_closed_contract_without_transaction() {
        let ex = sold_to_u2();

        // Contract row replace succeeds, every later write fails
        ex.ledger.fail_writes_after(1);
        let reply = settle(&ex, "U2", "1200", "1");
        assert!(reply.error().contains("ledger write failed"), "{}", reply.error());

        ex.ledger.clear_faults();
        let contract = ex.contract("1001");
        assert_eq!(contract.status, ContractStatus::Closed);
        assert_eq!(contract.owner_user_id, "U2");
        let missing = ex.query("GetTransaction", &["T1", "POSTTRAN", "U2"]);
        assert!(missing.error().contains("not found"), "{}", missing.error());

        // The category copy was never refreshed
        let modern: Vec<Contract> = ex.query("ViewContracts", &["Modern", "CREATECONTR"]).records();
        assert_eq!(modern[0].status, ContractStatus::InProgress);
    }

    fn contract_with_one_bid() -> Exchange {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "1", "U2", "1200");
        ex
    }

    fn assert_finished(ex: &Exchange, status: ContractStatus) {
        assert_eq!(ex.contract("1001").status, status);
        let open: Vec<Contract> = ex.query("ViewContracts", &["OPEN", "CREATECONTR"]).records();
        assert!(open.is_empty());
        let modern: Vec<Contract> = ex.query("ViewContracts", &["Modern", "CREATECONTR"]).records();
        assert_eq!(modern[0].status, status);
    }

    #[test]
    fn test_interrupted_selection_can_be_finished() {
        // Selection writes: winner, category, open index, contract, log
        for allowed in 0..5 {
            let ex = contract_with_one_bid();

            ex.ledger.fail_writes_after(allowed);
            let reply = ex.invoke("SelectBidder", &["1001", "BID"]);
            assert!(reply.error().contains("ledger write failed"), "{}", reply.error());
            ex.ledger.clear_faults();

            if allowed < 4 {
                assert_eq!(ex.contract("1001").status, ContractStatus::Open, "after {allowed} writes");
                let winner: Bid = ex.invoke("SelectBidder", &["1001", "BID"]).record();
                assert_eq!(winner.bid_number, 1);
            } else {
                assert_eq!(ex.contract("1001").status, ContractStatus::InProgress);
            }

            let txn: Transaction = ex
                .invoke("CloseContract", &["1001", "CLOSECONTRACT"])
                .record();
            assert_eq!(txn.buyer_user_id, "U2");
            assert_eq!(txn.transaction_amount, 1200);
            assert_finished(&ex, ContractStatus::Closed);
        }
    }

    #[test]
    fn test_interrupted_cancel_can_be_finished() {
        // Cancel writes: open index, category, contract, log
        for allowed in 0..4 {
            let ex = contract_with_one_bid();

            ex.ledger.fail_writes_after(allowed);
            let reply = ex.invoke("CloseContract", &["1001", "CANCELCONTRACT"]);
            assert!(reply.error().contains("ledger write failed"), "{}", reply.error());
            ex.ledger.clear_faults();

            if allowed < 3 {
                assert_eq!(ex.contract("1001").status, ContractStatus::Open, "after {allowed} writes");
                assert!(ex.invoke("CloseContract", &["1001", "CANCELCONTRACT"]).is_ok());
            }
            assert_finished(&ex, ContractStatus::Cancelled);
            assert_eq!(ex.ledger.row_count(TableName::Trans.as_str()), 0);
        }
    }

    #[test]
    fn test_outage_before_settlement_changes_nothing() {
        let ex = sold_to_u2();
        let before = ex.stored_contract("1001");

        ex.ledger.fail_writes_after(0);
        assert!(settle(&ex, "U2", "1200", "1").error().contains("ledger write failed"));
        ex.ledger.clear_faults();

        assert_eq!(ex.stored_contract("1001"), before);
    }

    #[test]
    fn test_close_chains_selection_and_settlement() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.register("U2", "TR");
        ex.register("U3", "TR");
        ex.post_contract("1001", "1000", "U1");
        ex.bid("1001", "4", "U2", "1500");
        ex.bid("1001", "9", "U3", "1500");

        let txn: Transaction = ex
            .invoke("CloseContract", &["1001", "CLOSECONTRACT"])
            .record();
        assert_eq!(txn.transaction_id, "1001-4");
        assert_eq!(txn.transaction_type, "SALE");
        assert_eq!(txn.buyer_user_id, "U2");
        assert_eq!(txn.transaction_date, ex.clock.now());

        let log: Vec<ContractLogEntry> = ex
            .query("GetContractLog", &["1001", "CREATECONTR"])
            .records();
        let events: Vec<LogEvent> = log.iter().map(|e| e.event).collect();
        assert_eq!(
            events,
            vec![LogEvent::Initial, LogEvent::WinnerSelected, LogEvent::Settled]
        );
        let sequences: Vec<u32> = log.iter().map(|e| e.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn test_close_without_bids_reports_no_bids() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.post_contract("1001", "1000", "U1");

        let reply = ex.invoke("CloseContract", &["1001", "CLOSECONTRACT"]);
        assert_eq!(reply.error(), ExchangeError::NoBids(1001).to_string());
        assert_eq!(ex.contract("1001").status, ContractStatus::Open);
    }
}
