//! # Router Gate Exploits
//!
//! Requests that must be refused before the exchange touches the ledger.
//! The ledger is taken offline first, so any request that reaches it comes
//! back as a storage error instead of the expected rejection.

#[cfg(test)]
mod tests {
    use crate::fixtures::Exchange;
    use sx_02_contract_exchange::prelude::*;

    fn offline() -> Exchange {
        let ex = Exchange::new();
        ex.ledger.set_unavailable(true);
        ex
    }

    // =========================================================================
    // ATTACK: Missing or forged record-type token
    // =========================================================================

    #[test]
    fn test_missing_token_rejected_before_ledger() {
        let ex = offline();
        let calls = ex.ledger.calls();

        let reply = ex.invoke("PostBid", &["1001", "bid", "1", "1001", "U2", "1200"]);
        assert!(reply.error().starts_with("Invalid recType"), "{}", reply.error());
        assert_eq!(ex.ledger.calls(), calls);
    }

    #[test]
    fn test_stored_only_tag_is_not_a_request_token() {
        let ex = offline();
        let reply = ex.query("GetContractLog", &["1001", "CONTRACTLOG"]);
        assert!(reply.error().starts_with("Invalid recType"), "{}", reply.error());
    }

    #[test]
    fn test_unknown_function_with_no_token_fails_the_gate() {
        let ex = offline();
        let reply = ex.query("DropAllTables", &["x"]);
        assert!(reply.error().starts_with("Invalid recType"), "{}", reply.error());
    }

    #[test]
    fn test_unknown_function_with_token() {
        let ex = offline();
        let calls = ex.ledger.calls();
        let reply = ex.invoke("CloseConract", &["1001", "CLOSECONTRACT"]);
        assert_eq!(reply.error(), "Invalid function: CloseConract");
        assert_eq!(ex.ledger.calls(), calls);
    }

    // =========================================================================
    // ATTACK: Entry-point confusion
    // =========================================================================

    #[test]
    fn test_write_through_query_entry_refused() {
        let ex = offline();
        let calls = ex.ledger.calls();
        let reply = ex.query("CloseContract", &["1001", "CANCELCONTRACT"]);
        assert_eq!(reply.error(), "Invalid function: CloseContract");

        let reply = ex.invoke("GetUser", &["U1", "USER"]);
        assert_eq!(reply.error(), "Invalid function: GetUser");
        assert_eq!(ex.ledger.calls(), calls);
    }

    // =========================================================================
    // ATTACK: Malformed arguments
    // =========================================================================

    #[test]
    fn test_argument_count_checked_before_ledger() {
        let ex = offline();
        let calls = ex.ledger.calls();
        let reply = ex.invoke("PostBid", &["1001", "BID", "1"]);
        assert_eq!(reply.error(), "PostBid: expected 6 arguments, got 3");
        assert_eq!(ex.ledger.calls(), calls);
    }

    #[test]
    fn test_non_numeric_contract_id() {
        let ex = offline();
        let reply = ex.query("GetContract", &["C1", "CREATECONTR"]);
        assert!(reply.error().starts_with("Invalid contractId"), "{}", reply.error());
    }

    #[test]
    fn test_offline_ledger_surfaces_storage_error() {
        let ex = offline();
        let reply = ex.query("GetUser", &["U1", "USER"]);
        assert_eq!(reply.error(), "Storage unavailable: ledger unavailable");
        assert_eq!(ex.service.stats().rejected_requests, 1);
    }

    #[test]
    fn test_version_needs_no_token_but_reads_ledger() {
        let ex = offline();
        let reply = ex.query("GetVersion", &[]);
        assert!(reply.error().contains("ledger unavailable"), "{}", reply.error());

        ex.ledger.clear_faults();
        assert!(ex.query("GetVersion", &[]).is_ok());
    }

    // =========================================================================
    // ATTACK: Reading sealed assets
    // =========================================================================

    #[test]
    fn test_no_read_path_returns_the_sealed_asset() {
        let ex = Exchange::new();
        ex.register("U1", "AH");
        ex.post_contract("1001", "1000", "U1");

        let views: Vec<Vec<Contract>> = vec![
            vec![ex.contract("1001")],
            ex.query("GetUserContract", &["U1", "CREATECONTR"]).records(),
            ex.query("ViewContracts", &["Modern", "CREATECONTR"]).records(),
            ex.query("ViewContracts", &["OPEN", "CREATECONTR"]).records(),
        ];
        for contract in views.into_iter().flatten() {
            assert!(contract.asset.is_empty());
            assert!(contract.symmetric_key.is_empty());
        }
    }
}
