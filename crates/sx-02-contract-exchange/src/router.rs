//! # Record Router
//!
//! Gates every request on a whitelisted record-type token and resolves the
//! function name. Both checks are pure lookups; nothing here touches the
//! ledger.

use crate::domain::RecordTypeWhitelist;
use crate::errors::ExchangeError;
use std::collections::HashMap;

// =============================================================================
// FUNCTIONS
// =============================================================================

/// Every function the exchange answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Function {
    // Writes
    PostUser,
    PostRequest,
    PostBid,
    SelectBidder,
    PostTransaction,
    CloseContract,
    // Reads
    GetUser,
    GetContract,
    GetUserContract,
    GetBidders,
    /// `[category | "OPEN", "CREATECONTR"]`; `"OPEN"` is never a category.
    ViewContracts,
    GetUserBidds,
    GetVersion,
    GetBid,
    GetTransaction,
    GetContractLog,
    GetHighestBid,
    GetNoOfBids,
    GetLastBid,
    GetUsersByType,
}

impl Function {
    pub const ALL: [Function; 20] = [
        Function::PostUser,
        Function::PostRequest,
        Function::PostBid,
        Function::SelectBidder,
        Function::PostTransaction,
        Function::CloseContract,
        Function::GetUser,
        Function::GetContract,
        Function::GetUserContract,
        Function::GetBidders,
        Function::ViewContracts,
        Function::GetUserBidds,
        Function::GetVersion,
        Function::GetBid,
        Function::GetTransaction,
        Function::GetContractLog,
        Function::GetHighestBid,
        Function::GetNoOfBids,
        Function::GetLastBid,
        Function::GetUsersByType,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Function::PostUser => "PostUser",
            Function::PostRequest => "PostRequest",
            Function::PostBid => "PostBid",
            Function::SelectBidder => "SelectBidder",
            Function::PostTransaction => "PostTransaction",
            Function::CloseContract => "CloseContract",
            Function::GetUser => "GetUser",
            Function::GetContract => "GetContract",
            Function::GetUserContract => "GetUserContract",
            Function::GetBidders => "GetBidders",
            Function::ViewContracts => "ViewContracts",
            Function::GetUserBidds => "GetUserBidds",
            Function::GetVersion => "GetVersion",
            Function::GetBid => "GetBid",
            Function::GetTransaction => "GetTransaction",
            Function::GetContractLog => "GetContractLog",
            Function::GetHighestBid => "GetHighestBid",
            Function::GetNoOfBids => "GetNoOfBids",
            Function::GetLastBid => "GetLastBid",
            Function::GetUsersByType => "GetUsersByType",
        }
    }

    pub const fn is_write(self) -> bool {
        matches!(
            self,
            Function::PostUser
                | Function::PostRequest
                | Function::PostBid
                | Function::SelectBidder
                | Function::PostTransaction
                | Function::CloseContract
        )
    }

    /// GetVersion reads a scalar, not a record, and carries no token.
    pub const fn requires_record_type(self) -> bool {
        !matches!(self, Function::GetVersion)
    }
}

// =============================================================================
// ARGUMENTS
// =============================================================================

/// Positional arguments of one request.
#[derive(Debug, Clone)]
pub struct Args<'a> {
    function: &'static str,
    values: Vec<&'a str>,
}

impl<'a> Args<'a> {
    pub fn new(function: Function, values: Vec<&'a str>) -> Self {
        Self {
            function: function.name(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[&'a str] {
        &self.values
    }

    pub fn contains(&self, token: &str) -> bool {
        self.values.iter().any(|v| *v == token)
    }

    /// Require exactly `expected` arguments.
    pub fn expect(&self, expected: usize) -> Result<(), ExchangeError> {
        if self.values.len() == expected {
            Ok(())
        } else {
            Err(ExchangeError::ArgumentCount {
                function: self.function,
                expected,
                actual: self.values.len(),
            })
        }
    }

    /// Raw argument; callers check the count first.
    pub fn get(&self, index: usize) -> Option<&'a str> {
        self.values.get(index).copied()
    }

    /// Non-empty text argument.
    pub fn text(&self, index: usize, field: &'static str) -> Result<&'a str, ExchangeError> {
        match self.get(index).map(str::trim) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(ExchangeError::invalid(field, "must not be empty")),
        }
    }

    /// Integer identifier argument.
    pub fn id(&self, index: usize, field: &'static str) -> Result<u64, ExchangeError> {
        let raw = self.text(index, field)?;
        raw.parse::<u64>()
            .map_err(|_| ExchangeError::invalid(field, format!("{raw:?} is not an integer")))
    }
}

// =============================================================================
// ROUTER
// =============================================================================

/// Function map and record-type whitelist, built once.
#[derive(Debug, Clone)]
pub struct Router {
    whitelist: RecordTypeWhitelist,
    functions: HashMap<&'static str, Function>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            whitelist: RecordTypeWhitelist::new(),
            functions: Function::ALL.iter().map(|f| (f.name(), *f)).collect(),
        }
    }

    pub fn lookup(&self, name: &str) -> Option<Function> {
        self.functions.get(name).copied()
    }

    /// Resolve a request. The record-type gate runs first, so a request with
    /// no recognized token fails the same way whatever the function name.
    pub fn route<'a>(
        &self,
        name: &str,
        args: &[&'a str],
    ) -> Result<(Function, Args<'a>), ExchangeError> {
        let function = self.lookup(name);

        let gated = function.map_or(true, Function::requires_record_type);
        if gated && self.whitelist.find(args).is_none() {
            return Err(ExchangeError::InvalidRecordType(
                args.iter().map(|a| a.to_string()).collect(),
            ));
        }

        let function = function.ok_or_else(|| ExchangeError::InvalidFunction(name.to_string()))?;
        Ok((function, Args::new(function, args.to_vec())))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
