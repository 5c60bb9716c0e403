//! # Inbound Port
//!
//! Request surface offered to the host platform: a function name plus an
//! ordered list of string arguments.

use crate::errors::ExchangeError;

/// Primary API of the exchange.
///
/// Both entry points return the response bytes. Recoverable failures come
/// back as `Ok` with an `{"Error": ...}` body; `Err` is reserved for fatal
/// failures the host must not paper over.
pub trait ExchangeApi: Send + Sync {
    /// Run a write function (`PostRequest`, `PostBid`, ...).
    fn invoke(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ExchangeError>;

    /// Run a read function (`GetUser`, `GetContract`, ...).
    fn query(&self, function: &str, args: &[String]) -> Result<Vec<u8>, ExchangeError>;
}
