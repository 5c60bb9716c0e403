pub mod api;
pub mod ledger;

pub use api::*;
pub use ledger::*;
