//! # Domain Layer (Inner Hexagon)
//!
//! Records, value objects and the pure rules of the contract lifecycle.
//! NO I/O. Ledger access lives in the workflow and query handlers.

pub mod catalog;
pub mod invariants;
pub mod records;
pub mod services;
pub mod value_objects;

pub use catalog::*;
pub use invariants::*;
pub use records::*;
pub use services::*;
pub use value_objects::*;
