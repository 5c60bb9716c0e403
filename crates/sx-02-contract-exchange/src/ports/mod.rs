//! # Ports Layer (Middle Hexagon)
//!
//! - **Driving Port (Inbound)**: `ExchangeApi`
//! - **Driven Ports (Outbound)**: `Clock`, plus `TableStore` from sx-01

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
