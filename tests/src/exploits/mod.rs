//! Hostile or careless callers.

pub mod bid_race;
pub mod router_gate;
