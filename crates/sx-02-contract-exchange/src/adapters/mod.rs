//! # Adapters Layer (Outer Hexagon)

pub mod clock;

pub use clock::*;
