//! Whole-lifecycle flows driven through the host entry points.

pub mod flows;
pub mod settlement;
