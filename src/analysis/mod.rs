//! Analysis modules.
//!
//! Summary statistics and recommendations derived from the record list.

pub mod aggregator;

pub use aggregator::*;
