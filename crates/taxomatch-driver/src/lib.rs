//! taxomatch-driver
//!
//! Row-level plumbing around the matcher: reading and writing the delimited
//! catalog, and matching rows in parallel while keeping their order.

pub mod catalog;
pub mod driver;

pub use catalog::Catalog;
pub use driver::{match_row, match_rows};
