//! taxomatch-text
//!
//! Tantivy-based per-product indexing and category scoring. A
//! `ProductIndex` lives in RAM for exactly one catalog row.

pub mod error;
pub mod index;
pub mod scorer;
pub mod tantivy_utils;

pub use error::IndexError;
pub use index::ProductIndex;
