//! taxomatch-core
//!
//! Domain types, configuration and the taxonomy loader shared by the text
//! engine and the row driver. The match aggregator lives here too since it
//! only needs the `CategoryScorer` seam, not a concrete index.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod matching;
pub mod taxonomy;
pub mod traits;
pub mod types;
