//! Store-level integration tests: interval queries over a populated store,
//! cardinality terminals, index maintenance and configuration.

#[path = "../common/mod.rs"]
mod common;

mod edges;
mod flat_cache;
mod indexes;
mod properties;
