//! Domain types of the extractor: merchant records, the transaction view the
//! aggregator reads, the monthly summaries it produces, and the ports the
//! application layer talks through.

pub mod merchant;
pub mod ports;
pub mod summary;
pub mod transaction;
