//! Application layer orchestrating an extraction run.
//!
//! `aggregator` reduces a merchant's transaction list into monthly summaries.
//! `extractor` drives a `MerchantGateway` across every merchant and assembles
//! the report handed to a `ReportSink`.

pub mod aggregator;
pub mod extractor;
