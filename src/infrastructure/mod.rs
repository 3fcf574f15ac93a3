//! Gateway adapters: the merchant REST API over HTTP, and an in-memory
//! replay of recorded responses.

pub mod http;
pub mod in_memory;
