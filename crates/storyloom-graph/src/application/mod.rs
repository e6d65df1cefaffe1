//! Application layer for graph projection.

pub mod query_handlers;
