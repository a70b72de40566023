//! Application layer for the Search context.

pub mod query_handlers;
