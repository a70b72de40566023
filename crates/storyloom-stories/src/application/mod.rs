//! Application layer for the Stories context.

pub mod command_handlers;
pub mod query_handlers;
