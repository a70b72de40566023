//! Application layer for the Lore context.

pub mod command_handlers;
pub mod query_handlers;
