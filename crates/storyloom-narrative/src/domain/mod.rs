//! Domain layer for the Narrative context.

pub mod commands;
pub mod implicit_chain;
pub mod manuscript;
