//! Domain layer for the Lore context.

pub mod commands;
