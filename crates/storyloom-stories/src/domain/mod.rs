//! Domain layer for the Stories context.

pub mod commands;
