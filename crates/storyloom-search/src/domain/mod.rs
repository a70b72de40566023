//! Domain layer for the Search context.

pub mod hits;
