//! Storyloom Core — shared domain model and abstractions.
//!
//! This crate defines the entity model, the repository traits every bounded
//! context persists through, and the error and access-control types they
//! share. It contains no infrastructure code.

pub mod access;
pub mod clock;
pub mod command;
pub mod error;
pub mod model;
pub mod repository;
pub mod validation;
