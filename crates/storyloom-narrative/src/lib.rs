//! Storyloom — Narrative context.
//!
//! Responsible for scenes and the choices that link them, including the
//! implicit choice chain maintained for linear stories.

pub mod application;
pub mod domain;
