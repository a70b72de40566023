//! Stories context — writing projects and their chapters.

pub mod application;
pub mod domain;
