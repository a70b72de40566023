//! Search context — case-insensitive lookup across everything a user owns.

pub mod application;
pub mod domain;
