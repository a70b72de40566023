//! Lore context — the worldbuilding entries attached to a story.
//!
//! All six entry kinds share one set of handlers, generic over
//! [`storyloom_core::model::LoreEntry`].

pub mod application;
pub mod domain;
