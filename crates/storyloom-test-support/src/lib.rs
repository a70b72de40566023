//! Shared test doubles and fixtures for Storyloom.

mod clock;
pub mod fixtures;
mod repository;

pub use clock::{FixedClock, SteppingClock};
pub use repository::{FailingStore, InMemoryLore, InMemoryStore};
