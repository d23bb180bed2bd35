//! Game session orchestration for the Curvytron client.
//!
//! Provides:
//! - `GameController` - Session lifecycle, input routing and exit guard
//! - `ScoreBoard` - Ranked avatar view kept in sync with remote scores
//! - `MemoryRepository` - In-memory holder of the current game

pub mod controller;
pub mod repository;
pub mod scoreboard;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use controller::{Decision, Entry, GameController, Phase, Teardown};
pub use repository::MemoryRepository;
pub use scoreboard::ScoreBoard;
