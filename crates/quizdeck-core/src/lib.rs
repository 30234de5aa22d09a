//! quizdeck-core — Data model and client-side state machines.
//!
//! This crate defines the quiz data model, the error taxonomy, the
//! `QuizApi` seam, and the quiz session / flashcard review state machines
//! that the rest of quizdeck builds on.

pub mod error;
pub mod leaderboard;
pub mod model;
pub mod review;
pub mod runner;
pub mod session;
pub mod timer;
pub mod traits;

pub use error::QuizError;
