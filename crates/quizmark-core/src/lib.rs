//! quizmark-core — Quiz model, answer-key parsing, and scoring.
//!
//! This crate defines the fundamental data model, the answer-key parser,
//! the score calculator, and the session state machine that the rest of
//! the quizmark system builds on.

pub mod error;
pub mod export;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod session;
pub mod traits;
