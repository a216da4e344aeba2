//! quizmark-recommend — study-recommendation provider integrations.
//!
//! Implements the `Recommender` trait for OpenAI-compatible and Gemini
//! APIs, allowing quizmark to request study recommendations from multiple
//! hosted models.

pub mod config;
pub mod gemini;
pub mod mock;
pub mod openai;

pub use config::{create_recommender, load_config, QuizmarkConfig, RecommenderConfig};
