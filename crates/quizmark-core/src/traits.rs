//! The recommendation-collaborator boundary.
//!
//! The async trait here is implemented by the `quizmark-recommend` crate.
//! Scoring never depends on it: a slow, failing, or empty collaborator
//! degrades to "no recommendations" at the call site.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::model::{AnswerKey, Question};

/// Trait for backends that turn quiz answers into study recommendations.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Human-readable backend name (e.g. "openai").
    fn name(&self) -> &str;

    /// Produce study recommendations for a finished quiz.
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> anyhow::Result<RecommendationResponse>;
}

/// Input handed to the recommendation collaborator.
///
/// Keys are question numbers as strings, values canonical answer letters.
/// Only questions the user actually answered appear in `quiz_answers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub quiz_answers: BTreeMap<String, String>,
    pub correct_answers: BTreeMap<String, String>,
}

impl RecommendationRequest {
    /// Build a request from the session's questions and answer key.
    pub fn from_questions(questions: &[Question], key: &AnswerKey) -> Self {
        let quiz_answers = questions
            .iter()
            .filter_map(|q| {
                q.user_answer
                    .map(|answer| (q.id.to_string(), answer.to_string()))
            })
            .collect();
        let correct_answers = key
            .iter()
            .map(|(id, choice)| (id.to_string(), choice.to_string()))
            .collect();
        Self {
            quiz_answers,
            correct_answers,
        }
    }

    /// Whether any answered question misses its known correct answer.
    ///
    /// With nothing answered incorrectly there is nothing to recommend and
    /// the collaborator call can be skipped.
    pub fn has_incorrect_answers(&self) -> bool {
        self.quiz_answers.iter().any(|(id, answer)| {
            self.correct_answers
                .get(id)
                .is_some_and(|correct| correct != answer)
        })
    }
}

/// Output of a recommendation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationResponse {
    /// Free-text study recommendations; may be empty.
    pub recommendations: Vec<String>,
    /// Model that produced the response.
    pub model: String,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// System prompt for recommendation providers.
pub const TUTOR_SYSTEM_PROMPT: &str = "You are an expert tutor. Based on the student's quiz answers, provide a list of study recommendations to help them improve their understanding of the material. Consider only the questions the student answered incorrectly. Respond with a JSON array of recommendation strings and nothing else.";

/// Extract a recommendation list from free-form model output.
///
/// Handles, in order of preference:
/// - a JSON array of strings (bare or inside a ```json fence)
/// - a JSON object with a `recommendations` array
/// - bulleted or numbered lines
/// - plain non-empty lines
pub fn extract_recommendations(content: &str) -> Vec<String> {
    let body = strip_code_fence(content.trim());

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let items = match &value {
            serde_json::Value::Array(items) => Some(items),
            serde_json::Value::Object(map) => map.get("recommendations").and_then(|v| v.as_array()),
            _ => None,
        };
        if let Some(items) = items {
            return items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    body.lines()
        .map(strip_list_marker)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Strip a surrounding markdown code fence, if the whole body is fenced.
fn strip_code_fence(body: &str) -> &str {
    let Some(rest) = body.strip_prefix("```") else {
        return body;
    };
    let Some(inner) = rest.strip_suffix("```") else {
        return body;
    };
    // Drop the info string ("json", "text", ...) on the opening fence line.
    match inner.split_once('\n') {
        Some((_, fenced)) => fenced.trim(),
        None => inner.trim(),
    }
}

/// Strip a leading bullet or `1.` / `1)` numbering from a line.
fn strip_list_marker(line: &str) -> &str {
    let trimmed = line.trim_start();
    for marker in ["- ", "* ", "• "] {
        if let Some(rest) = trimmed.strip_prefix(marker) {
            return rest;
        }
    }
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &trimmed[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest;
        }
    }
    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Choice;

    #[test]
    fn request_includes_only_answered_questions() {
        let questions = vec![
            Question {
                id: 1,
                user_answer: Some(Choice::A),
            },
            Question {
                id: 2,
                user_answer: None,
            },
            Question {
                id: 3,
                user_answer: Some(Choice::C),
            },
        ];
        let key: AnswerKey = [(1, Choice::A), (2, Choice::B), (3, Choice::D)]
            .into_iter()
            .collect();

        let request = RecommendationRequest::from_questions(&questions, &key);
        assert_eq!(request.quiz_answers.len(), 2);
        assert_eq!(request.quiz_answers.get("1"), Some(&"A".to_string()));
        assert!(!request.quiz_answers.contains_key("2"));
        assert_eq!(request.correct_answers.len(), 3);
    }

    #[test]
    fn has_incorrect_answers() {
        let all_correct = RecommendationRequest {
            quiz_answers: [("1".to_string(), "A".to_string())].into_iter().collect(),
            correct_answers: [("1".to_string(), "A".to_string())].into_iter().collect(),
        };
        assert!(!all_correct.has_incorrect_answers());

        let one_wrong = RecommendationRequest {
            quiz_answers: [("1".to_string(), "B".to_string())].into_iter().collect(),
            correct_answers: [("1".to_string(), "A".to_string())].into_iter().collect(),
        };
        assert!(one_wrong.has_incorrect_answers());

        // An answered question with no key entry is ungraded here.
        let unkeyed = RecommendationRequest {
            quiz_answers: [("1".to_string(), "B".to_string())].into_iter().collect(),
            correct_answers: BTreeMap::new(),
        };
        assert!(!unkeyed.has_incorrect_answers());
    }

    #[test]
    fn extract_json_array() {
        let content = r#"["Review chapter 3", "Practice integrals"]"#;
        assert_eq!(
            extract_recommendations(content),
            vec!["Review chapter 3", "Practice integrals"]
        );
    }

    #[test]
    fn extract_fenced_json_array() {
        let content = "```json\n[\"Review chapter 3\"]\n```";
        assert_eq!(extract_recommendations(content), vec!["Review chapter 3"]);
    }

    #[test]
    fn extract_recommendations_object() {
        let content = r#"{"recommendations": ["Re-read the unit on forces"]}"#;
        assert_eq!(
            extract_recommendations(content),
            vec!["Re-read the unit on forces"]
        );
    }

    #[test]
    fn extract_bulleted_lines() {
        let content = "- Review chapter 3\n* Practice integrals\n• Watch the lecture again";
        assert_eq!(
            extract_recommendations(content),
            vec![
                "Review chapter 3",
                "Practice integrals",
                "Watch the lecture again"
            ]
        );
    }

    #[test]
    fn extract_numbered_lines() {
        let content = "1. Review chapter 3\n2) Practice integrals";
        assert_eq!(
            extract_recommendations(content),
            vec!["Review chapter 3", "Practice integrals"]
        );
    }

    #[test]
    fn extract_plain_lines_fallback() {
        let content = "Review chapter 3\n\nPractice integrals\n";
        assert_eq!(
            extract_recommendations(content),
            vec!["Review chapter 3", "Practice integrals"]
        );
    }

    #[test]
    fn extract_empty_content() {
        assert!(extract_recommendations("").is_empty());
        assert!(extract_recommendations("```json\n[]\n```").is_empty());
    }

    #[test]
    fn extract_skips_non_string_array_items() {
        let content = r#"["Review chapter 3", 42, null]"#;
        assert_eq!(extract_recommendations(content), vec!["Review chapter 3"]);
    }
}
