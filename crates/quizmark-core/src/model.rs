//! Core data model types for quizmark.
//!
//! These are the fundamental types that the entire quizmark system uses
//! to represent questions, answer keys, and scored results.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four canonical answer letters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Choice {
    A,
    B,
    C,
    D,
}

impl Choice {
    /// Parse a single letter, case-insensitively.
    pub fn from_letter(c: char) -> Option<Choice> {
        match c.to_ascii_uppercase() {
            'A' => Some(Choice::A),
            'B' => Some(Choice::B),
            'C' => Some(Choice::C),
            'D' => Some(Choice::D),
            _ => None,
        }
    }

    /// Parse a positional digit via the fixed table 1→A, 2→B, 3→C, 4→D.
    pub fn from_digit(c: char) -> Option<Choice> {
        match c {
            '1' => Some(Choice::A),
            '2' => Some(Choice::B),
            '3' => Some(Choice::C),
            '4' => Some(Choice::D),
            _ => None,
        }
    }

    /// The canonical uppercase letter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::A => "A",
            Choice::B => "B",
            Choice::C => "C",
            Choice::D => "D",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Choice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Choice::from_letter(c).ok_or_else(|| format!("unknown answer letter: {s}"))
            }
            _ => Err(format!("unknown answer letter: {s}")),
        }
    }
}

/// A single question in the generated range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Question number, unique and contiguous within a quiz.
    pub id: u32,
    /// The user's selected answer, if any.
    #[serde(default)]
    pub user_answer: Option<Choice>,
}

impl Question {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            user_answer: None,
        }
    }
}

/// Mapping from question id to the designated correct letter.
///
/// May be sparse, and the bulk-text parse path may introduce ids outside
/// the current question range.
pub type AnswerKey = BTreeMap<u32, Choice>;

/// An incorrectly answered question, for the review list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncorrectAnswer {
    pub question_id: u32,
    pub user_answer: Choice,
    pub correct_answer: Choice,
}

/// An unattempted question with a known correct answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnattemptedQuestion {
    pub question_id: u32,
    pub correct_answer: Choice,
}

/// Immutable scored snapshot of one quiz session.
///
/// Created once per scoring action and superseded by a fresh instance on
/// reset or regenerate, never mutated in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    /// Points earned; one per correct answer.
    pub score: u32,
    /// Total number of questions in the generated range.
    pub total_possible_score: u32,
    pub correct_count: u32,
    pub incorrect_count: u32,
    pub unanswered_count: u32,
    /// Integer percentage in [0, 100]; 0 when nothing was attempted.
    pub accuracy: u32,
    /// Answered questions that missed a known correct answer, input order.
    pub incorrectly_answered: Vec<IncorrectAnswer>,
    /// Unanswered questions with a known correct answer, input order.
    pub unattempted_questions: Vec<UnattemptedQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choice_display_and_parse() {
        assert_eq!(Choice::A.to_string(), "A");
        assert_eq!(Choice::D.to_string(), "D");
        assert_eq!("a".parse::<Choice>().unwrap(), Choice::A);
        assert_eq!(" C ".parse::<Choice>().unwrap(), Choice::C);
        assert!("E".parse::<Choice>().is_err());
        assert!("AB".parse::<Choice>().is_err());
        assert!("".parse::<Choice>().is_err());
    }

    #[test]
    fn choice_from_digit_table() {
        assert_eq!(Choice::from_digit('1'), Some(Choice::A));
        assert_eq!(Choice::from_digit('2'), Some(Choice::B));
        assert_eq!(Choice::from_digit('3'), Some(Choice::C));
        assert_eq!(Choice::from_digit('4'), Some(Choice::D));
        assert_eq!(Choice::from_digit('5'), None);
        assert_eq!(Choice::from_digit('0'), None);
    }

    #[test]
    fn question_starts_unanswered() {
        let q = Question::new(7);
        assert_eq!(q.id, 7);
        assert!(q.user_answer.is_none());
    }

    #[test]
    fn quiz_result_serde_roundtrip() {
        let result = QuizResult {
            score: 1,
            total_possible_score: 3,
            correct_count: 1,
            incorrect_count: 1,
            unanswered_count: 1,
            accuracy: 50,
            incorrectly_answered: vec![IncorrectAnswer {
                question_id: 2,
                user_answer: Choice::B,
                correct_answer: Choice::C,
            }],
            unattempted_questions: vec![UnattemptedQuestion {
                question_id: 3,
                correct_answer: Choice::A,
            }],
        };
        let json = serde_json::to_string(&result).unwrap();
        let deserialized: QuizResult = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, result);
    }
}
