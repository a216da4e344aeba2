//! Score calculation.
//!
//! A pure function from a question list and an answer key to an immutable
//! [`QuizResult`]. No I/O, no failure modes.

use crate::model::{AnswerKey, IncorrectAnswer, Question, QuizResult, UnattemptedQuestion};

/// Score a question list against an answer key.
///
/// Per question, in input order:
///
/// - answered and matching a key entry: correct;
/// - answered otherwise: incorrect, listed for review only when a key entry
///   exists to display (an answered question with no key entry still counts
///   incorrect but cannot be reviewed);
/// - unanswered: listed as unattempted when a key entry exists, counted in
///   neither correct nor incorrect.
///
/// Accuracy is the share of attempted questions answered correctly, rounded
/// half-up to an integer percentage; 0 when nothing was attempted.
pub fn score(questions: &[Question], key: &AnswerKey) -> QuizResult {
    let mut correct_count = 0u32;
    let mut incorrect_count = 0u32;
    let mut incorrectly_answered = Vec::new();
    let mut unattempted_questions = Vec::new();

    for question in questions {
        let correct_answer = key.get(&question.id).copied();
        match (question.user_answer, correct_answer) {
            (Some(user), Some(correct)) if user == correct => correct_count += 1,
            (Some(user), Some(correct)) => {
                incorrect_count += 1;
                incorrectly_answered.push(IncorrectAnswer {
                    question_id: question.id,
                    user_answer: user,
                    correct_answer: correct,
                });
            }
            (Some(_), None) => incorrect_count += 1,
            (None, Some(correct)) => unattempted_questions.push(UnattemptedQuestion {
                question_id: question.id,
                correct_answer: correct,
            }),
            (None, None) => {}
        }
    }

    let total = questions.len() as u32;
    let attempted = correct_count + incorrect_count;
    let accuracy = if attempted > 0 {
        (f64::from(correct_count) / f64::from(attempted) * 100.0).round() as u32
    } else {
        0
    };

    QuizResult {
        score: correct_count,
        total_possible_score: total,
        correct_count,
        incorrect_count,
        unanswered_count: total - attempted,
        accuracy,
        incorrectly_answered,
        unattempted_questions,
    }
}
