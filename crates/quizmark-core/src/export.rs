//! Plain-text review export.
//!
//! Renders the itemized review lists of a [`QuizResult`] as the exportable
//! text surface, one line per question.

use std::fmt::Write;

use crate::model::QuizResult;

const CONGRATULATIONS: &str =
    "Congratulations! Every answered question was correct and none were left unattempted.";

/// Render the review lists, one line each.
///
/// Incorrect answers come first in question order, then unattempted
/// questions. When both lists are empty the output is a single
/// congratulatory line.
pub fn render_review(result: &QuizResult) -> String {
    if result.incorrectly_answered.is_empty() && result.unattempted_questions.is_empty() {
        return format!("{CONGRATULATIONS}\n");
    }

    let mut out = String::new();
    for item in &result.incorrectly_answered {
        let _ = writeln!(
            out,
            "Question {}: Your answer was {}, the correct answer was {}",
            item.question_id, item.user_answer, item.correct_answer
        );
    }
    for item in &result.unattempted_questions {
        let _ = writeln!(
            out,
            "Question {}: The correct answer was {}",
            item.question_id, item.correct_answer
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnswerKey, Choice, Question};
    use crate::scoring::score;

    fn question(id: u32, answer: Option<Choice>) -> Question {
        Question {
            id,
            user_answer: answer,
        }
    }

    #[test]
    fn renders_both_lists_in_order() {
        let questions = vec![
            question(1, Some(Choice::B)),
            question(2, None),
            question(3, Some(Choice::D)),
        ];
        let key: AnswerKey = [(1, Choice::A), (2, Choice::C), (3, Choice::D)]
            .into_iter()
            .collect();

        let text = render_review(&score(&questions, &key));
        assert_eq!(
            text,
            "Question 1: Your answer was B, the correct answer was A\n\
             Question 2: The correct answer was C\n"
        );
    }

    #[test]
    fn congratulatory_line_when_nothing_to_review() {
        let questions = vec![question(1, Some(Choice::A))];
        let key: AnswerKey = [(1, Choice::A)].into_iter().collect();

        let text = render_review(&score(&questions, &key));
        assert!(text.starts_with("Congratulations"));
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn answered_without_key_entry_is_not_exported() {
        // Counts incorrect but there is no correct answer to display.
        let questions = vec![question(1, Some(Choice::A))];
        let text = render_review(&score(&questions, &AnswerKey::new()));
        assert!(text.starts_with("Congratulations"));
    }
}
