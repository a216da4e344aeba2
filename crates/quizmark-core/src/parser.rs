//! Free-form answer-key parsing.
//!
//! Turns a single text field into a validated [`AnswerKey`], or fails with
//! a reason naming the offending input. Parsing is atomic: a candidate map
//! is built locally and nothing is applied on failure.

use thiserror::Error;

use crate::model::{AnswerKey, Choice};

/// A recoverable answer-key parse failure.
///
/// The caller keeps its previous key unchanged whenever one of these is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// A key=value segment that does not match `digits = letter`.
    #[error("invalid answer key entry: {0:?}")]
    InvalidEntry(String),

    /// A positional character outside A-D / 1-4.
    #[error("invalid answer character: {0:?}")]
    InvalidCharacter(char),

    /// More positional answers than questions in the current range.
    #[error("{given} answers provided but only {available} questions exist")]
    TooManyAnswers { given: usize, available: usize },
}

/// Parse free-form answer-key text against the current question ids.
///
/// Two notations, selected by the presence of `=` in the trimmed input:
///
/// - **Key=value** (`"1=A, 2=b"`): comma-separated segments of
///   `digits = letter`, whitespace around `=` allowed, letters
///   case-insensitive. Later duplicates of a question number overwrite
///   earlier ones. Question numbers outside `question_ids` are permitted.
/// - **Compact positional** (`"abcd"`, `"1234"`, `"A,B,C"`): commas are
///   stripped and each remaining character maps onto `question_ids` in
///   order, as a letter A-D or a digit 1-4. More characters than ids is
///   rejected up front; fewer leaves the trailing ids unset.
///
/// Empty or whitespace-only input succeeds with an empty key.
pub fn parse_answer_key(raw: &str, question_ids: &[u32]) -> Result<AnswerKey, ParseError> {
    let input = raw.trim();
    let mut key = AnswerKey::new();

    if input.is_empty() {
        return Ok(key);
    }

    if input.contains('=') {
        for segment in input.split(',') {
            if segment.trim().is_empty() {
                continue;
            }
            let (number, choice) = parse_entry(segment)
                .ok_or_else(|| ParseError::InvalidEntry(segment.to_string()))?;
            key.insert(number, choice);
        }
        return Ok(key);
    }

    let compact: String = input.chars().filter(|&c| c != ',').collect();
    if compact.chars().count() > question_ids.len() {
        return Err(ParseError::TooManyAnswers {
            given: compact.chars().count(),
            available: question_ids.len(),
        });
    }

    for (c, &id) in compact.chars().zip(question_ids) {
        let choice = Choice::from_letter(c)
            .or_else(|| Choice::from_digit(c))
            .ok_or(ParseError::InvalidCharacter(c))?;
        key.insert(id, choice);
    }

    Ok(key)
}

/// Parse one `digits = letter` segment, or `None` if it does not match.
fn parse_entry(segment: &str) -> Option<(u32, Choice)> {
    let (lhs, rhs) = segment.trim().split_once('=')?;
    let lhs = lhs.trim();
    if lhs.is_empty() || !lhs.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let number = lhs.parse::<u32>().ok()?;

    let rhs = rhs.trim();
    let mut chars = rhs.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Choice::from_letter(c).map(|choice| (number, choice)),
        _ => None,
    }
}

/// Serialize a key in canonical `1=A, 2=B` form.
///
/// Feeding the output back through [`parse_answer_key`] yields an equal
/// mapping.
pub fn key_to_text(key: &AnswerKey) -> String {
    key.iter()
        .map(|(id, choice)| format!("{id}={choice}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn key_value_notation() {
        let key = parse_answer_key("1=A, 2=B, 3=C", &ids(3)).unwrap();
        assert_eq!(key.get(&1), Some(&Choice::A));
        assert_eq!(key.get(&2), Some(&Choice::B));
        assert_eq!(key.get(&3), Some(&Choice::C));
    }

    #[test]
    fn key_value_case_insensitive_and_spaced() {
        let key = parse_answer_key("1 = a,2=  d", &ids(2)).unwrap();
        assert_eq!(key.get(&1), Some(&Choice::A));
        assert_eq!(key.get(&2), Some(&Choice::D));
    }

    #[test]
    fn key_value_last_write_wins() {
        let key = parse_answer_key("1=A, 1=C", &ids(1)).unwrap();
        assert_eq!(key.get(&1), Some(&Choice::C));
        assert_eq!(key.len(), 1);
    }

    #[test]
    fn key_value_blank_segments_skipped() {
        let key = parse_answer_key("1=A,, 2=B,", &ids(2)).unwrap();
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn key_value_permits_ids_outside_range() {
        let key = parse_answer_key("99=D", &ids(3)).unwrap();
        assert_eq!(key.get(&99), Some(&Choice::D));
    }

    #[test]
    fn key_value_invalid_letter_names_segment() {
        let err = parse_answer_key("1=Z", &ids(3)).unwrap_err();
        assert_eq!(err, ParseError::InvalidEntry("1=Z".into()));
        assert!(err.to_string().contains("1=Z"));
    }

    #[test]
    fn key_value_invalid_segment_rejects_whole_parse() {
        let err = parse_answer_key("1=A, x=B", &ids(3)).unwrap_err();
        assert_eq!(err, ParseError::InvalidEntry(" x=B".into()));
    }

    #[test]
    fn key_value_multi_letter_rhs_rejected() {
        assert!(parse_answer_key("1=AB", &ids(3)).is_err());
    }

    #[test]
    fn key_value_signed_number_rejected() {
        // "+1" parses as a u32 but is not a digits-only question number.
        assert!(parse_answer_key("+1=A", &ids(3)).is_err());
    }

    #[test]
    fn positional_letters() {
        let key = parse_answer_key("abcd", &ids(4)).unwrap();
        assert_eq!(key.get(&1), Some(&Choice::A));
        assert_eq!(key.get(&2), Some(&Choice::B));
        assert_eq!(key.get(&3), Some(&Choice::C));
        assert_eq!(key.get(&4), Some(&Choice::D));
    }

    #[test]
    fn positional_digits() {
        let key = parse_answer_key("1234", &ids(4)).unwrap();
        assert_eq!(key.get(&1), Some(&Choice::A));
        assert_eq!(key.get(&4), Some(&Choice::D));
    }

    #[test]
    fn positional_commas_stripped() {
        let key = parse_answer_key("A,B,C", &ids(3)).unwrap();
        assert_eq!(key.len(), 3);
        assert_eq!(key.get(&3), Some(&Choice::C));
    }

    #[test]
    fn positional_maps_onto_actual_ids() {
        let key = parse_answer_key("ab", &[10, 20, 30]).unwrap();
        assert_eq!(key.get(&10), Some(&Choice::A));
        assert_eq!(key.get(&20), Some(&Choice::B));
        assert!(!key.contains_key(&30));
    }

    #[test]
    fn positional_fewer_answers_than_questions() {
        let key = parse_answer_key("ab", &ids(4)).unwrap();
        assert_eq!(key.len(), 2);
    }

    #[test]
    fn positional_too_many_answers() {
        let err = parse_answer_key("abcde", &ids(4)).unwrap_err();
        assert_eq!(
            err,
            ParseError::TooManyAnswers {
                given: 5,
                available: 4
            }
        );
    }

    #[test]
    fn positional_invalid_character_named() {
        let err = parse_answer_key("abx", &ids(4)).unwrap_err();
        assert_eq!(err, ParseError::InvalidCharacter('x'));
    }

    #[test]
    fn positional_interior_space_rejected() {
        assert_eq!(
            parse_answer_key("a b", &ids(4)).unwrap_err(),
            ParseError::InvalidCharacter(' ')
        );
    }

    #[test]
    fn empty_input_yields_empty_key() {
        assert!(parse_answer_key("", &ids(4)).unwrap().is_empty());
        assert!(parse_answer_key("   \n ", &ids(4)).unwrap().is_empty());
    }

    #[test]
    fn serialization_roundtrip_is_idempotent() {
        let key = parse_answer_key("3=C, 1=a, 2=B", &ids(3)).unwrap();
        let text = key_to_text(&key);
        assert_eq!(text, "1=A, 2=B, 3=C");
        let reparsed = parse_answer_key(&text, &ids(3)).unwrap();
        assert_eq!(reparsed, key);
    }

    #[test]
    fn key_to_text_empty() {
        assert_eq!(key_to_text(&AnswerKey::new()), "");
    }
}
