//! The `quizmark check-key` command.

use anyhow::Result;

use quizmark_core::parser::{key_to_text, parse_answer_key};

pub fn execute(key: String, from: u32, to: u32) -> Result<()> {
    anyhow::ensure!(
        from <= to,
        "'from' question {from} is greater than 'to' question {to}"
    );

    let ids: Vec<u32> = (from..=to).collect();
    let parsed = parse_answer_key(&key, &ids)?;

    if parsed.is_empty() {
        println!("Key is empty ({} questions unkeyed).", ids.len());
        return Ok(());
    }

    println!("Key valid: {} of {} questions keyed.", parsed.len(), ids.len());
    println!("{}", key_to_text(&parsed));

    let outside: Vec<u32> = parsed
        .keys()
        .copied()
        .filter(|id| !ids.contains(id))
        .collect();
    if !outside.is_empty() {
        println!("Note: entries outside the range {from}-{to}: {outside:?}");
    }

    Ok(())
}
