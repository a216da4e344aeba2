//! The `quizmark init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizmark.toml").exists() {
        println!("quizmark.toml already exists, skipping.");
    } else {
        std::fs::write("quizmark.toml", SAMPLE_CONFIG)?;
        println!("Created quizmark.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizmark.toml with your API keys");
    println!("  2. Run: quizmark check-key --key \"1=A, 2=B\" --from 1 --to 5");
    println!("  3. Run: quizmark score --from 1 --to 5 --answers \"abcda\" --key \"abcdb\" --recommend");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizmark configuration

[providers.gemini]
type = "gemini"
api_key = "${GEMINI_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"
model = "gpt-4.1-mini"

default_provider = "gemini"
request_timeout_secs = 30
"#;
