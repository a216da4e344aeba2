//! quizmark CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "quizmark", version, about = "Self-quiz scoring and study recommendations")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a quiz: answers + key in, result report out
    Score {
        /// First question number in the range
        #[arg(long, default_value = "1")]
        from: u32,

        /// Last question number in the range
        #[arg(long, default_value = "5")]
        to: u32,

        /// Your answers, e.g. "1=A, 2=B" or "abd" (unlisted questions stay unanswered)
        #[arg(long)]
        answers: String,

        /// The answer key, same notations as --answers
        #[arg(long)]
        key: String,

        /// Request AI study recommendations for incorrect answers
        #[arg(long)]
        recommend: bool,

        /// Recommendation provider name (defaults to the configured one)
        #[arg(long)]
        provider: Option<String>,

        /// Write the review text to a file instead of stdout
        #[arg(long)]
        export: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Validate answer-key text against a question range
    CheckKey {
        /// The answer-key text to validate
        #[arg(long)]
        key: String,

        /// First question number in the range
        #[arg(long, default_value = "1")]
        from: u32,

        /// Last question number in the range
        #[arg(long, default_value = "5")]
        to: u32,
    },

    /// Create a starter config file
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizmark=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Score {
            from,
            to,
            answers,
            key,
            recommend,
            provider,
            export,
            config,
        } => {
            commands::score::execute(from, to, answers, key, recommend, provider, export, config)
                .await
        }
        Commands::CheckKey { key, from, to } => commands::check_key::execute(key, from, to),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
