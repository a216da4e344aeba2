//! The `quizmark score` command.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use comfy_table::Table;

use quizmark_core::export::render_review;
use quizmark_core::model::QuizResult;
use quizmark_core::parser::parse_answer_key;
use quizmark_core::session::QuizSession;
use quizmark_core::traits::RecommendationRequest;
use quizmark_recommend::config::load_config_from;
use quizmark_recommend::create_recommender;

#[allow(clippy::too_many_arguments)]
pub async fn execute(
    from: u32,
    to: u32,
    answers: String,
    key: String,
    recommend: bool,
    provider: Option<String>,
    export: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut session = QuizSession::new();
    session.generate(from, to)?;

    // User answers accept the same notations as the key; questions without
    // an entry stay unanswered.
    let ids = session.question_ids();
    let user_answers =
        parse_answer_key(&answers, &ids).context("failed to parse --answers")?;
    for (id, choice) in &user_answers {
        session
            .answer(*id, Some(*choice))
            .with_context(|| format!("--answers names question {id}"))?;
    }

    session
        .apply_key_text(&key)
        .context("failed to parse --key")?;

    let request =
        RecommendationRequest::from_questions(session.questions(), session.answer_key());
    let result = session.finalize()?.clone();

    print_summary(&result);

    let review = render_review(&result);
    match &export {
        Some(path) => {
            std::fs::write(path, &review)
                .with_context(|| format!("failed to write review to {}", path.display()))?;
            eprintln!("Review saved to: {}", path.display());
        }
        None => print!("{review}"),
    }

    if recommend {
        let token = session.token();
        let recommendations = fetch_recommendations(&request, provider, config_path).await;
        // A reset would have bumped the token; stale responses are dropped.
        if session.is_current(token) {
            print_recommendations(&recommendations);
        }
    }

    Ok(())
}

/// Call the configured provider, degrading to an empty list on any failure.
async fn fetch_recommendations(
    request: &RecommendationRequest,
    provider: Option<String>,
    config_path: Option<PathBuf>,
) -> Vec<String> {
    if !request.has_incorrect_answers() {
        return Vec::new();
    }

    let config = match load_config_from(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Recommendations unavailable: {e:#}");
            return Vec::new();
        }
    };

    let provider_name = provider.unwrap_or_else(|| config.default_provider.clone());
    let Some(provider_config) = config.providers.get(&provider_name) else {
        eprintln!(
            "Recommendations unavailable: provider '{}' not found in config. Available: {:?}",
            provider_name,
            config.providers.keys().collect::<Vec<_>>()
        );
        return Vec::new();
    };

    let recommender = match create_recommender(provider_config) {
        Ok(recommender) => recommender,
        Err(e) => {
            eprintln!("Recommendations unavailable: {e:#}");
            return Vec::new();
        }
    };

    let timeout = Duration::from_secs(config.request_timeout_secs);
    match tokio::time::timeout(timeout, recommender.recommend(request)).await {
        Ok(Ok(response)) => {
            tracing::info!(
                model = %response.model,
                latency_ms = response.latency_ms,
                count = response.recommendations.len(),
                "recommendations received"
            );
            response.recommendations
        }
        Ok(Err(e)) => {
            eprintln!("Recommendations unavailable: {e:#}");
            Vec::new()
        }
        Err(_) => {
            eprintln!(
                "Recommendations unavailable: timed out after {}s",
                config.request_timeout_secs
            );
            Vec::new()
        }
    }
}

fn print_summary(result: &QuizResult) {
    let mut table = Table::new();
    table.set_header(vec![
        "Score",
        "Correct",
        "Incorrect",
        "Unanswered",
        "Accuracy",
    ]);
    table.add_row(vec![
        format!("{}/{}", result.score, result.total_possible_score),
        result.correct_count.to_string(),
        result.incorrect_count.to_string(),
        result.unanswered_count.to_string(),
        format!("{}%", result.accuracy),
    ]);

    println!("{table}");
}

fn print_recommendations(recommendations: &[String]) {
    if recommendations.is_empty() {
        println!("\nNo recommendations.");
        return;
    }
    println!("\nStudy recommendations:");
    for recommendation in recommendations {
        println!("  - {recommendation}");
    }
}
