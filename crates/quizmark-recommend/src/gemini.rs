//! Gemini API recommender implementation.
//!
//! Speaks the `generateContent` wire format and is the default provider.

use std::time::Instant;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quizmark_core::error::RecommendError;
use quizmark_core::traits::{
    extract_recommendations, RecommendationRequest, RecommendationResponse, Recommender,
    TUTOR_SYSTEM_PROMPT,
};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Recommender backed by the Gemini `generateContent` API.
pub struct GeminiRecommender {
    api_key: String,
    base_url: String,
    model: String,
    client: reqwest::Client,
}

impl GeminiRecommender {
    pub fn new(api_key: &str, base_url: Option<String>, model: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("failed to build HTTP client");

        Self {
            api_key: api_key.to_string(),
            base_url: base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            client,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    system_instruction: GeminiContent,
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize)]
struct GeminiContent {
    parts: Vec<GeminiPart>,
}

#[derive(Serialize, Deserialize)]
struct GeminiPart {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f64,
}

#[derive(Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(rename = "modelVersion", default)]
    model_version: Option<String>,
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: GeminiContent,
}

fn text_content(text: String) -> GeminiContent {
    GeminiContent {
        parts: vec![GeminiPart { text }],
    }
}

#[async_trait]
impl Recommender for GeminiRecommender {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(skip(self, request), fields(model = %self.model))]
    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> anyhow::Result<RecommendationResponse> {
        let start = Instant::now();

        let user_turn = format!(
            "Quiz Answers: {}\nCorrect Answers: {}",
            serde_json::json!(request.quiz_answers),
            serde_json::json!(request.correct_answers),
        );
        let body = GeminiRequest {
            system_instruction: text_content(TUTOR_SYSTEM_PROMPT.to_string()),
            contents: vec![text_content(user_turn)],
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    RecommendError::Timeout(DEFAULT_TIMEOUT_SECS)
                } else {
                    RecommendError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status == 429 {
            return Err(RecommendError::RateLimited {
                retry_after_ms: 5000,
            }
            .into());
        }
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::InvalidApiKey(body).into());
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(RecommendError::ApiError {
                status,
                message: body,
            }
            .into());
        }

        let api_response: GeminiResponse =
            response.json().await.map_err(|e| RecommendError::ApiError {
                status: 0,
                message: format!("failed to parse response: {e}"),
            })?;

        let latency_ms = start.elapsed().as_millis() as u64;
        let content: String = api_response
            .candidates
            .first()
            .map(|c| {
                c.content
                    .parts
                    .iter()
                    .map(|p| p.text.as_str())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .ok_or(RecommendError::EmptyResponse)?;

        Ok(RecommendationResponse {
            recommendations: extract_recommendations(&content),
            model: api_response
                .model_version
                .unwrap_or_else(|| self.model.clone()),
            latency_ms,
        })
    }
}
