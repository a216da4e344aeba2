//! Mock recommender for testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use quizmark_core::error::RecommendError;
use quizmark_core::traits::{RecommendationRequest, RecommendationResponse, Recommender};

/// A mock recommender for exercising callers without real API calls.
///
/// Returns a fixed recommendation list, or always fails, and records the
/// requests it receives.
pub struct MockRecommender {
    recommendations: Vec<String>,
    fail: bool,
    call_count: AtomicU32,
    last_request: Mutex<Option<RecommendationRequest>>,
}

impl MockRecommender {
    /// A mock that always returns the given recommendations.
    pub fn with_recommendations(recommendations: Vec<String>) -> Self {
        Self {
            recommendations,
            fail: false,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// A mock whose every call fails, for degradation paths.
    pub fn failing() -> Self {
        Self {
            recommendations: Vec::new(),
            fail: true,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Number of calls made to this recommender.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// The last request received, if any.
    pub fn last_request(&self) -> Option<RecommendationRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl Recommender for MockRecommender {
    fn name(&self) -> &str {
        "mock"
    }

    async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> anyhow::Result<RecommendationResponse> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self.last_request.lock().unwrap() = Some(request.clone());

        if self.fail {
            return Err(RecommendError::Network("mock failure".to_string()).into());
        }

        Ok(RecommendationResponse {
            recommendations: self.recommendations.clone(),
            model: "mock-model".to_string(),
            latency_ms: 1,
        })
    }
}
