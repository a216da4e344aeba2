//! Recommendation collaborator error types.
//!
//! Defined in `quizmark-core` so callers can classify provider failures
//! for retry and degradation decisions without string matching.

use thiserror::Error;

/// Errors that can occur when calling a recommendation provider.
#[derive(Debug, Error)]
pub enum RecommendError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or missing API key).
    #[error("invalid API key: {0}")]
    InvalidApiKey(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    Network(String),

    /// The provider returned no usable content.
    #[error("provider returned an empty response")]
    EmptyResponse,
}

impl RecommendError {
    /// Returns `true` if this error is permanent and should not be retried.
    pub fn is_permanent(&self) -> bool {
        matches!(self, RecommendError::InvalidApiKey(_))
    }

    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            RecommendError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permanence_classification() {
        assert!(RecommendError::InvalidApiKey("bad key".into()).is_permanent());
        assert!(!RecommendError::Timeout(30).is_permanent());
        assert!(!RecommendError::RateLimited {
            retry_after_ms: 500
        }
        .is_permanent());
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        assert_eq!(
            RecommendError::RateLimited {
                retry_after_ms: 2000
            }
            .retry_after_ms(),
            Some(2000)
        );
        assert_eq!(RecommendError::EmptyResponse.retry_after_ms(), None);
    }
}
