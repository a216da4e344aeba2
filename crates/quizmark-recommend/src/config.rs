//! Recommender configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizmark_core::traits::Recommender;

use crate::gemini::GeminiRecommender;
use crate::openai::OpenAiRecommender;

/// Configuration for a single recommendation provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RecommenderConfig {
    OpenAI {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
    Gemini {
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
        #[serde(default)]
        model: Option<String>,
    },
}

impl std::fmt::Debug for RecommenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecommenderConfig::OpenAI {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
            RecommenderConfig::Gemini {
                api_key: _,
                base_url,
                model,
            } => f
                .debug_struct("Gemini")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .field("model", model)
                .finish(),
        }
    }
}

/// Top-level quizmark configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizmarkConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, RecommenderConfig>,
    /// Default provider to use for recommendations.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Hard cap on how long one recommendation round-trip may take.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_provider() -> String {
    "gemini".to_string()
}
fn default_request_timeout() -> u64 {
    30
}

impl Default for QuizmarkConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            request_timeout_secs: default_request_timeout(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Resolve env vars in a provider config.
fn resolve_recommender_config(config: &RecommenderConfig) -> RecommenderConfig {
    match config {
        RecommenderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => RecommenderConfig::OpenAI {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
        RecommenderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => RecommenderConfig::Gemini {
            api_key: resolve_env_vars(api_key),
            base_url: base_url.as_ref().map(|u| resolve_env_vars(u)),
            model: model.clone(),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizmark.toml` in the current directory
/// 2. `~/.config/quizmark/config.toml`
///
/// Environment variable overrides: `QUIZMARK_OPENAI_KEY`, `QUIZMARK_GEMINI_KEY`.
pub fn load_config() -> Result<QuizmarkConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizmarkConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizmark.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<QuizmarkConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizmarkConfig::default(),
    };

    // Apply env var overrides
    if let Ok(key) = std::env::var("QUIZMARK_GEMINI_KEY") {
        config
            .providers
            .entry("gemini".into())
            .or_insert(RecommenderConfig::Gemini {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(RecommenderConfig::Gemini { api_key, .. }) = config.providers.get_mut("gemini")
        {
            *api_key = key;
        }
    }

    if let Ok(key) = std::env::var("QUIZMARK_OPENAI_KEY") {
        config
            .providers
            .entry("openai".into())
            .or_insert(RecommenderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
                model: None,
            });
        if let Some(RecommenderConfig::OpenAI { api_key, .. }) = config.providers.get_mut("openai")
        {
            *api_key = key;
        }
    }

    // Resolve env vars in all provider configs
    let resolved: HashMap<String, RecommenderConfig> = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_recommender_config(v)))
        .collect();
    config.providers = resolved;

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizmark"))
}

/// Create a recommender instance from its configuration.
pub fn create_recommender(config: &RecommenderConfig) -> Result<Box<dyn Recommender>> {
    match config {
        RecommenderConfig::OpenAI {
            api_key,
            base_url,
            model,
        } => Ok(Box::new(OpenAiRecommender::new(
            api_key,
            base_url.clone(),
            model.clone(),
        ))),
        RecommenderConfig::Gemini {
            api_key,
            base_url,
            model,
        } => Ok(Box::new(GeminiRecommender::new(
            api_key,
            base_url.clone(),
            model.clone(),
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_QUIZMARK_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_QUIZMARK_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_QUIZMARK_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        std::env::remove_var("_QUIZMARK_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = QuizmarkConfig::default();
        assert_eq!(config.default_provider, "gemini");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.providers.is_empty());
    }

    #[test]
    fn parse_provider_config() {
        let toml_str = r#"
default_provider = "gemini"
request_timeout_secs = 10

[providers.gemini]
type = "gemini"
api_key = "test-gemini"

[providers.openai]
type = "openai"
api_key = "test-openai"
model = "gpt-4.1-mini"
"#;
        let config: QuizmarkConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.providers.len(), 2);
        assert_eq!(config.request_timeout_secs, 10);
        assert!(matches!(
            config.providers.get("gemini"),
            Some(RecommenderConfig::Gemini { .. })
        ));
    }

    #[test]
    fn debug_masks_api_keys() {
        let config = RecommenderConfig::OpenAI {
            api_key: "sk-secret".to_string(),
            base_url: None,
            model: None,
        };
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn load_config_from_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quizmark.toml");
        std::fs::write(
            &path,
            r#"
[providers.gemini]
type = "gemini"
api_key = "from-file"
"#,
        )
        .unwrap();

        let config = load_config_from(Some(&path)).unwrap();
        assert!(matches!(
            config.providers.get("gemini"),
            Some(RecommenderConfig::Gemini { api_key, .. }) if api_key == "from-file"
        ));
    }

    #[test]
    fn load_config_missing_explicit_path_fails() {
        let result = load_config_from(Some(Path::new("no_such_quizmark.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn factory_creates_named_providers() {
        let openai = create_recommender(&RecommenderConfig::OpenAI {
            api_key: "k".into(),
            base_url: None,
            model: None,
        })
        .unwrap();
        assert_eq!(openai.name(), "openai");

        let gemini = create_recommender(&RecommenderConfig::Gemini {
            api_key: "k".into(),
            base_url: None,
            model: None,
        })
        .unwrap();
        assert_eq!(gemini.name(), "gemini");
    }
}
