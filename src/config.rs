//! Configuration for the pipeline and its external collaborators
//!
//! Clients never read ambient globals at call time; configuration is
//! resolved once (explicitly or from the environment) and injected at
//! construction.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// Default Gemini model
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";

/// Configuration for the Gemini generation client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub temperature: Option<f32>,
    pub max_output_tokens: Option<u32>,
    pub timeout_seconds: u64,
}

impl GeminiConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            model: DEFAULT_GEMINI_MODEL.to_string(),
            temperature: None,
            max_output_tokens: None,
            timeout_seconds: 30,
        }
    }

    /// Create with a specific model
    pub fn with_model(api_key: String, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..Self::new(api_key)
        }
    }

    /// Create from environment variables (`GEMINI_API_KEY`, optional
    /// `GEMINI_MODEL`).
    pub fn from_env() -> ConfigResult<Self> {
        let api_key = std::env::var("GEMINI_API_KEY").map_err(|_| ConfigError::MissingEnv {
            name: "GEMINI_API_KEY".to_string(),
        })?;
        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        Ok(Self::with_model(api_key, &model))
    }
}

/// Configuration for the UMLS terminology client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UmlsConfig {
    pub api_key: String,
    pub timeout_seconds: u64,
}

impl UmlsConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            timeout_seconds: 30,
        }
    }

    /// Create from environment variables (`UMLS_API_KEY`).
    pub fn from_env() -> ConfigResult<Self> {
        let api_key = std::env::var("UMLS_API_KEY").map_err(|_| ConfigError::MissingEnv {
            name: "UMLS_API_KEY".to_string(),
        })?;
        Ok(Self::new(api_key))
    }
}

/// Retry budget and acceptance threshold for the explanation pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Maximum generate-parse-validate cycles before falling back.
    pub max_attempts: usize,
    /// Minimum concept coverage for a candidate to be accepted.
    pub coverage_threshold: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            coverage_threshold: 0.4,
        }
    }
}
