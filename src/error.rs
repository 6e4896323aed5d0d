//! Error handling for the explanation pipeline
//!
//! Idiomatic thiserror taxonomies, one per external collaborator, with
//! an umbrella type for binaries. The pipeline itself never surfaces
//! these to callers: lookup failures degrade to an empty reference and
//! generation failures consume one retry attempt.

use thiserror::Error;

/// Errors from the generative text service.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generation API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("no candidate text in generation response")]
    EmptyResponse,

    #[error("malformed generation payload: {0}")]
    Json(#[from] serde_json::Error),

    #[error("generation API key is not configured")]
    MissingApiKey,
}

/// Errors from the reference definition lookup service.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("lookup API error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("lookup API key is not configured")]
    MissingApiKey,
}

/// Configuration/environment errors, raised at construction time only.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("environment variable {name} is not set")]
    MissingEnv { name: String },
}

/// Umbrella error for binaries and embedders.
#[derive(Error, Debug)]
pub enum ExplainError {
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("lookup error: {0}")]
    Lookup(#[from] LookupError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type aliases for convenience
pub type GenerationResult<T> = Result<T, GenerationError>;
pub type LookupResult<T> = Result<T, LookupError>;
pub type ConfigResult<T> = Result<T, ConfigError>;
