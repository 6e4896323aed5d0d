//! Generation service seam
//!
//! The pipeline only needs "prompt in, raw text out"; everything
//! provider-specific lives behind this trait so tests can substitute a
//! scripted stub.

pub mod gemini;

use async_trait::async_trait;

use crate::error::GenerationResult;

pub use gemini::GeminiClient;

/// A generative text service.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generate raw text for a prompt. May fail on transport, quota,
    /// or malformed payloads; the caller treats any failure as one
    /// consumed attempt.
    async fn generate(&self, prompt: &str) -> GenerationResult<String>;

    /// Model name for logging.
    fn model_name(&self) -> &str;

    /// Provider name for logging.
    fn provider_name(&self) -> &str;
}
