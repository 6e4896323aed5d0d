//! CLI driver for the explanation pipeline.
//!
//! Resolves credentials from the environment (a `.env` file is
//! honored), runs one pipeline invocation, and prints the wire-format
//! JSON to stdout.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use med_explain::{
    ConceptExtractor, ExplanationPipeline, GeminiClient, PipelineConfig, UmlsClient,
};

#[derive(Parser, Debug)]
#[command(name = "med-explain", about = "Generate a validated plain-language explanation for a medical term")]
struct Cli {
    /// Medical term to explain
    term: String,

    /// Caller-supplied simplified explanation to seed the prompt
    #[arg(long)]
    explanation: Option<String>,

    /// Maximum generate-parse-validate attempts
    #[arg(long, default_value_t = 3)]
    max_attempts: usize,

    /// Minimum concept coverage for acceptance
    #[arg(long, default_value_t = 0.4)]
    threshold: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let pipeline = ExplanationPipeline::new(
        Arc::new(UmlsClient::from_env()?),
        Arc::new(GeminiClient::from_env()?),
        ConceptExtractor::with_default_tagger(),
        PipelineConfig {
            max_attempts: cli.max_attempts,
            coverage_threshold: cli.threshold,
        },
    );

    let result = pipeline.explain(&cli.term, cli.explanation.as_deref()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
