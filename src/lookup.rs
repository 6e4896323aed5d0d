//! UMLS reference definition lookup
//!
//! Resolves a term to authoritative definitions via the NLM UTS REST
//! API: search the current release for the term, take the first
//! concept's CUI, then fetch that concept's definitions. An empty
//! result list is a normal outcome, not an error; transport and API
//! failures are errors that the pipeline degrades to an empty
//! reference.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::UmlsConfig;
use crate::error::{LookupError, LookupResult};

const DEFAULT_BASE_URL: &str = "https://uts-ws.nlm.nih.gov/rest";

/// A source of authoritative definitions for a term.
#[async_trait]
pub trait ReferenceLookup: Send + Sync {
    /// Ordered candidate definitions; the pipeline uses only the first.
    async fn lookup(&self, term: &str) -> LookupResult<Vec<String>>;
}

/// UTS search response, trimmed to the fields we read.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: SearchResult,
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    results: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    ui: String,
}

#[derive(Debug, Deserialize)]
struct DefinitionsResponse {
    #[serde(default)]
    result: Vec<Definition>,
}

#[derive(Debug, Deserialize)]
struct Definition {
    value: String,
}

/// UMLS terminology service client
#[derive(Debug, Clone)]
pub struct UmlsClient {
    config: UmlsConfig,
    client: Client,
    base_url: String,
}

impl UmlsClient {
    pub fn new(config: UmlsConfig) -> LookupResult<Self> {
        if config.api_key.is_empty() {
            return Err(LookupError::MissingApiKey);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(LookupError::Http)?;

        Ok(Self {
            config,
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Create from environment variables (`UMLS_API_KEY`).
    pub fn from_env() -> Result<Self, crate::error::ExplainError> {
        let config = UmlsConfig::from_env()?;
        Ok(Self::new(config)?)
    }

    /// Point at a different endpoint, for integration test servers.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    async fn search_cui(&self, term: &str) -> LookupResult<Option<String>> {
        let url = format!("{}/search/current", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("string", term), ("apiKey", &self.config.api_key)])
            .send()
            .await
            .map_err(LookupError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api { status, body });
        }

        let search: SearchResponse = response.json().await.map_err(LookupError::Http)?;
        Ok(search.result.results.into_iter().next().map(|hit| hit.ui))
    }

    async fn fetch_definitions(&self, cui: &str) -> LookupResult<Vec<String>> {
        let url = format!("{}/content/current/CUI/{}/definitions", self.base_url, cui);
        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", &self.config.api_key)])
            .send()
            .await
            .map_err(LookupError::Http)?;

        let status = response.status();
        // UTS answers 404 for concepts without definitions
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(cui, "no definitions recorded for concept");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LookupError::Api { status, body });
        }

        let definitions: DefinitionsResponse = response.json().await.map_err(LookupError::Http)?;
        Ok(definitions.result.into_iter().map(|d| d.value).collect())
    }
}

#[async_trait]
impl ReferenceLookup for UmlsClient {
    async fn lookup(&self, term: &str) -> LookupResult<Vec<String>> {
        debug!(term, "searching UMLS");
        let Some(cui) = self.search_cui(term).await? else {
            info!(term, "no UMLS concept found");
            return Ok(Vec::new());
        };
        let definitions = self.fetch_definitions(&cui).await?;
        info!(term, %cui, count = definitions.len(), "resolved UMLS definitions");
        Ok(definitions)
    }
}
