//! Remote NER service client
//!
//! Request body: `{"text": "..."}`. Accepted response bodies are
//! `{"entities": [{"start", "end", "label", "score"?}]}` or the bare array.
//! `start`/`end` are character (Unicode scalar) offsets unless
//! `ner.offset_unit = "byte"`.
//!
//! The client sets no request timeout of its own. The NER adapter bounds
//! each attempt and the whole call, and dropping the request future aborts it.

use super::{EntityRecognizer, RawEntity};
use crate::config::SecretString;
use crate::detection::config::NerConfig;
use crate::domain::{RecognizerError, RedactorError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Deserialize;
use url::Url;

#[derive(Deserialize)]
#[serde(untagged)]
enum RecognizeResponse {
    Wrapped { entities: Vec<RawEntity> },
    Bare(Vec<RawEntity>),
}

impl RecognizeResponse {
    fn into_entities(self) -> Vec<RawEntity> {
        match self {
            Self::Wrapped { entities } | Self::Bare(entities) => entities,
        }
    }
}

/// Recognizer backed by an HTTP endpoint
pub struct HttpRecognizer {
    endpoint: Url,
    api_key: Option<SecretString>,
    client: Client,
}

impl HttpRecognizer {
    /// Create a client for `endpoint`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the endpoint is not an http(s) URL or
    /// the HTTP client cannot be built
    pub fn new(endpoint: &str, api_key: Option<SecretString>) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            RedactorError::Configuration(format!("Invalid NER endpoint '{endpoint}': {e}"))
        })?;
        if !matches!(endpoint.scheme(), "http" | "https") {
            return Err(RedactorError::Configuration(format!(
                "NER endpoint must use http or https, got '{}'",
                endpoint.scheme()
            )));
        }

        let client = ClientBuilder::new()
            .build()
            .map_err(|e| {
                RedactorError::Configuration(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            endpoint,
            api_key,
            client,
        })
    }

    /// Create a client from the `[ner]` section
    pub fn from_config(config: &NerConfig) -> Result<Self> {
        let endpoint = config.endpoint.as_deref().ok_or_else(|| {
            RedactorError::Configuration("ner.endpoint is required".to_string())
        })?;
        Self::new(endpoint, config.api_key.clone())
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl EntityRecognizer for HttpRecognizer {
    fn backend_id(&self) -> &str {
        "http"
    }

    async fn recognize(&self, text: &str) -> std::result::Result<Vec<RawEntity>, RecognizerError> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&serde_json::json!({ "text": text }));

        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| RecognizerError::Connection(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            // The body may echo the submitted text, so only the status is kept
            return Err(RecognizerError::Http {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unknown status")
                    .to_string(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RecognizerError::Connection(e.without_url().to_string()))?;

        let parsed: RecognizeResponse = serde_json::from_slice(&body).map_err(|e| {
            RecognizerError::InvalidResponse(format!(
                "malformed entity list ({:?} error at line {} column {})",
                e.classify(),
                e.line(),
                e.column()
            ))
        })?;

        Ok(parsed.into_entities())
    }
}
