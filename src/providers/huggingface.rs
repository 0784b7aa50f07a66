//! HuggingFace Inference API client for text classification.
//!
//! Sends whole batches to the serverless `text-classification` pipeline.
//! See: <https://huggingface.co/docs/api-inference/index>

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Classification, HuginnError, Result, SentimentClassifier};

/// Default base URL for HuggingFace Inference API
pub const DEFAULT_BASE_URL: &str = "https://api-inference.huggingface.co";

/// Multilingual three-class sentiment model (negative / neutral / positive).
pub const DEFAULT_MODEL: &str = "cardiffnlp/twitter-xlm-roberta-base-sentiment";

/// Inputs longer than this many tokens are truncated server-side.
pub const DEFAULT_MAX_LENGTH: usize = 512;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Model strategy backed by the hosted inference API.
#[derive(Clone)]
pub struct HuggingFaceClassifier {
    api_key: String,
    http: Client,
    base_url: String,
    model: String,
    max_length: usize,
}

impl HuggingFaceClassifier {
    /// Create a classifier for [`DEFAULT_MODEL`] with the given API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a classifier with a custom base URL (for testing with wiremock).
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(api_key, base_url, DEFAULT_TIMEOUT)
    }

    /// Create a classifier with a custom base URL and request timeout.
    pub fn with_timeout(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HuginnError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_length: DEFAULT_MAX_LENGTH,
        })
    }

    /// Use a different model (full HuggingFace model ID).
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Token limit applied to each input.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// The model ID requests are sent to.
    pub fn model_id(&self) -> &str {
        &self.model
    }

    /// Classify a batch of texts in a single request.
    ///
    /// # Arguments
    /// * `texts` - Texts to classify; results come back in the same order
    pub async fn classify_texts(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }

        let url = format!("{}/models/{}", self.base_url, self.model);
        debug!(model = %self.model, batch = texts.len(), "sending classification batch");

        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&ClassifyRequest {
                inputs: texts,
                parameters: ClassifyParameters {
                    truncation: true,
                    max_length: self.max_length,
                },
                options: RequestOptions {
                    wait_for_model: true,
                },
            })
            .send()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        self.handle_response_errors(&response)?;

        let payload: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| HuginnError::Http(e.to_string()))?;

        let top = payload.into_top_labels()?;
        if top.len() != texts.len() {
            return Err(HuginnError::DataError(format!(
                "expected {} classifications, got {}",
                texts.len(),
                top.len()
            )));
        }

        Ok(texts
            .iter()
            .zip(top)
            .map(|(text, best)| Classification::from_model_output(*text, &best.label, f64::from(best.score)))
            .collect())
    }

    /// Check response status and map to appropriate error.
    fn handle_response_errors(&self, response: &reqwest::Response) -> Result<()> {
        let status = response.status();

        if status.is_success() {
            return Ok(());
        }

        match status.as_u16() {
            401 => Err(HuginnError::AuthenticationFailed),
            404 => Err(HuginnError::ModelNotFound(self.model.clone())),
            429 => {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs);
                Err(HuginnError::RateLimited { retry_after })
            }
            503 => Err(HuginnError::Api {
                status: 503,
                message: "Model is loading, please retry".to_string(),
            }),
            code => Err(HuginnError::Api {
                status: code,
                message: format!("HuggingFace API error: {}", status),
            }),
        }
    }
}

#[derive(Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a [&'a str],
    parameters: ClassifyParameters,
    options: RequestOptions,
}

#[derive(Serialize)]
struct ClassifyParameters {
    truncation: bool,
    max_length: usize,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

#[derive(Deserialize)]
struct LabelScore {
    label: String,
    score: f32,
}

/// The API answers either with every label's score per input, or with just
/// the top label per input, depending on the deployment.
#[derive(Deserialize)]
#[serde(untagged)]
enum ClassifyResponse {
    AllScores(Vec<Vec<LabelScore>>),
    TopOnly(Vec<LabelScore>),
}

impl ClassifyResponse {
    fn into_top_labels(self) -> Result<Vec<LabelScore>> {
        match self {
            Self::TopOnly(top) => Ok(top),
            Self::AllScores(per_input) => per_input
                .into_iter()
                .map(|scores| {
                    scores
                        .into_iter()
                        .max_by(|a, b| a.score.partial_cmp(&b.score).unwrap_or(std::cmp::Ordering::Equal))
                        .ok_or(HuginnError::EmptyResponse)
                })
                .collect(),
        }
    }
}

#[async_trait]
impl SentimentClassifier for HuggingFaceClassifier {
    fn name(&self) -> &str {
        "huggingface"
    }

    async fn classify(&self, text: &str) -> Result<Classification> {
        self.classify_texts(&[text])
            .await?
            .pop()
            .ok_or(HuginnError::EmptyResponse)
    }

    async fn classify_batch(&self, texts: &[&str]) -> Result<Vec<Classification>> {
        self.classify_texts(texts).await
    }
}
