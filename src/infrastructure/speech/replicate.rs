use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

use crate::config::settings::SpeechConfig;

#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("Missing Replicate API token")]
    MissingToken,
    #[error("Invalid prediction ID")]
    InvalidPredictionId,
    #[error("invalid speech API URL {0}")]
    BaseUrl(String),
    #[error("speech request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("speech API returned {status}: {body}")]
    Api { status: StatusCode, body: String },
    #[error("prediction {id} {status}: {reason}")]
    PredictionFailed {
        id: String,
        status: String,
        reason: String,
    },
}

/// Text-to-speech backend that clones a voice from a sample clip.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Runs the model to completion and returns its raw output.
    async fn synthesize(&self, text: &str, voice_url: &str) -> Result<Value, SpeechError>;

    /// Current state of a prediction, exactly as the API reports it.
    async fn prediction(&self, id: &str) -> Result<Value, SpeechError>;
}

#[derive(Debug, Deserialize)]
struct Prediction {
    id: String,
    status: String,
    #[serde(default)]
    output: Value,
    #[serde(default)]
    error: Value,
}

impl Prediction {
    fn is_running(&self) -> bool {
        matches!(self.status.as_str(), "starting" | "processing")
    }
}

pub struct ReplicateClient {
    http: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
    version: String,
    poll_interval: Duration,
}

impl ReplicateClient {
    pub fn new(http: reqwest::Client, config: &SpeechConfig) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
            version: model_version(&config.model).to_string(),
            poll_interval: config.poll_interval,
        }
    }

    /// `<base>/v1/predictions/<id>`, with `id` pushed as a single escaped segment.
    fn prediction_url(&self, id: &str) -> Result<Url, SpeechError> {
        if !is_prediction_id(id) {
            return Err(SpeechError::InvalidPredictionId);
        }

        let mut url = Url::parse(&self.base_url).map_err(|_| SpeechError::BaseUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| SpeechError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(["v1", "predictions", id]);
        Ok(url)
    }

    fn token(&self) -> Result<&str, SpeechError> {
        self.api_token.as_deref().ok_or(SpeechError::MissingToken)
    }

    async fn read_json(response: reqwest::Response) -> Result<Value, SpeechError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SpeechError::Api { status, body });
        }
        Ok(response.json::<Value>().await?)
    }
}

/// Prediction ids are plain alphanumeric tokens.
pub fn is_prediction_id(id: &str) -> bool {
    !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `owner/name:hash` → `hash`. A bare hash is returned as is.
fn model_version(model: &str) -> &str {
    model.rsplit_once(':').map(|(_, v)| v).unwrap_or(model)
}

#[async_trait]
impl SpeechSynthesizer for ReplicateClient {
    async fn synthesize(&self, text: &str, voice_url: &str) -> Result<Value, SpeechError> {
        let token = self.token()?;

        let body = json!({
            "version": self.version,
            "input": {
                "text": text,
                "speaker": voice_url,
            },
        });

        let response = self
            .http
            .post(format!("{}/v1/predictions", self.base_url))
            .bearer_auth(token)
            .header("Prefer", "wait")
            .json(&body)
            .send()
            .await?;

        let mut prediction: Prediction = serde_json::from_value(Self::read_json(response).await?)
            .map_err(|e| SpeechError::Api {
                status: StatusCode::OK,
                body: format!("unexpected prediction payload: {}", e),
            })?;
        info!("🗣️ Prediction {} is {}", prediction.id, prediction.status);

        while prediction.is_running() {
            tokio::time::sleep(self.poll_interval).await;
            let raw = self.prediction(&prediction.id).await?;
            prediction = serde_json::from_value(raw).map_err(|e| SpeechError::Api {
                status: StatusCode::OK,
                body: format!("unexpected prediction payload: {}", e),
            })?;
            debug!("Prediction {} is {}", prediction.id, prediction.status);
        }

        match prediction.status.as_str() {
            "succeeded" => Ok(prediction.output),
            _ => Err(SpeechError::PredictionFailed {
                id: prediction.id,
                status: prediction.status,
                reason: match prediction.error {
                    Value::Null => "no error reported".to_string(),
                    Value::String(s) => s,
                    other => other.to_string(),
                },
            }),
        }
    }

    async fn prediction(&self, id: &str) -> Result<Value, SpeechError> {
        let token = self.token()?;
        let url = self.prediction_url(id)?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await?;

        Self::read_json(response).await
    }
}
