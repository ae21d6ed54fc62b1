use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use base64ct::{Base64, Encoding};
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::VisionConfig;
use crate::state::AppState;

use super::dto::Estimate;
use super::normalize;

const ESTIMATE_PROMPT: &str = "Estimate the nutrition of the meal in this photo. \
Reply with strict JSON only, no prose: \
{\"description\": string, \"calories\": integer, \"protein_g\": integer}. \
Calories are kcal for the whole serving, protein_g is grams of protein.";

#[derive(Debug, Error)]
pub enum EstimateError {
    /// The model replied, but its text could not be read as the expected
    /// JSON shape. The raw text is kept for diagnosis.
    #[error("model did not return JSON")]
    Malformed { raw: String },

    #[error(transparent)]
    Failed(#[from] anyhow::Error),
}

#[async_trait]
pub trait VisionModel: Send + Sync {
    /// One round trip to the model; returns its reply text verbatim.
    async fn describe_photo(&self, prompt: &str, photo: &[u8]) -> anyhow::Result<String>;
}

/// OpenAI-compatible chat-completions client. The request timeout bounds the
/// call; the upstream itself promises no upper bound.
pub struct OpenAiVision {
    http: reqwest::Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiVision {
    pub fn new(cfg: &VisionConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            api_url: cfg.api_url.clone(),
            api_key: cfg.api_key.clone(),
            model: cfg.model.clone(),
        })
    }
}

#[async_trait]
impl VisionModel for OpenAiVision {
    async fn describe_photo(&self, prompt: &str, photo: &[u8]) -> anyhow::Result<String> {
        let image_url = format!("data:image/jpeg;base64,{}", Base64::encode_string(photo));
        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } },
                ],
            }],
        });

        let resp = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .context("vision request")?
            .error_for_status()
            .context("vision response status")?;

        let reply: Value = resp.json().await.context("vision response body")?;
        let text = reply
            .pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .context("vision reply missing message content")?;
        Ok(text.to_string())
    }
}

/// Upload spilled to a per-request temp file, removed when the guard drops,
/// on success and error paths alike.
struct SpilledPhoto {
    path: PathBuf,
}

impl SpilledPhoto {
    async fn write(bytes: &[u8]) -> anyhow::Result<Self> {
        let path = std::env::temp_dir().join(format!("foodlog-{}.jpg", Uuid::new_v4()));
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("spill upload to {}", path.display()))?;
        Ok(Self { path })
    }

    async fn read(&self) -> anyhow::Result<Vec<u8>> {
        tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("read spilled upload {}", self.path.display()))
    }
}

impl Drop for SpilledPhoto {
    fn drop(&mut self) {
        // removal is best effort; a leftover temp file must not fail the request
        let _ = std::fs::remove_file(&self.path);
    }
}

pub async fn estimate_photo(state: &AppState, photo: Bytes) -> Result<Estimate, EstimateError> {
    let spilled = SpilledPhoto::write(&photo).await?;
    let bytes = spilled.read().await?;
    let reply = state.vision.describe_photo(ESTIMATE_PROMPT, &bytes).await?;
    interpret_model_reply(&reply)
}

/// Turns the model's reply text into an estimate, or `Malformed` carrying the
/// raw text when it is not a JSON object. Never fabricates numbers beyond the
/// per-field zero coercion.
pub fn interpret_model_reply(text: &str) -> Result<Estimate, EstimateError> {
    let body = normalize::strip_code_fence(text);
    let value: Value = serde_json::from_str(body).map_err(|_| EstimateError::Malformed {
        raw: text.to_string(),
    })?;
    if !value.is_object() {
        return Err(EstimateError::Malformed {
            raw: text.to_string(),
        });
    }
    Ok(normalize::normalize(&value))
}
