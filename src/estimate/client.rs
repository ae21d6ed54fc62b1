use std::time::Duration;

use anyhow::Context;
use reqwest::multipart::{Form, Part};
use thiserror::Error;

use super::dto::Estimate;
use super::normalize;

/// Network or upstream failure while estimating. Surfaced near the action
/// that triggered it; never blocks manual entry.
#[derive(Debug, Error)]
#[error("estimation failed: {0}")]
pub struct EstimationFailed(#[from] anyhow::Error);

/// App-side client for the estimation proxy. One round trip per call, no
/// internal retries; the caller re-invokes on failure.
pub struct EstimationClient {
    http: reqwest::Client,
    base_url: String,
}

impl EstimationClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Ok(Self { http, base_url })
    }

    /// Returns a normalized draft prefill. The proxy's reply is duck-typed
    /// JSON and goes through the same field coercion as the server side.
    pub async fn estimate(&self, photo: Vec<u8>) -> Result<Estimate, EstimationFailed> {
        let part = Part::bytes(photo)
            .file_name("photo.jpg")
            .mime_str("image/jpeg")
            .context("build photo part")?;
        let form = Form::new().part("photo", part);

        let resp = self
            .http
            .post(format!("{}/estimate", self.base_url))
            .multipart(form)
            .send()
            .await
            .context("send estimate request")?
            .error_for_status()
            .context("estimate response status")?;

        let value: serde_json::Value = resp.json().await.context("decode estimate response")?;
        Ok(normalize::normalize(&value))
    }
}
