//! Replicate predictions API.
//!
//! Predictions run asynchronously: create, then poll `urls.get` until the
//! status settles.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{check, http_client};
use crate::analyzer::TireAnalyzer;
use crate::condition::NO_RESULT;
use crate::error::{Result, VisionError};
use crate::rim::RimDesigner;

pub const REPLICATE_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_RIM_MODEL_VERSION: &str = "tstramer/instruct-pix2pix:latest";

const ANALYSIS_PROMPT: &str = "Analyze this car tire condition in Traditional Chinese. \
Identify if flat, damaged, or blown out. Estimate severity.";

#[derive(Debug, Clone, Deserialize)]
pub struct Prediction {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<Value>,
    #[serde(default)]
    pub urls: Option<PredictionUrls>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PredictionUrls {
    pub get: Option<String>,
}

impl Prediction {
    fn is_finished(&self) -> bool {
        matches!(self.status.as_str(), "succeeded" | "failed" | "canceled")
    }

    fn poll_url(&self) -> Option<&str> {
        self.urls.as_ref().and_then(|u| u.get.as_deref())
    }
}

/// Replicate client with polling.
pub struct ReplicateClient {
    http: Client,
    api_base: String,
    api_token: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl ReplicateClient {
    pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);
    pub const DEFAULT_MAX_POLLS: u32 = 30;

    pub fn new(api_token: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_base: REPLICATE_API_BASE.to_string(),
            api_token: api_token.into(),
            poll_interval: Self::DEFAULT_POLL_INTERVAL,
            max_polls: Self::DEFAULT_MAX_POLLS,
        })
    }

    pub fn with_polling(mut self, interval: Duration, max_polls: u32) -> Self {
        self.poll_interval = interval;
        self.max_polls = max_polls;
        self
    }

    /// Create a prediction and wait for it to finish.
    ///
    /// Returns the output of a successful prediction (`None` when it has
    /// none).
    pub async fn run(&self, version: &str, input: Value) -> Result<Option<Value>> {
        let url = format!("{}/predictions", self.api_base);
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Token {}", self.api_token))
            .json(&json!({ "version": version, "input": input }))
            .send()
            .await?;

        let mut prediction: Prediction = check("replicate", response).await?.json().await?;
        debug!(
            "Replicate prediction {} created ({})",
            prediction.id.as_deref().unwrap_or("?"),
            prediction.status
        );

        let mut polls = 0;
        while !prediction.is_finished() {
            let Some(poll_url) = prediction.poll_url().map(str::to_string) else {
                return Err(VisionError::EmptyResponse("replicate"));
            };
            if polls >= self.max_polls {
                return Err(VisionError::PollTimeout(self.max_polls));
            }
            polls += 1;

            tokio::time::sleep(self.poll_interval).await;
            prediction = self.get(&poll_url).await?;
        }

        settle(prediction)
    }

    async fn get(&self, url: &str) -> Result<Prediction> {
        let response = self
            .http
            .get(url)
            .header("Authorization", format!("Token {}", self.api_token))
            .send()
            .await?;
        Ok(check("replicate", response).await?.json().await?)
    }
}

fn settle(prediction: Prediction) -> Result<Option<Value>> {
    match prediction.status.as_str() {
        "succeeded" => Ok(prediction.output.filter(|o| !o.is_null())),
        _ => {
            let reason = match prediction.error {
                Some(Value::String(s)) => s,
                Some(other) => other.to_string(),
                None => prediction.status,
            };
            warn!("Replicate prediction failed: {}", reason);
            Err(VisionError::PredictionFailed(reason))
        }
    }
}

/// Output as text. Streaming language models return a list of tokens.
fn output_text(output: &Value) -> Option<String> {
    match output {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let text: String = items.iter().filter_map(Value::as_str).collect();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}

/// First output item, for image models that return a list of files.
fn output_first(output: &Value) -> Option<String> {
    match output {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => items.first().and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// URLs and data URLs pass through; bare base64 is wrapped as PNG.
fn as_image_ref(output: String) -> String {
    if output.starts_with("data:") || output.starts_with("http") {
        output
    } else {
        format!("data:image/png;base64,{}", output)
    }
}

pub struct ReplicateAnalyzer {
    client: ReplicateClient,
    version: String,
}

impl ReplicateAnalyzer {
    pub fn new(client: ReplicateClient, version: impl Into<String>) -> Self {
        Self {
            client,
            version: version.into(),
        }
    }
}

#[async_trait]
impl TireAnalyzer for ReplicateAnalyzer {
    fn name(&self) -> &'static str {
        "replicate"
    }

    async fn analyze(&self, image: &str) -> Result<String> {
        let output = self
            .client
            .run(
                &self.version,
                json!({ "image": image, "prompt": ANALYSIS_PROMPT }),
            )
            .await?;

        Ok(output
            .as_ref()
            .and_then(output_text)
            .unwrap_or_else(|| NO_RESULT.to_string()))
    }
}

pub struct ReplicateRimDesigner {
    client: ReplicateClient,
    version: String,
}

impl ReplicateRimDesigner {
    pub fn new(client: ReplicateClient, version: impl Into<String>) -> Self {
        Self {
            client,
            version: version.into(),
        }
    }
}

#[async_trait]
impl RimDesigner for ReplicateRimDesigner {
    fn name(&self) -> &'static str {
        "replicate"
    }

    async fn generate(&self, image: &str, style: &str) -> Result<Option<String>> {
        let prompt = format!(
            "Change the car wheel rims to {} style. Maintain the original car angle, \
lighting, perspective, and background. High quality, photorealistic.",
            style
        );
        let output = self
            .client
            .run(&self.version, json!({ "image": image, "prompt": prompt }))
            .await?;

        Ok(output.as_ref().and_then(output_first).map(as_image_ref))
    }
}
