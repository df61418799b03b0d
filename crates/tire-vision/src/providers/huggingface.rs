//! HuggingFace inference API captioning.
//!
//! Each caption model is tried in order; the first caption is mapped to an
//! assessment with [`assess_caption`]. Public models work without a key.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::{check, http_client};
use crate::analyzer::TireAnalyzer;
use crate::condition::{assess_caption, GENERIC_ASSESSMENT};
use crate::error::Result;

pub const HUGGINGFACE_API_BASE: &str = "https://api-inference.huggingface.co/models";

/// Caption models tried in order.
pub const DEFAULT_CAPTION_MODELS: [&str; 3] = [
    "Salesforce/blip-image-captioning-base",
    "nlpconnect/vit-gpt2-image-captioning",
    "microsoft/git-base",
];

pub struct HuggingFaceAnalyzer {
    http: Client,
    api_base: String,
    api_key: Option<String>,
    models: Vec<String>,
}

impl HuggingFaceAnalyzer {
    pub fn new(api_key: Option<String>, models: Vec<String>, timeout: Duration) -> Result<Self> {
        let models = if models.is_empty() {
            DEFAULT_CAPTION_MODELS.iter().map(|m| m.to_string()).collect()
        } else {
            models
        };

        Ok(Self {
            http: http_client(timeout)?,
            api_base: HUGGINGFACE_API_BASE.to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            models,
        })
    }

    /// Point at a different inference endpoint.
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    async fn caption(&self, model: &str, image: &str) -> Result<String> {
        let url = format!("{}/{}", self.api_base, model);

        let mut request = self.http.post(&url).json(&json!({ "inputs": image }));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {}", key));
        }

        let response = check("huggingface", request.send().await?).await?;
        let body: Value = response.json().await?;
        Ok(extract_caption(&body))
    }
}

#[async_trait]
impl TireAnalyzer for HuggingFaceAnalyzer {
    fn name(&self) -> &'static str {
        "huggingface"
    }

    async fn analyze(&self, image: &str) -> Result<String> {
        for model in &self.models {
            match self.caption(model, image).await {
                Ok(caption) => {
                    debug!("Caption from {}: {}", model, caption);
                    return Ok(assess_caption(&caption).to_string());
                }
                Err(e) => warn!("Caption model {} failed, trying next: {}", model, e),
            }
        }

        Ok(GENERIC_ASSESSMENT.to_string())
    }
}

/// Caption text from `[{"generated_text": ..}]`, `{"generated_text": ..}`
/// or anything else (stringified).
fn extract_caption(body: &Value) -> String {
    let item = match body {
        Value::Array(items) => match items.first() {
            Some(item) => item,
            None => return body.to_string(),
        },
        other => other,
    };

    match item {
        Value::String(s) => s.clone(),
        Value::Object(_) => item
            .get("generated_text")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| item.to_string()),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caption_shapes() {
        assert_eq!(
            extract_caption(&json!([{"generated_text": "a flat tire"}])),
            "a flat tire"
        );
        assert_eq!(
            extract_caption(&json!({"generated_text": "a wheel"})),
            "a wheel"
        );
        assert_eq!(extract_caption(&json!(["a tire"])), "a tire");
        assert_eq!(extract_caption(&json!([])), "[]");
        assert_eq!(
            extract_caption(&json!({"label": "tire"})),
            r#"{"label":"tire"}"#
        );
    }

    #[test]
    fn test_default_models() {
        let analyzer =
            HuggingFaceAnalyzer::new(Some(String::new()), Vec::new(), Duration::from_secs(5))
                .unwrap();
        assert_eq!(analyzer.models().len(), 3);
        assert_eq!(analyzer.models()[0], "Salesforce/blip-image-captioning-base");
        assert!(analyzer.api_key.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_models_give_generic_assessment() {
        let analyzer = HuggingFaceAnalyzer::new(
            None,
            vec!["m1".to_string(), "m2".to_string()],
            Duration::from_millis(200),
        )
        .unwrap()
        .with_api_base("http://127.0.0.1:9");

        let text = analyzer.analyze("data:image/jpeg;base64,AA").await.unwrap();
        assert_eq!(text, GENERIC_ASSESSMENT);
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_caption() {
        dotenvy::dotenv().ok();
        let analyzer = HuggingFaceAnalyzer::new(
            std::env::var("HUGGINGFACE_API_KEY").ok(),
            Vec::new(),
            Duration::from_secs(30),
        )
        .unwrap();
        let text = analyzer
            .analyze("data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNk+M9QDwADhgGAWjR9awAAAABJRU5ErkJggg==")
            .await
            .unwrap();
        assert!(!text.is_empty());
    }
}
