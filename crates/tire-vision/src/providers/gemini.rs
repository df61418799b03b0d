//! Google Gemini `generateContent` with inline image data.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check, http_client};
use crate::analyzer::TireAnalyzer;
use crate::condition::NO_RESULT;
use crate::data_url::DataUrl;
use crate::error::Result;
use crate::rim::RimDesigner;

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_IMAGE_MODEL: &str = "gemini-2.5-flash-image";

const ANALYSIS_PROMPT: &str = "You are an expert mechanic assistant. \
Analyze this image of a car tire. \
1. Identify if the tire is flat, damaged, or completely blown out. \
2. Estimate the severity (Low/Medium/High). \
3. Give a 1-sentence advice to the driver (e.g., \"Do not drive,\" \"Safe to inflate temporarily\"). \
Respond in Traditional Chinese (Cantonese style if appropriate for Hong Kong context). \
Keep it short and concise (under 50 words).";

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateContentResponse {
    fn parts(self) -> impl Iterator<Item = Part> {
        self.candidates
            .into_iter()
            .next()
            .map(|c| c.content.parts)
            .unwrap_or_default()
            .into_iter()
    }
}

/// Shared HTTP plumbing for both Gemini roles.
struct GeminiClient {
    http: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    fn new(api_key: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_base: GEMINI_API_BASE.to_string(),
            api_key,
        })
    }

    async fn generate(
        &self,
        model: &str,
        image: &str,
        prompt: &str,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}/models/{}:generateContent", self.api_base, model);
        let request = image_request(image, prompt)?;
        debug!("Sending generateContent to {}", model);

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        Ok(check("gemini", response).await?.json().await?)
    }
}

fn image_request(image: &str, prompt: &str) -> Result<GenerateContentRequest> {
    let image = DataUrl::parse(image)?;
    Ok(GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part {
                    inline_data: Some(InlineData {
                        mime_type: image.mime,
                        data: image.data,
                    }),
                    ..Default::default()
                },
                Part {
                    text: Some(prompt.to_string()),
                    ..Default::default()
                },
            ],
        }],
    })
}

pub struct GeminiAnalyzer {
    client: GeminiClient,
    model: String,
}

impl GeminiAnalyzer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(api_key.into(), timeout)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl TireAnalyzer for GeminiAnalyzer {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn analyze(&self, image: &str) -> Result<String> {
        let response = self
            .client
            .generate(&self.model, image, ANALYSIS_PROMPT)
            .await?;

        let text: String = response.parts().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            Ok(NO_RESULT.to_string())
        } else {
            Ok(text.trim().to_string())
        }
    }
}

/// Rim restyling with Gemini's image model.
pub struct GeminiRimDesigner {
    client: GeminiClient,
    model: String,
}

impl GeminiRimDesigner {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: GeminiClient::new(api_key.into(), timeout)?,
            model: model.into(),
        })
    }
}

#[async_trait]
impl RimDesigner for GeminiRimDesigner {
    fn name(&self) -> &'static str {
        "gemini"
    }

    async fn generate(&self, image: &str, style: &str) -> Result<Option<String>> {
        let prompt = format!(
            "Update the car wheel rims in this image to match the style: \"{}\". \
Maintain the original car angle, lighting, perspective, and background. \
High quality, photorealistic, 8k resolution.",
            style
        );
        let response = self.client.generate(&self.model, image, &prompt).await?;

        Ok(response
            .parts()
            .find_map(|p| p.inline_data)
            .map(|d| DataUrl { mime: d.mime_type, data: d.data }.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_uses_inline_data() {
        let request = image_request("data:image/png;base64,AAAA", "describe").unwrap();
        let json = serde_json::to_value(&request).unwrap();

        let parts = &json["contents"][0]["parts"];
        assert_eq!(parts[0]["inlineData"]["mimeType"], "image/png");
        assert_eq!(parts[0]["inlineData"]["data"], "AAAA");
        assert!(parts[0].get("text").is_none());
        assert_eq!(parts[1]["text"], "describe");
    }

    #[test]
    fn test_response_parts() {
        let response: GenerateContentResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":"新設計"},
                {"inlineData":{"mimeType":"image/png","data":"QUJD"}}
            ]}}]}"#,
        )
        .unwrap();

        let parts: Vec<Part> = response.parts().collect();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].text.as_deref(), Some("新設計"));
        assert_eq!(parts[1].inline_data.as_ref().unwrap().data, "QUJD");
    }

    #[test]
    fn test_empty_response_has_no_parts() {
        let response: GenerateContentResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.parts().count(), 0);
    }
}
