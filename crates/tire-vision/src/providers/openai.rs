//! OpenAI vision chat completion.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{check, http_client};
use crate::analyzer::TireAnalyzer;
use crate::condition::NO_RESULT;
use crate::error::Result;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4-vision-preview";

const PROMPT: &str = "你是一位專業的汽車技師。請分析這張輪胎照片：1. 判斷輪胎是否漏氣、損壞或爆裂。2. 評估嚴重程度（低/中/高）。3. 給駕駛者一句建議（例如：「請勿繼續行駛」或「可暫時充氣」）。請用繁體中文回答，簡潔扼要（50字以內）。";

const MAX_TOKENS: u32 = 150;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: Vec<ContentPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentPart<'a> {
    Text { text: &'a str },
    ImageUrl { image_url: ImageUrl<'a> },
}

#[derive(Debug, Serialize)]
struct ImageUrl<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

pub struct OpenAiAnalyzer {
    http: Client,
    api_url: String,
    api_key: String,
    model: String,
}

impl OpenAiAnalyzer {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: http_client(timeout)?,
            api_url: OPENAI_API_URL.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    fn request<'a>(&'a self, image: &'a str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: vec![
                    ContentPart::Text { text: PROMPT },
                    ContentPart::ImageUrl {
                        image_url: ImageUrl { url: image },
                    },
                ],
            }],
            max_tokens: MAX_TOKENS,
        }
    }
}

#[async_trait]
impl TireAnalyzer for OpenAiAnalyzer {
    fn name(&self) -> &'static str {
        "openai"
    }

    async fn analyze(&self, image: &str) -> Result<String> {
        debug!("Sending tire photo to OpenAI ({})", self.model);

        let response = self
            .http
            .post(&self.api_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&self.request(image))
            .send()
            .await?;

        let completion: ChatResponse = check("openai", response).await?.json().await?;
        Ok(first_content(completion).unwrap_or_else(|| NO_RESULT.to_string()))
    }
}

fn first_content(response: ChatResponse) -> Option<String> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|text| !text.trim().is_empty())
}
