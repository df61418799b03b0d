//! HTTP-backed analyzers and rim designers.

pub mod gemini;
pub mod huggingface;
pub mod openai;
pub mod replicate;

use std::time::Duration;

use reqwest::{Client, Response};
use serde_json::Value;

use crate::error::{Result, VisionError};

pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Ok(Client::builder().timeout(timeout).build()?)
}

/// Turn a non-success response into [`VisionError::Api`].
pub(crate) async fn check(provider: &'static str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&text)
        .ok()
        .and_then(|v| error_message(&v))
        .unwrap_or(text);

    Err(VisionError::Api {
        provider,
        status: status.as_u16(),
        message,
    })
}

/// Pull a message out of the common `{"error": ...}` shapes.
fn error_message(body: &Value) -> Option<String> {
    let error = body.get("error").or_else(|| body.get("detail"))?;
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(_) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(
            error_message(&json!({"error": "Model is loading"})).as_deref(),
            Some("Model is loading")
        );
        assert_eq!(
            error_message(&json!({"error": {"message": "bad key", "code": 401}})).as_deref(),
            Some("bad key")
        );
        assert_eq!(
            error_message(&json!({"detail": "Invalid version"})).as_deref(),
            Some("Invalid version")
        );
        assert!(error_message(&json!({"ok": true})).is_none());
    }
}
