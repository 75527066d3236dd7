//! Minimal client for the Gemini `generateContent` endpoint.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::{CallError, ImagePayload};

const API_KEY_HEADER: &str = "x-goog-api-key";
const JSON_MIME: &str = "application/json";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

/// One piece of a prompt: text or an inline image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Part {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Blob {
    mime_type: String,
    data: String,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    pub fn inline(image: &ImagePayload) -> Self {
        Part::InlineData {
            inline_data: Blob {
                mime_type: image.mime_type.clone(),
                data: STANDARD.encode(&image.bytes),
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
    #[serde(rename = "finishReason")]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

pub struct GeminiClient {
    http: Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(http: Client, api_key: &str, base_url: &str) -> Self {
        Self {
            http,
            api_key: api_key.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Send one user turn and return the concatenated text of the first candidate.
    pub async fn generate(
        &self,
        model: &str,
        parts: Vec<Part>,
        json_output: bool,
    ) -> Result<String, CallError> {
        let body = build_request(parts, json_output);
        debug!(model, json_output, "sending generateContent request");

        let response = self
            .http
            .post(self.build_url(model))
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&body)
            .send()
            .await
            .map_err(CallError::from_send)?;

        let status = response.status();
        let text = response.text().await.map_err(CallError::from_body)?;

        if !status.is_success() {
            let message = error_message(&text);
            error!(%status, model, %message, "gemini request rejected");
            return Err(CallError::Unavailable(format!(
                "gemini returned {status}: {message}"
            )));
        }

        extract_text(&text)
    }
}

pub fn build_request(parts: Vec<Part>, json_output: bool) -> GenerateRequest {
    GenerateRequest {
        contents: vec![Content {
            role: Some("user".into()),
            parts,
        }],
        generation_config: json_output.then_some(GenerationConfig {
            response_mime_type: JSON_MIME,
        }),
    }
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<GenerateResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map_or_else(|| body.trim().to_owned(), |e| e.message)
}

fn extract_text(body: &str) -> Result<String, CallError> {
    let parsed: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| CallError::Failed(format!("unreadable gemini response: {e}")))?;

    if let Some(err) = parsed.error {
        return Err(CallError::Failed(err.message));
    }

    let candidate = parsed
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| CallError::Failed("gemini returned no candidates".into()))?;

    // An empty answer that finished normally is still an answer.
    let finished = candidate.finish_reason.as_deref() == Some("STOP");
    let mut saw_text = false;
    let mut text = String::new();
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Part::Text { text: t } = part {
            saw_text = true;
            text.push_str(&t);
        }
    }

    if !saw_text && !finished {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".into());
        return Err(CallError::Failed(format!(
            "gemini candidate had no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}
