//! Hugging Face Inference API image classification.

use reqwest::{header::CONTENT_TYPE, Client};
use serde::Deserialize;
use tracing::{debug, error};

use super::{CallError, ImagePayload};

/// Labels scoring below this are dropped when rendering.
pub const MIN_LABEL_SCORE: f64 = 0.2;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Label {
    pub label: String,
    pub score: f64,
}

pub struct HuggingFaceClient {
    http: Client,
    token: String,
    base_url: String,
}

impl HuggingFaceClient {
    pub fn new(http: Client, token: &str, base_url: &str) -> Self {
        Self {
            http,
            token: token.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    pub async fn classify(
        &self,
        model: &str,
        image: &ImagePayload,
    ) -> Result<Vec<Label>, CallError> {
        let url = format!("{}/models/{model}", self.base_url);
        debug!(model, "sending image classification request");

        let response = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .header(CONTENT_TYPE, image.mime_type.as_str())
            .body(image.bytes.clone())
            .send()
            .await
            .map_err(CallError::from_send)?;

        let status = response.status();
        let text = response.text().await.map_err(CallError::from_body)?;
        if !status.is_success() {
            error!(%status, model, body = %text, "huggingface request rejected");
            return Err(CallError::Unavailable(format!(
                "huggingface returned {status}: {}",
                text.trim()
            )));
        }

        serde_json::from_str(&text)
            .map_err(|e| CallError::Failed(format!("unreadable huggingface response: {e}")))
    }
}

/// Render ranked labels as the comma-separated text the scan pipeline expects.
/// Food-101 labels use underscores (`french_fries`); those become spaces.
pub fn render_labels(labels: &[Label], min_score: f64) -> String {
    labels
        .iter()
        .filter(|l| l.score >= min_score)
        .map(|l| l.label.replace('_', " "))
        .collect::<Vec<_>>()
        .join(", ")
}
