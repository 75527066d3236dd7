//! Clients for the upstream vision and language models.
//!
//! Both clients are constructed once from [`AiConfig`] and shared through
//! `AppState` behind the [`VisionClassifier`] and [`RecipeSuggester`] traits,
//! so tests can swap in scripted fakes.

pub mod fence;
pub mod gemini;
pub mod huggingface;
pub mod models;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::AiConfig;
use fence::strip_code_fence;
use gemini::{GeminiClient, Part};
use huggingface::{render_labels, HuggingFaceClient, MIN_LABEL_SCORE};
use models::{Backend, RecipeModel, VisionModel};

/// Returned in place of suggestions when there is nothing to ask for.
pub const EMPTY_RECIPES: &str = "[]";

const VISION_PROMPT: &str = "Identify all food ingredients in this image and return them as a \
comma-separated list. Return only the list, with no extra commentary.";

/// Raw image bytes handed to a classifier.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    pub bytes: Bytes,
    pub mime_type: String,
}

/// Failure of a single upstream HTTP exchange.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("{0}")]
    Unavailable(String),
    #[error("{0}")]
    Failed(String),
}

impl CallError {
    /// Errors raised while sending: the service could not be reached in time.
    pub(crate) fn from_send(e: reqwest::Error) -> Self {
        if e.is_builder() {
            CallError::Failed(format!("invalid request: {e}"))
        } else {
            CallError::Unavailable(format!("request failed: {e}"))
        }
    }

    /// Errors raised while reading an accepted response.
    pub(crate) fn from_body(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CallError::Unavailable(format!("timed out reading response: {e}"))
        } else {
            CallError::Failed(format!("failed to read response: {e}"))
        }
    }
}

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("vision service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("vision service error: {0}")]
    UpstreamError(String),
}

impl From<CallError> for ClassifierError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Unavailable(m) => ClassifierError::UpstreamUnavailable(m),
            CallError::Failed(m) => ClassifierError::UpstreamError(m),
        }
    }
}

#[derive(Debug, Error)]
pub enum SuggestionError {
    #[error("recipe service unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("recipe service error: {0}")]
    UpstreamError(String),
}

impl From<CallError> for SuggestionError {
    fn from(e: CallError) -> Self {
        match e {
            CallError::Unavailable(m) => SuggestionError::UpstreamUnavailable(m),
            CallError::Failed(m) => SuggestionError::UpstreamError(m),
        }
    }
}

#[async_trait]
pub trait VisionClassifier: Send + Sync {
    /// Returns the model's description of the image verbatim, nominally a
    /// comma-separated list of food names.
    async fn classify(
        &self,
        image: &ImagePayload,
        model: VisionModel,
    ) -> Result<String, ClassifierError>;
}

#[async_trait]
pub trait RecipeSuggester: Send + Sync {
    /// Returns fence-stripped model output that should, but need not, be a
    /// JSON array of recipes.
    async fn suggest(
        &self,
        ingredients: &[String],
        model: RecipeModel,
    ) -> Result<String, SuggestionError>;
}

/// Production client routing each model to its backend.
pub struct AiClient {
    gemini: GeminiClient,
    huggingface: Option<HuggingFaceClient>,
}

impl AiClient {
    pub fn from_config(cfg: &AiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(cfg.timeout).build()?;
        let gemini = GeminiClient::new(http.clone(), &cfg.gemini_api_key, &cfg.gemini_base_url);
        let huggingface = cfg
            .huggingface_token
            .as_deref()
            .map(|token| HuggingFaceClient::new(http, token, &cfg.huggingface_base_url));
        Ok(Self {
            gemini,
            huggingface,
        })
    }
}

#[async_trait]
impl VisionClassifier for AiClient {
    #[instrument(skip(self, image), fields(model = %model, bytes = image.bytes.len()))]
    async fn classify(
        &self,
        image: &ImagePayload,
        model: VisionModel,
    ) -> Result<String, ClassifierError> {
        match model.backend() {
            Backend::Gemini => {
                let parts = vec![Part::text(VISION_PROMPT), Part::inline(image)];
                let text = self
                    .gemini
                    .generate(model.upstream_name(), parts, false)
                    .await?;
                Ok(text)
            }
            Backend::HuggingFace => {
                let hf = self.huggingface.as_ref().ok_or_else(|| {
                    ClassifierError::UpstreamUnavailable(
                        "HUGGINGFACE_TOKEN is not configured".into(),
                    )
                })?;
                let labels = hf.classify(model.upstream_name(), image).await?;
                Ok(render_labels(&labels, MIN_LABEL_SCORE))
            }
        }
    }
}

#[async_trait]
impl RecipeSuggester for AiClient {
    #[instrument(skip(self, ingredients), fields(model = %model, count = ingredients.len()))]
    async fn suggest(
        &self,
        ingredients: &[String],
        model: RecipeModel,
    ) -> Result<String, SuggestionError> {
        if ingredients.is_empty() {
            debug!("no ingredients, skipping recipe request");
            return Ok(EMPTY_RECIPES.to_owned());
        }

        let caps = model.capabilities();
        let prompt = model.render_prompt(ingredients);
        let raw = self
            .gemini
            .generate(model.id(), vec![Part::text(prompt)], caps.supports_structured_output)
            .await?;
        Ok(strip_code_fence(&raw).to_owned())
    }
}
