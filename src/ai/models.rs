//! Supported backing models and their capability records.

use std::{fmt, str::FromStr};

use thiserror::Error;

/// Which upstream service answers for a given model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Gemini,
    HuggingFace,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported model: {0}")]
pub struct UnknownModel(pub String);

/// Image classifiers a scan can be routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisionModel {
    #[default]
    Gemini3FlashPreview,
    Gemini25Flash,
    Gemini20Flash,
    Food101,
}

impl VisionModel {
    pub const ALL: [VisionModel; 4] = [
        VisionModel::Gemini3FlashPreview,
        VisionModel::Gemini25Flash,
        VisionModel::Gemini20Flash,
        VisionModel::Food101,
    ];

    /// Identifier accepted from clients.
    pub fn id(self) -> &'static str {
        match self {
            VisionModel::Gemini3FlashPreview => "gemini-3-flash-preview",
            VisionModel::Gemini25Flash => "gemini-2.5-flash",
            VisionModel::Gemini20Flash => "gemini-2.0-flash",
            VisionModel::Food101 => "vit-base-food101",
        }
    }

    /// Model name on the upstream API.
    pub fn upstream_name(self) -> &'static str {
        match self {
            VisionModel::Food101 => "eslamxm/vit-base-food101",
            other => other.id(),
        }
    }

    pub fn backend(self) -> Backend {
        match self {
            VisionModel::Food101 => Backend::HuggingFace,
            _ => Backend::Gemini,
        }
    }
}

/// Capabilities of a recipe-generating model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecipeCapabilities {
    /// Upstream honours `responseMimeType: application/json`.
    pub supports_structured_output: bool,
    /// Prompt with a single `{ingredients}` placeholder.
    pub prompt_template: &'static str,
}

const STRUCTURED_PROMPT: &str = "I have these ingredients: {ingredients}.
Suggest 3 recipes I can make.
Respond with a JSON array of objects with the fields
\"title\" (string), \"ingredients_needed\" (array of strings) and \"instructions\" (string).";

const FREEFORM_PROMPT: &str = "I have these ingredients: {ingredients}.
Suggest 3 recipes I can make.
Return ONLY raw JSON. Do not use Markdown formatting and do not add any text before or after it.
Structure:
[
    {
        \"title\": \"Recipe Name\",
        \"ingredients_needed\": [\"item1\", \"item2\"],
        \"instructions\": \"Step 1...\"
    }
]";

/// Language models that can be asked for recipe suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecipeModel {
    #[default]
    Gemini3FlashPreview,
    Gemini25Flash,
    Gemini20Flash,
    Gemma3,
}

impl RecipeModel {
    pub const ALL: [RecipeModel; 4] = [
        RecipeModel::Gemini3FlashPreview,
        RecipeModel::Gemini25Flash,
        RecipeModel::Gemini20Flash,
        RecipeModel::Gemma3,
    ];

    pub fn id(self) -> &'static str {
        match self {
            RecipeModel::Gemini3FlashPreview => "gemini-3-flash-preview",
            RecipeModel::Gemini25Flash => "gemini-2.5-flash",
            RecipeModel::Gemini20Flash => "gemini-2.0-flash",
            RecipeModel::Gemma3 => "gemma-3-27b-it",
        }
    }

    pub fn capabilities(self) -> RecipeCapabilities {
        match self {
            RecipeModel::Gemma3 => RecipeCapabilities {
                supports_structured_output: false,
                prompt_template: FREEFORM_PROMPT,
            },
            _ => RecipeCapabilities {
                supports_structured_output: true,
                prompt_template: STRUCTURED_PROMPT,
            },
        }
    }

    pub fn render_prompt(self, ingredients: &[String]) -> String {
        self.capabilities()
            .prompt_template
            .replace("{ingredients}", &ingredients.join(", "))
    }
}

impl FromStr for VisionModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        VisionModel::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownModel(s.to_owned()))
    }
}

impl FromStr for RecipeModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RecipeModel::ALL
            .into_iter()
            .find(|m| m.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownModel(s.to_owned()))
    }
}

impl fmt::Display for VisionModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for RecipeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Parse an optional client-supplied model id, falling back to `default`.
/// Blank strings count as absent.
pub fn resolve<M: FromStr<Err = UnknownModel>>(
    raw: Option<&str>,
    default: M,
) -> Result<M, UnknownModel> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(id) => id.parse(),
        None => Ok(default),
    }
}
