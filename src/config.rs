use std::{path::PathBuf, time::Duration};

use anyhow::Context;
use serde::Deserialize;
use time::{macros::date, Date};

use crate::ai::models::{RecipeModel, VisionModel};

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
    pub refresh_ttl_minutes: i64,
}

/// Credentials and endpoints for the upstream AI backends.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub huggingface_token: Option<String>,
    pub huggingface_base_url: String,
    pub timeout: Duration,
    pub default_vision_model: VisionModel,
    pub default_recipe_model: RecipeModel,
}

/// Defaults applied by the image scan pipeline.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub upload_dir: PathBuf,
    pub default_quantity: f64,
    pub placeholder_expiration: Date,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub ai: AiConfig,
    pub scan: ScanConfig,
}

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_HUGGINGFACE_BASE_URL: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_PLACEHOLDER_EXPIRATION: Date = date!(2099 - 12 - 31);

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL is not set")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET").context("JWT_SECRET is not set")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "smartpantry".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "smartpantry-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES")?.unwrap_or(60 * 24),
            refresh_ttl_minutes: env_parse("JWT_REFRESH_TTL_MINUTES")?.unwrap_or(60 * 24 * 7),
        };

        let ai = AiConfig {
            gemini_api_key: std::env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?,
            gemini_base_url: std::env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
            huggingface_token: std::env::var("HUGGINGFACE_TOKEN")
                .ok()
                .filter(|t| !t.trim().is_empty()),
            huggingface_base_url: std::env::var("HUGGINGFACE_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_HUGGINGFACE_BASE_URL.into()),
            timeout: Duration::from_secs(env_parse("AI_TIMEOUT_SECS")?.unwrap_or(30)),
            default_vision_model: VisionModel::default(),
            default_recipe_model: RecipeModel::default(),
        };

        let placeholder_expiration = match std::env::var("SCAN_PLACEHOLDER_EXPIRATION") {
            Ok(raw) => parse_iso_date(&raw)
                .with_context(|| format!("SCAN_PLACEHOLDER_EXPIRATION is not a date: {raw}"))?,
            Err(_) => DEFAULT_PLACEHOLDER_EXPIRATION,
        };
        let default_quantity = match std::env::var("SCAN_DEFAULT_QUANTITY") {
            Ok(raw) => parse_quantity(&raw)
                .with_context(|| format!("SCAN_DEFAULT_QUANTITY is not a valid quantity: {raw}"))?,
            Err(_) => 1.0,
        };
        let scan = ScanConfig {
            upload_dir: std::env::var("SCAN_UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            default_quantity,
            placeholder_expiration,
            max_upload_bytes: env_parse("SCAN_MAX_UPLOAD_BYTES")?.unwrap_or(10 * 1024 * 1024),
        };

        Ok(Self {
            database_url,
            jwt,
            ai,
            scan,
        })
    }
}

/// Unset is `None`; a value that does not parse is an error.
fn env_parse<T>(key: &str) -> anyhow::Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .with_context(|| format!("{key} has an invalid value: {raw}")),
        Err(_) => Ok(None),
    }
}

pub(crate) fn parse_quantity(raw: &str) -> anyhow::Result<f64> {
    let quantity: f64 = raw.trim().parse()?;
    anyhow::ensure!(
        quantity.is_finite() && quantity >= 0.0,
        "quantity must be a non-negative number"
    );
    Ok(quantity)
}

pub(crate) fn parse_iso_date(raw: &str) -> anyhow::Result<Date> {
    let format = time::macros::format_description!("[year]-[month]-[day]");
    Ok(Date::parse(raw.trim(), &format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_dates() {
        assert_eq!(parse_iso_date("2026-12-31").unwrap(), date!(2026 - 12 - 31));
        assert_eq!(parse_iso_date(" 2099-01-02 ").unwrap(), date!(2099 - 01 - 02));
        assert!(parse_iso_date("31/12/2026").is_err());
    }

    #[test]
    fn scan_quantity_must_be_non_negative() {
        assert_eq!(parse_quantity(" 2.5 ").unwrap(), 2.5);
        assert_eq!(parse_quantity("0").unwrap(), 0.0);
        for bad in ["-1", "NaN", "inf", "lots"] {
            assert!(parse_quantity(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn unparseable_env_values_are_errors() {
        std::env::set_var("SMARTPANTRY_TEST_BAD_TIMEOUT", "thirty");
        let err = env_parse::<u64>("SMARTPANTRY_TEST_BAD_TIMEOUT").unwrap_err();
        assert!(err.to_string().contains("SMARTPANTRY_TEST_BAD_TIMEOUT"));

        std::env::set_var("SMARTPANTRY_TEST_GOOD_TIMEOUT", " 45 ");
        assert_eq!(env_parse::<u64>("SMARTPANTRY_TEST_GOOD_TIMEOUT").unwrap(), Some(45));
        assert_eq!(env_parse::<u64>("SMARTPANTRY_TEST_UNSET_TIMEOUT").unwrap(), None);
    }

    #[test]
    fn placeholder_expiration_is_far_future() {
        assert!(DEFAULT_PLACEHOLDER_EXPIRATION > date!(2090 - 01 - 01));
    }
}
