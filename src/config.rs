//! Typed settings built from the environment once at process start.
//!
//! Components receive these structs instead of reading the environment
//! themselves, so a misconfigured job fails before any network activity.

use crate::service::env::{get_bool_env, get_int_env, optional_env, require_env, EnvError};

pub const RAPIDAPI_HOST: &str = "seeking-alpha.p.rapidapi.com";
pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_MODEL: &str = "gpt-4.1";
pub const DEFAULT_MAX_OUTPUT_TOKENS: u32 = 16_000;

/// Credentials for the transcript/calendar gateway.
#[derive(Debug, Clone)]
pub struct RapidApiSettings {
    pub api_key: String,
    pub host: String,
}

impl RapidApiSettings {
    pub fn from_env() -> Result<Self, EnvError> {
        Ok(Self {
            api_key: require_env("RAPIDAPI_KEY")?,
            host: RAPIDAPI_HOST.to_string(),
        })
    }

    pub fn with_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            host: RAPIDAPI_HOST.to_string(),
        }
    }
}

/// Completion API credentials and generation parameters.
#[derive(Debug, Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub model: String,
    pub max_output_tokens: u32,
    pub base_url: String,
}

impl OpenAiSettings {
    /// Build from the environment. CLI overrides win over `OPENAI_MODEL` and
    /// `OPENAI_MAX_TOKENS`, which in turn win over the built-in defaults.
    pub fn from_env(
        model_override: Option<&str>,
        max_tokens_override: Option<u32>,
    ) -> Result<Self, EnvError> {
        let model = model_override
            .map(str::to_string)
            .or_else(|| optional_env("OPENAI_MODEL"))
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let max_output_tokens = match max_tokens_override {
            Some(value) => value,
            None => get_int_env("OPENAI_MAX_TOKENS", i64::from(DEFAULT_MAX_OUTPUT_TOKENS))? as u32,
        };

        Ok(Self {
            api_key: require_env("OPENAI_API_KEY")?,
            model,
            max_output_tokens,
            base_url: optional_env("OPENAI_BASE_URL").unwrap_or_else(|| OPENAI_BASE_URL.to_string()),
        })
    }
}

/// Mail submission settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub sender: String,
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub use_tls: bool,
}

impl SmtpSettings {
    pub fn from_env() -> Result<Self, EnvError> {
        Ok(Self {
            sender: require_env("SENDER_EMAIL")?,
            host: require_env("SMTP_HOST")?,
            port: get_int_env("SMTP_PORT", 587)? as u16,
            username: optional_env("SMTP_USERNAME"),
            password: optional_env("SMTP_PASSWORD"),
            use_tls: get_bool_env("SMTP_USE_TLS", true),
        })
    }
}
