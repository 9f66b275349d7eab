use crate::error::ConfigError;
use std::path::PathBuf;

pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
pub const DEFAULT_KNOWLEDGE_BASE: &str = "medical_knowledge.json";

/// Which knowledge-base lookups run before the prompt is assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetrievalMode {
    /// No context block in the prompt.
    Disabled,
    /// Title substring match only.
    TitleOnly,
    /// Title match, then query-in-content match.
    #[default]
    TitleAndContent,
}

impl RetrievalMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "disabled" | "off" | "none" => Some(Self::Disabled),
            "title" => Some(Self::TitleOnly),
            "title_and_content" => Some(Self::TitleAndContent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub knowledge_base_path: PathBuf,
    pub retrieval: RetrievalMode,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENROUTER_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("OPENROUTER_API_KEY"))?;

        let max_tokens = match lookup("DOCTOR_BRAIN_MAX_TOKENS") {
            Some(value) => value.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "DOCTOR_BRAIN_MAX_TOKENS",
                value,
            })?,
            None => DEFAULT_MAX_TOKENS,
        };

        let retrieval = match lookup("DOCTOR_BRAIN_RETRIEVAL") {
            Some(value) => RetrievalMode::parse(&value).ok_or(ConfigError::Invalid {
                key: "DOCTOR_BRAIN_RETRIEVAL",
                value,
            })?,
            None => RetrievalMode::default(),
        };

        Ok(Self {
            api_key,
            model: lookup("DOCTOR_BRAIN_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: lookup("OPENROUTER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            max_tokens,
            knowledge_base_path: lookup("DOCTOR_BRAIN_KNOWLEDGE_BASE")
                .unwrap_or_else(|| DEFAULT_KNOWLEDGE_BASE.to_string())
                .into(),
            retrieval,
        })
    }
}
