//! Process configuration, read once from the environment at startup.

use std::env;
use thiserror::Error;

pub const DEFAULT_LLM_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_LLM_MODEL: &str = "llama3-70b-8192";
pub const DEFAULT_COMMAND_PREFIX: &str = "/";

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{0} not specified in env")]
    Missing(&'static str),

    #[error("{name} is not a valid URL: {reason}")]
    InvalidUrl { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Discord bot token.
    pub discord_token: String,
    /// API key for the chat-completion endpoint.
    pub llm_api_key: String,
    /// Base URL of the OpenAI-compatible API, without the `/chat/completions` suffix.
    pub llm_base_url: String,
    pub llm_model: String,
    pub command_prefix: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discord_token = get("DISCORD_TOKEN").ok_or(ConfigError::Missing("DISCORD_TOKEN"))?;
        let llm_api_key = get("GROQ_API_KEY").ok_or(ConfigError::Missing("GROQ_API_KEY"))?;

        let llm_base_url = get("GROQ_BASE_URL").unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string());
        url::Url::parse(&llm_base_url).map_err(|e| ConfigError::InvalidUrl {
            name: "GROQ_BASE_URL",
            reason: e.to_string(),
        })?;

        Ok(Self {
            discord_token,
            llm_api_key,
            llm_base_url: llm_base_url.trim_end_matches('/').to_string(),
            llm_model: get("GROQ_MODEL").unwrap_or_else(|| DEFAULT_LLM_MODEL.to_string()),
            command_prefix: get("COMMAND_PREFIX")
                .unwrap_or_else(|| DEFAULT_COMMAND_PREFIX.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_secrets_are_set() {
        let config =
            Config::from_lookup(lookup(&[("DISCORD_TOKEN", "tok"), ("GROQ_API_KEY", "key")]))
                .unwrap();

        assert_eq!(config.discord_token, "tok");
        assert_eq!(config.llm_api_key, "key");
        assert_eq!(config.llm_base_url, DEFAULT_LLM_BASE_URL);
        assert_eq!(config.llm_model, DEFAULT_LLM_MODEL);
        assert_eq!(config.command_prefix, "/");
    }

    #[test]
    fn missing_discord_token_is_reported() {
        let err = Config::from_lookup(lookup(&[("GROQ_API_KEY", "key")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DISCORD_TOKEN"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[("DISCORD_TOKEN", "tok"), ("GROQ_API_KEY", "  ")]))
            .unwrap_err();
        assert_eq!(err, ConfigError::Missing("GROQ_API_KEY"));
    }

    #[test]
    fn base_url_is_validated_and_trimmed() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "tok"),
            ("GROQ_API_KEY", "key"),
            ("GROQ_BASE_URL", "http://localhost:8080/v1/"),
        ]))
        .unwrap();
        assert_eq!(config.llm_base_url, "http://localhost:8080/v1");

        let err = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "tok"),
            ("GROQ_API_KEY", "key"),
            ("GROQ_BASE_URL", "not a url"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidUrl { name: "GROQ_BASE_URL", .. }));
    }
}
