use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

pub const DEFAULT_LLM_BASE_URL: &str = "https://router.huggingface.co/v1";
pub const DEFAULT_LLM_MODEL: &str = "utter-project/EuroLLM-22B-Instruct-2512:publicai";
pub const DEFAULT_CORPUS_BASE_URL: &str = "https://datasets-server.huggingface.co";
pub const DEFAULT_CORPUS_DATASET: &str = "0xnbk/resume-ats-score-v1-en";

/// Application configuration loaded from environment variables.
/// Everything has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Unset disables the LLM writer; summaries and descriptions come from templates.
    pub hf_token: Option<String>,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_timeout: Duration,
    pub corpus_base_url: String,
    pub corpus_dataset: String,
    pub corpus_timeout: Duration,
    pub corpus_enabled: bool,
    pub random_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Config {
            port: parse_or(&lookup, "PORT", 8080)?,
            rust_log: var("RUST_LOG", "info"),
            hf_token: lookup("HF_TOKEN").filter(|t| !t.trim().is_empty()),
            llm_base_url: var("LLM_BASE_URL", DEFAULT_LLM_BASE_URL),
            llm_model: var("LLM_MODEL", DEFAULT_LLM_MODEL),
            llm_timeout: Duration::from_secs(parse_or(&lookup, "LLM_TIMEOUT_SECS", 20)?),
            corpus_base_url: var("CORPUS_BASE_URL", DEFAULT_CORPUS_BASE_URL),
            corpus_dataset: var("CORPUS_DATASET", DEFAULT_CORPUS_DATASET),
            corpus_timeout: Duration::from_secs(parse_or(&lookup, "CORPUS_TIMEOUT_SECS", 10)?),
            corpus_enabled: parse_or(&lookup, "CORPUS_ENABLED", true)?,
            random_seed: lookup("ATS_RANDOM_SEED")
                .map(|v| {
                    v.parse::<u64>()
                        .with_context(|| format!("ATS_RANDOM_SEED must be an unsigned integer, got '{v}'"))
                })
                .transpose()?,
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        None => Ok(default),
    }
}
