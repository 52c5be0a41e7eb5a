use std::env;
use std::fmt::Display;
use std::str::FromStr;

use log::{debug, error, info};

use crate::error::{BotError, Result};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f64 = 0.7;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub ai_api_key: String,
    pub ai_base_url: String,
    pub completion: CompletionSettings,
}

/// Per-deployment completion parameters, fixed at client construction.
#[derive(Debug, Clone)]
pub struct CompletionSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f64,
}

impl Default for CompletionSettings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        debug!("Loading configuration from environment");
        dotenvy::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN").map_err(|e| {
            error!("Failed to load DISCORD_TOKEN from environment: {}", e);
            e
        })?;

        let ai_api_key = env::var("AI_API_KEY").map_err(|e| {
            error!("Failed to load AI_API_KEY from environment: {}", e);
            e
        })?;

        let ai_base_url =
            env::var("AI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let model = env::var("AI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let max_tokens = parse_var("AI_MAX_TOKENS", DEFAULT_MAX_TOKENS)?;
        let temperature = parse_var("AI_TEMPERATURE", DEFAULT_TEMPERATURE)?;

        info!("Configuration loaded successfully");
        debug!("Discord token length: {} characters", discord_token.len());
        debug!("AI API key length: {} characters", ai_api_key.len());
        debug!("AI base URL: {}", ai_base_url);
        debug!(
            "Completion model: {} (max_tokens: {}, temperature: {})",
            model, max_tokens, temperature
        );

        Ok(Self {
            discord_token,
            ai_api_key,
            ai_base_url,
            completion: CompletionSettings {
                model,
                max_tokens,
                temperature,
            },
        })
    }
}

/// Parse an optional environment override, keeping the default when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|e| {
            error!("Invalid value for {}: {}", name, e);
            BotError::Config(format!("invalid {name}: {e}"))
        }),
        Err(_) => Ok(default),
    }
}
