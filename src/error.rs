use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Serenity error: {0}")]
    Serenity(Box<poise::serenity_prelude::Error>),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Completion API error ({status}): {message}")]
    Api {
        status: StatusCode,
        message: String,
    },

    #[error("Completion response error: {0}")]
    Response(String),

    #[error("HTTP request error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl From<poise::serenity_prelude::Error> for BotError {
    fn from(err: poise::serenity_prelude::Error) -> Self {
        BotError::Serenity(Box::new(err))
    }
}

impl BotError {
    /// Returns the error worded for display in chat. Provider failures keep
    /// their detail; everything else collapses to a generic apology.
    pub fn user_message(&self) -> String {
        match self {
            BotError::Api { .. } | BotError::Reqwest(_) => format!("API Error: {self}"),
            BotError::Response(_) => format!("Processing Error: {self}"),
            BotError::Serenity(_) | BotError::Config(_) | BotError::EnvVar(_) => {
                "Sorry, I encountered an error processing your request. Please try again."
                    .to_string()
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
