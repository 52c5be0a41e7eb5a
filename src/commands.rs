//! Slash commands for the greeting and usage help.

use crate::bot::Data;
use crate::error::{BotError, Result};

/// Context type for the relay commands.
type Context<'a> = poise::Context<'a, Data, BotError>;

const WELCOME_TEXT: &str = "AI Assistant Bot

Welcome! I'm your professional AI assistant powered by advanced language models.

Available Commands:
/start - Show this welcome message
/help - Get assistance

Simply send me a message and I'll respond with AI-powered insights!";

const HELP_TEXT: &str = "Help Guide

- Just type your message and I'll respond
- I can help with questions, writing, analysis, and more
- Keep messages under 2000 characters for best results

Examples:
- \"Explain quantum computing\"
- \"Write a Python function for...\"
- \"Help me plan a project\"

For technical issues, contact the administrator.";

/// Show the welcome message.
#[poise::command(slash_command)]
pub async fn start(ctx: Context<'_>) -> Result<()> {
    ctx.say(WELCOME_TEXT).await?;
    Ok(())
}

/// Show the help guide.
#[poise::command(slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<()> {
    ctx.say(HELP_TEXT).await?;
    Ok(())
}
