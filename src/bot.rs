//! Discord bot bootstrap and event handling.

use log::{debug, info};
use poise::{
    Framework, FrameworkOptions, builtins,
    serenity_prelude::{ClientBuilder, Context, FullEvent, GatewayIntents},
};

use crate::commands;
use crate::completion::CompletionClient;
use crate::config::Config;
use crate::error::{BotError, Result};
use crate::relay::{DiscordChat, Relay};

const COMMAND_PREFIX: char = '/';

pub struct Data {
    pub relay: Relay<CompletionClient>,
}

/// Run the bot. The completion client is closed exactly once on every exit
/// path: normal shutdown, interrupt, or a startup failure after construction.
pub async fn run() -> Result<()> {
    info!("Initializing bot");
    let config = Config::from_env()?;

    debug!("Initializing completion client");
    let client = CompletionClient::new(
        config.ai_api_key.clone(),
        config.ai_base_url.clone(),
        config.completion.clone(),
    )?;

    let result = serve(&config, client.clone()).await;

    client.close();
    result
}

async fn serve(config: &Config, client: CompletionClient) -> Result<()> {
    debug!("Setting up gateway intents");
    let intents = GatewayIntents::non_privileged() | GatewayIntents::MESSAGE_CONTENT;

    debug!("Building framework");
    let framework = Framework::builder()
        .options(FrameworkOptions {
            commands: vec![commands::start(), commands::help()],
            event_handler: |ctx, event, _framework, data| Box::pin(event_handler(ctx, event, data)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, framework| {
            Box::pin(async move {
                info!("Bot is ready and connected to Discord");
                builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Commands registered successfully");
                Ok(Data {
                    relay: Relay::new(client),
                })
            })
        })
        .build();

    debug!("Creating Discord client");
    let mut discord = ClientBuilder::new(config.discord_token.clone(), intents)
        .framework(framework)
        .await?;

    info!("Starting Discord client");
    tokio::select! {
        result = discord.start() => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received, shutting down...");
        }
    }

    Ok(())
}

async fn event_handler(
    ctx: &Context,
    event: &FullEvent,
    data: &Data,
) -> std::result::Result<(), BotError> {
    if let FullEvent::Message { new_message } = event {
        // Bots (including this one) and command messages are not relayed;
        // commands go through the framework.
        if new_message.author.bot || new_message.content.starts_with(COMMAND_PREFIX) {
            return Ok(());
        }

        info!(
            "Received message from {} in channel {}",
            new_message.author.tag(),
            new_message.channel_id
        );

        let chat = DiscordChat::new(ctx.http.clone(), new_message.channel_id);
        data.relay.handle(&new_message.content, &chat).await;
    }
    Ok(())
}
