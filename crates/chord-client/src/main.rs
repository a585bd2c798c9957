//! Example bot
//!
//! Run with:
//! ```bash
//! DISCORD_TOKEN=... cargo run -p chord-client --bin chord-bot
//! ```
//!
//! Answers `!ping`, `!server`, `!user-info` and `!avatar`.

use chord_client::{Client, ClientEvent, Message};
use chord_common::{try_init_tracing_with_config, ClientConfig, TracingConfig};
use tokio::sync::broadcast::error::RecvError;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    if let Err(e) = run(config).await {
        error!(error = %e, "Bot stopped");
        std::process::exit(1);
    }
}

async fn run(config: ClientConfig) -> anyhow::Result<()> {
    let client = Client::new(config);
    let mut events = client.subscribe();

    client.on_ready(|user| info!(user = %user.tag(), "Logged in"));
    client.login(None)?;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down");
                client.close();
                return Ok(());
            }
            event = events.recv() => match event {
                Ok(ClientEvent::Message(message)) => {
                    let client = client.clone();
                    tokio::spawn(async move {
                        if let Err(e) = handle_command(&client, &message).await {
                            warn!(error = %e, command = %message.content, "Command failed");
                        }
                    });
                }
                Ok(ClientEvent::Debug(text)) => tracing::debug!(%text, "Gateway"),
                Ok(_) => {}
                Err(RecvError::Lagged(skipped)) => warn!(skipped, "Event stream lagged"),
                Err(RecvError::Closed) => return Ok(()),
            },
        }
    }
}

async fn handle_command(client: &Client, message: &Message) -> anyhow::Result<()> {
    if message.author.is_bot() {
        return Ok(());
    }

    match message.content.trim() {
        "!ping" => {
            client
                .send_message(message.channel_id.as_str(), "Pong.")
                .await?;
        }
        "!server" => {
            let Some(guild) = message
                .guild_id
                .as_ref()
                .and_then(|id| client.guild(id.as_str()))
            else {
                return Ok(());
            };
            let content = format!(
                "This server's name is: {}\nTotal members: {}",
                guild.name.as_deref().unwrap_or("unknown"),
                guild.total_members()
            );
            client
                .send_message(message.channel_id.as_str(), content)
                .await?;
        }
        "!user-info" => {
            let content = format!(
                "Your username: {}\nYour ID: {}",
                message.author.username, message.author.id
            );
            client.reply(message, content).await?;
        }
        "!avatar" => {
            let user = message.mentions.first().unwrap_or(&message.author);
            let avatar = client
                .avatar_url(user)
                .unwrap_or_else(|| "no avatar set".to_string());
            client
                .send_message(
                    message.channel_id.as_str(),
                    format!("{}'s avatar: {avatar}", user.username),
                )
                .await?;
        }
        _ => {}
    }
    Ok(())
}
