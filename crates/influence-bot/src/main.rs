//! Influence asteroid Discord bot - main entry point.

use anyhow::Context;
use binding_store::BindingStore;
use influence_bot::announcer::Announcer;
use influence_bot::config::Config;
use influence_bot::error::AppResult;
use influence_bot::gateway::{Gateway, Responder};
use influence_bot::router::Dispatcher;
use influence_client::InfluenceClient;
use secrecy::ExposeSecret;
use serenity::all::GatewayIntents;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> AppResult<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    init_logging(&config.log_level);

    info!("Starting asteroid bot...");
    info!("Prefix is {}", config.prefix);
    if let Some(user) = &config.test_user {
        warn!("Running with access only for {}", user);
    }

    // Open persistence
    let store = BindingStore::open(&config.database_path)
        .await
        .context("Failed to open database")?;

    // Chain client is optional; without credentials the on-chain commands
    // degrade to "unavailable" replies.
    let contract = config
        .asteroid_contract
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid asteroid contract address: {}", e))?;

    let chain = match &config.infura_project_id {
        Some(project_id) => {
            let client = InfluenceClient::new(
                project_id,
                config.infura_project_secret.clone(),
                contract,
            )
            .context("Failed to create chain client")?;
            info!("Chain client ready for contract {}", contract);
            Some(Arc::new(client))
        }
        None => {
            warn!("Running without Infura credentials. On-chain lookups are disabled");
            None
        }
    };

    if config.verification_link.is_none() {
        warn!("Running without verification link. Users will not be able to verify their address");
    }

    let dispatcher = Dispatcher::new(
        config.prefix.clone(),
        config.test_user.clone(),
        store.clone(),
        chain.clone(),
        config.verification_link.clone(),
    );

    // Gateway: serenity pushes messages into this channel; the loop below
    // is the only consumer.
    let (tx, rx) = mpsc::channel(64);

    let intents = GatewayIntents::GUILDS
        | GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut discord = serenity::Client::builder(config.discord_token.expose_secret(), intents)
        .event_handler(Gateway::new(tx))
        .await
        .context("Failed to create Discord client")?;

    let responder = Responder::new(discord.http.clone());

    if let Some(chain) = chain {
        let announcer = Announcer::new(
            chain,
            store.clone(),
            responder.clone(),
            config.poll_interval,
        );
        tokio::spawn(announcer.run());
    }

    tokio::spawn(async move {
        if let Err(e) = discord.start().await {
            error!("Discord client error: {}", e);
        }
    });

    info!("Listening for messages...");

    // Main dispatch loop: one message at a time, each handler runs to
    // completion before the next message is taken.
    let mut stream = ReceiverStream::new(rx);
    loop {
        tokio::select! {
            Some(message) = stream.next() => {
                match dispatcher.dispatch(&message).await {
                    Ok(Some(reply)) => {
                        if let Err(e) = responder.send(&message.channel_id, &reply).await {
                            error!("Failed to send reply: {}", e);
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        error!("Handler error: {}", e);
                        let _ = responder
                            .send(&message.channel_id, "Sorry, something went wrong.")
                            .await;
                    }
                }
            }
            _ = signal::ctrl_c() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    info!("Shutting down...");
    Ok(())
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
