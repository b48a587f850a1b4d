//! Discord gateway adapter.
//!
//! The serenity event handler does no work of its own: every incoming
//! message is converted to an [`Inbound`] and pushed onto a channel that a
//! single dispatch loop consumes, so one handler always completes before
//! the next message is processed.

use crate::error::{AppError, AppResult};
use serenity::all::{ChannelId, Context, EventHandler, Http, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// An incoming chat message, decoupled from the platform types.
#[derive(Debug, Clone)]
pub struct Inbound {
    /// Author's user id (snowflake as a string).
    pub author_id: String,
    /// Author's username, used by the single-user restriction.
    pub author_name: String,
    /// Whether the author is an automated account.
    pub author_is_bot: bool,
    /// Channel the message arrived in.
    pub channel_id: String,
    /// Raw message text.
    pub text: String,
    /// True for direct messages.
    pub is_dm: bool,
}

impl Inbound {
    pub fn from_message(msg: &Message) -> Self {
        Self {
            author_id: msg.author.id.to_string(),
            author_name: msg.author.name.clone(),
            author_is_bot: msg.author.bot,
            channel_id: msg.channel_id.to_string(),
            text: msg.content.clone(),
            is_dm: msg.guild_id.is_none(),
        }
    }
}

/// Serenity event handler forwarding messages into the dispatch channel.
pub struct Gateway {
    tx: mpsc::Sender<Inbound>,
}

impl Gateway {
    pub fn new(tx: mpsc::Sender<Inbound>) -> Self {
        Self { tx }
    }
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Discord login successful as {}", ready.user.name);
    }

    async fn message(&self, _ctx: Context, msg: Message) {
        let inbound = Inbound::from_message(&msg);
        debug!(
            "Received {} byte message from {}",
            inbound.text.len(),
            inbound.author_name
        );

        if self.tx.send(inbound).await.is_err() {
            warn!("Inbound channel closed; dropping message");
        }
    }
}

/// Outbound side of the gateway, shared by the dispatch loop and the
/// announcer.
#[derive(Clone)]
pub struct Responder {
    http: Arc<Http>,
}

impl Responder {
    pub fn new(http: Arc<Http>) -> Self {
        Self { http }
    }

    /// Send `text` to a channel.
    pub async fn send(&self, channel_id: &str, text: &str) -> AppResult<()> {
        let id: u64 = channel_id
            .parse()
            .map_err(|_| AppError::InvalidChannel(channel_id.to_string()))?;

        ChannelId::new(id).say(&self.http, text).await?;
        Ok(())
    }
}
