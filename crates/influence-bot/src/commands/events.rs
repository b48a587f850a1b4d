//! Events command - per-channel announcement settings.

use crate::error::AppResult;
use crate::gateway::Inbound;
use binding_store::{BindingStore, EventKind};
use std::str::FromStr;
use tracing::info;

pub struct EventsHandler {
    store: BindingStore,
}

impl EventsHandler {
    pub fn new(store: BindingStore) -> Self {
        Self { store }
    }

    /// `events [list|on <kind>|off <kind>|clear]`, scoped to the channel the
    /// command was sent in.
    pub async fn handle(&self, msg: &Inbound, args: &[String]) -> AppResult<String> {
        let channel = &msg.channel_id;

        match args.first().map(|s| s.to_ascii_lowercase()).as_deref() {
            None | Some("list") => self.list(channel).await,
            Some("on") => self.toggle(channel, args.get(1), true).await,
            Some("off") => self.toggle(channel, args.get(1), false).await,
            Some("clear") => {
                self.store.remove_channel_events(channel).await?;
                info!("Cleared event settings for channel {}", channel);
                Ok("Announcement settings cleared for this channel.".into())
            }
            Some(_) => Ok(usage()),
        }
    }

    async fn list(&self, channel: &str) -> AppResult<String> {
        let events = self.store.get_channel_events(channel).await?;

        let lines: Vec<String> = EventKind::ALL
            .iter()
            .map(|kind| {
                let state = if events.get(*kind) { "on" } else { "off" };
                format!("- {}: {}", kind, state)
            })
            .collect();

        Ok(format!(
            "Announcements in this channel:\n{}",
            lines.join("\n")
        ))
    }

    async fn toggle(
        &self,
        channel: &str,
        kind: Option<&String>,
        enabled: bool,
    ) -> AppResult<String> {
        let Some(kind) = kind.and_then(|k| EventKind::from_str(k).ok()) else {
            return Ok(usage());
        };

        let mut events = self.store.get_channel_events(channel).await?;
        events.set(kind, enabled);
        self.store.set_channel_events(&events).await?;

        info!(
            "{} announcements {} for channel {}",
            kind,
            if enabled { "enabled" } else { "disabled" },
            channel
        );

        Ok(format!(
            "{} announcements {} for this channel.",
            kind,
            if enabled { "enabled" } else { "disabled" }
        ))
    }
}

fn usage() -> String {
    "Usage: `events [list|on <Transfer|AsteroidScanned>|off <Transfer|AsteroidScanned>|clear]`"
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inbound_in_channel(channel_id: &str) -> Inbound {
        Inbound {
            author_id: "1111".into(),
            author_name: "tester".into(),
            author_is_bot: false,
            channel_id: channel_id.into(),
            text: String::new(),
            is_dm: false,
        }
    }

    async fn test_handler() -> EventsHandler {
        EventsHandler::new(BindingStore::open_in_memory().await.unwrap())
    }

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[tokio::test]
    async fn test_list_defaults_to_all_off() {
        let handler = test_handler().await;

        let reply = handler
            .handle(&inbound_in_channel("42"), &[])
            .await
            .unwrap();
        assert!(reply.contains("Transfer: off"));
        assert!(reply.contains("AsteroidScanned: off"));
    }

    #[tokio::test]
    async fn test_enable_then_list() {
        let handler = test_handler().await;
        let msg = inbound_in_channel("42");

        let reply = handler.handle(&msg, &args(&["on", "transfer"])).await.unwrap();
        assert_eq!(reply, "Transfer announcements enabled for this channel.");

        let reply = handler.handle(&msg, &args(&["list"])).await.unwrap();
        assert!(reply.contains("Transfer: on"));
        assert!(reply.contains("AsteroidScanned: off"));

        let channels = handler
            .store
            .list_event_channels(EventKind::Transfer)
            .await
            .unwrap();
        assert_eq!(channels, vec!["42".to_string()]);
    }

    #[tokio::test]
    async fn test_toggle_preserves_other_flags() {
        let handler = test_handler().await;
        let msg = inbound_in_channel("42");

        handler.handle(&msg, &args(&["on", "transfer"])).await.unwrap();
        handler.handle(&msg, &args(&["on", "scanned"])).await.unwrap();
        handler.handle(&msg, &args(&["off", "transfer"])).await.unwrap();

        let events = handler.store.get_channel_events("42").await.unwrap();
        assert!(!events.transfer);
        assert!(events.asteroid_scanned);
    }

    #[tokio::test]
    async fn test_clear_removes_row() {
        let handler = test_handler().await;
        let msg = inbound_in_channel("42");

        handler.handle(&msg, &args(&["on", "transfer"])).await.unwrap();
        let reply = handler.handle(&msg, &args(&["clear"])).await.unwrap();
        assert!(reply.contains("cleared"));

        let channels = handler
            .store
            .list_event_channels(EventKind::Transfer)
            .await
            .unwrap();
        assert!(channels.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_kind_is_usage_error() {
        let handler = test_handler().await;

        let reply = handler
            .handle(&inbound_in_channel("42"), &args(&["on", "minted"]))
            .await
            .unwrap();
        assert!(reply.starts_with("Usage:"));
    }

    #[tokio::test]
    async fn test_unknown_subcommand_is_usage_error() {
        let handler = test_handler().await;

        let reply = handler
            .handle(&inbound_in_channel("42"), &args(&["frobnicate"]))
            .await
            .unwrap();
        assert!(reply.starts_with("Usage:"));
    }

    #[tokio::test]
    async fn test_settings_are_per_channel() {
        let handler = test_handler().await;

        handler
            .handle(&inbound_in_channel("42"), &args(&["on", "transfer"]))
            .await
            .unwrap();

        let other = handler.store.get_channel_events("43").await.unwrap();
        assert!(!other.transfer);
    }
}
