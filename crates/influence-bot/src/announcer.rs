//! Chain event announcer.
//!
//! Polls the asteroid contract for new logs and fans each event out to the
//! channels subscribed to that event kind. The block cursor is in-memory
//! only; a restart resumes from the current head.

use crate::error::AppResult;
use crate::gateway::Responder;
use binding_store::{BindingStore, EventKind};
use influence_client::{ChainEvent, InfluenceClient};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info};

pub struct Announcer {
    chain: Arc<InfluenceClient>,
    store: BindingStore,
    responder: Responder,
    poll_interval: Duration,
}

impl Announcer {
    pub fn new(
        chain: Arc<InfluenceClient>,
        store: BindingStore,
        responder: Responder,
        poll_interval: Duration,
    ) -> Self {
        Self {
            chain,
            store,
            responder,
            poll_interval,
        }
    }

    /// Run the poll loop forever. Errors are logged; the next tick retries
    /// from the same cursor.
    pub async fn run(self) {
        info!(
            "Announcer watching {} every {:?}",
            self.chain.contract(),
            self.poll_interval
        );

        let mut cursor: Option<u64> = None;
        let mut ticker = tokio::time::interval(self.poll_interval);

        loop {
            ticker.tick().await;
            if let Err(e) = self.poll(&mut cursor).await {
                error!("Event poll failed: {}", e);
            }
        }
    }

    async fn poll(&self, cursor: &mut Option<u64>) -> AppResult<()> {
        let head = self.chain.block_number().await?;

        let from = match *cursor {
            // First tick only establishes the cursor; history is not replayed.
            None => {
                *cursor = Some(head);
                return Ok(());
            }
            Some(last) if last >= head => return Ok(()),
            Some(last) => last + 1,
        };

        let events = self.chain.events_since(from, head).await?;
        *cursor = Some(head);

        for event in events {
            let Ok(kind) = EventKind::from_str(event.kind()) else {
                continue;
            };

            let channels = self.store.list_event_channels(kind).await?;
            if channels.is_empty() {
                continue;
            }

            let text = format_event(&event);
            debug!("Announcing {} to {} channel(s)", kind, channels.len());

            for channel in channels {
                if let Err(e) = self.responder.send(&channel, &text).await {
                    error!("Failed to announce in {}: {}", channel, e);
                }
            }
        }

        Ok(())
    }
}

fn format_event(event: &ChainEvent) -> String {
    match event {
        ChainEvent::Transfer { from, to, asteroid } if from.is_zero() => {
            format!(
                "Asteroid #{} was minted to {}",
                asteroid,
                to.to_checksum(None)
            )
        }
        ChainEvent::Transfer { from, to, asteroid } => {
            format!(
                "Asteroid #{} was transferred from {} to {}",
                asteroid,
                from.to_checksum(None),
                to.to_checksum(None)
            )
        }
        ChainEvent::AsteroidScanned { asteroid } => {
            format!("Asteroid #{} was scanned", asteroid)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Address;

    #[test]
    fn test_format_transfer() {
        let to = Address::repeat_byte(0x11);
        let from = Address::repeat_byte(0x22);

        let text = format_event(&ChainEvent::Transfer {
            from,
            to,
            asteroid: 7,
        });
        assert!(text.starts_with("Asteroid #7 was transferred from 0x"));
    }

    #[test]
    fn test_format_mint() {
        let text = format_event(&ChainEvent::Transfer {
            from: Address::ZERO,
            to: Address::repeat_byte(0x11),
            asteroid: 7,
        });
        assert!(text.starts_with("Asteroid #7 was minted to 0x"));
    }

    #[test]
    fn test_format_scan() {
        let text = format_event(&ChainEvent::AsteroidScanned { asteroid: 9 });
        assert_eq!(text, "Asteroid #9 was scanned");
    }

    #[test]
    fn test_event_kinds_map_to_registry_flags() {
        for kind in ["Transfer", "AsteroidScanned"] {
            assert!(EventKind::from_str(kind).is_ok());
        }
    }
}
