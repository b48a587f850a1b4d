//! Asteroid lookup commands.

use crate::commands::parse_mention;
use crate::error::AppResult;
use crate::gateway::Inbound;
use binding_store::BindingStore;
use influence_client::{AsteroidInfo, InfluenceClient};
use std::str::FromStr;
use std::sync::Arc;
use tracing::warn;

/// Longest list of ids rendered before truncating.
const MAX_LISTED: usize = 25;

pub struct AsteroidsHandler {
    chain: Option<Arc<InfluenceClient>>,
    store: BindingStore,
}

impl AsteroidsHandler {
    pub fn new(chain: Option<Arc<InfluenceClient>>, store: BindingStore) -> Self {
        Self { chain, store }
    }

    /// `asteroid <id>` - owner and details for one asteroid.
    pub async fn show_asteroid(&self, args: &[String]) -> AppResult<String> {
        let Some(chain) = &self.chain else {
            return Ok("On-chain lookups are unavailable right now.".into());
        };

        let Some(id) = args.first().and_then(|a| u64::from_str(a).ok()) else {
            return Ok("Usage: `asteroid <id>`".into());
        };

        match chain.asteroid(id).await {
            Ok(info) => Ok(format_asteroid(&info)),
            Err(e) => {
                warn!("Asteroid {} lookup failed: {}", id, e);
                Ok(format!("Could not find asteroid {}.", id))
            }
        }
    }

    /// `owned [@user]` - asteroids owned by a user's verified address.
    pub async fn show_owned(&self, msg: &Inbound, args: &[String]) -> AppResult<String> {
        let Some(chain) = &self.chain else {
            return Ok("On-chain lookups are unavailable right now.".into());
        };

        let target = match args.first() {
            Some(token) => match parse_mention(token) {
                Some(id) => id,
                None => return Ok("Usage: `owned [@user]`".into()),
            },
            None => msg.author_id.clone(),
        };

        let Some(address) = self.store.get_address(&target).await? else {
            return Ok(if target == msg.author_id {
                "You have not verified an address yet. Use `verify <address>`.".into()
            } else {
                format!("<@{}> has not verified an address.", target)
            });
        };

        let Ok(owner) = address.parse() else {
            warn!("Stored address for {} is malformed: {}", target, address);
            return Ok("Could not fetch asteroids right now.".into());
        };

        match chain.owned_asteroids(owner).await {
            Ok(ids) if ids.is_empty() => Ok("No asteroids found.".into()),
            Ok(ids) => Ok(format_owned(&target, msg, &ids)),
            Err(e) => {
                warn!("Owned lookup for {} failed: {}", address, e);
                Ok("Could not fetch asteroids right now.".into())
            }
        }
    }
}

fn format_asteroid(info: &AsteroidInfo) -> String {
    let title = match &info.name {
        Some(name) => format!("Asteroid #{} - {}", info.id, name),
        None => format!("Asteroid #{}", info.id),
    };

    format!(
        "{}\nOwner: {}\nSpectral class: {}\nRadius: {:.1} km",
        title,
        info.owner.to_checksum(None),
        info.spectral,
        info.radius_m / 1000.0
    )
}

fn format_owned(target: &str, msg: &Inbound, ids: &[u64]) -> String {
    let listed: Vec<String> = ids
        .iter()
        .take(MAX_LISTED)
        .map(|id| format!("#{}", id))
        .collect();

    let mut list = listed.join(", ");
    if ids.len() > MAX_LISTED {
        list.push_str(&format!(" and {} more", ids.len() - MAX_LISTED));
    }

    if target == msg.author_id {
        format!("You own {} asteroid(s): {}", ids.len(), list)
    } else {
        format!("<@{}> owns {} asteroid(s): {}", target, ids.len(), list)
    }
}
