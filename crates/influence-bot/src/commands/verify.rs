//! Verify command - links a Discord account to a wallet address.
//!
//! Two steps: `verify <address>` records a pending session and points the
//! user at the signing page; the next DM from that user is taken as the
//! signature over their Discord ID and must recover to the claimed address.

use crate::error::AppResult;
use alloy_primitives::{keccak256, Address, Signature, B256};
use binding_store::BindingStore;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Prefix for EIP-191 personal sign messages.
const EIP191_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// In-memory pending verification sessions, keyed by Discord user id.
///
/// Sessions never survive a restart; an interrupted verification is simply
/// restarted with `verify`.
#[derive(Clone, Default)]
pub struct SessionMap {
    inner: Arc<RwLock<HashMap<String, Address>>>,
}

impl SessionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, discord_id: &str, address: Address) {
        let mut sessions = self.inner.write().await;
        sessions.insert(discord_id.to_string(), address);
    }

    /// Remove and return the pending address for a user.
    pub async fn take(&self, discord_id: &str) -> Option<Address> {
        let mut sessions = self.inner.write().await;
        sessions.remove(discord_id)
    }

    pub async fn is_pending(&self, discord_id: &str) -> bool {
        let sessions = self.inner.read().await;
        sessions.contains_key(discord_id)
    }
}

pub struct VerifyHandler {
    store: BindingStore,
    sessions: SessionMap,
    verification_link: Option<String>,
}

impl VerifyHandler {
    pub fn new(
        store: BindingStore,
        sessions: SessionMap,
        verification_link: Option<String>,
    ) -> Self {
        Self {
            store,
            sessions,
            verification_link,
        }
    }

    /// Whether the next DM from this user is a verification payload.
    pub async fn is_pending(&self, discord_id: &str) -> bool {
        self.sessions.is_pending(discord_id).await
    }

    /// Start a verification session for `verify <address>`.
    pub async fn prepare(&self, discord_id: &str, args: &[String]) -> String {
        let Some(link) = &self.verification_link else {
            return "Verification is not available right now.".into();
        };

        let address = match args.first().map(|a| Address::from_str(a)) {
            Some(Ok(address)) => address,
            _ => {
                return "Usage: `verify <address>` - the address must be a \
                        0x-prefixed hex address."
                    .into();
            }
        };

        self.sessions.insert(discord_id, address).await;
        info!("Verification started for {}", discord_id);

        format!(
            "Verification started for {}.\n\
             1. Open {}?user={} and sign the challenge with that wallet.\n\
             2. Send me the signature here as a direct message.",
            address.to_checksum(None),
            link,
            discord_id
        )
    }

    /// Consume a pending session with the signature sent by DM.
    ///
    /// Success or failure, the session is cleared; a failed attempt is
    /// restarted from scratch with `verify`.
    pub async fn complete(&self, discord_id: &str, payload: &str) -> AppResult<String> {
        let Some(expected) = self.sessions.take(discord_id).await else {
            return Ok(
                "No verification in progress. Start with `verify <address>`.".into(),
            );
        };

        let recovered = match recover_signer(discord_id, payload.trim()) {
            Ok(address) => address,
            Err(reason) => {
                debug!("Signature rejected for {}: {}", discord_id, reason);
                return Ok(
                    "Verification failed: that doesn't look like a valid \
                     signature. Start again with the verify command."
                        .into(),
                );
            }
        };

        if recovered != expected {
            warn!(
                "Signature for {} recovered {} instead of {}",
                discord_id,
                recovered,
                expected.to_checksum(None)
            );
            return Ok(format!(
                "Verification failed: the signature was made by {}, not {}. \
                 Start again with the verify command.",
                recovered.to_checksum(None),
                expected.to_checksum(None)
            ));
        }

        let address = expected.to_checksum(None);
        self.store.set_address(discord_id, &address).await?;
        info!("Verification complete for {}", discord_id);

        Ok(format!(
            "Verification complete. {} is now linked to your Discord account.",
            address
        ))
    }
}

fn eip191_hash(message: &str) -> B256 {
    let prefixed = format!("{}{}{}", EIP191_PREFIX, message.len(), message);
    keccak256(prefixed.as_bytes())
}

/// Recover the EIP-191 signer of `message` from a hex signature.
fn recover_signer(message: &str, signature_hex: &str) -> Result<Address, String> {
    let sig_bytes = hex::decode(signature_hex.trim_start_matches("0x"))
        .map_err(|e| format!("invalid signature hex: {}", e))?;

    if sig_bytes.len() != 65 {
        return Err(format!(
            "invalid signature length: expected 65, got {}",
            sig_bytes.len()
        ));
    }

    let sig = Signature::try_from(sig_bytes.as_slice())
        .map_err(|e| format!("invalid signature: {}", e))?;

    let hash = eip191_hash(message);

    sig.recover_address_from_prehash(&hash)
        .map_err(|e| format!("failed to recover address: {}", e))
}
