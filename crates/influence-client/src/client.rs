//! JSON-RPC client for the asteroid token contract.

use crate::error::ChainError;
use crate::types::*;
use alloy_primitives::{address, Address, Bytes, U256, U64};
use alloy_sol_types::{sol, SolCall, SolEvent};
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Asteroid token contract on mainnet.
pub const DEFAULT_ASTEROID_CONTRACT: Address =
    address!("6fb7e0aafba16396ad6c1046027717bca25f821f");

sol! {
    /// ERC-721 surface backing the asteroid token.
    interface IAsteroidToken {
        function ownerOf(uint256 tokenId) external view returns (address);
        function balanceOf(address owner) external view returns (uint256);
        function tokenOfOwnerByIndex(address owner, uint256 index) external view returns (uint256);

        event Transfer(address indexed from, address indexed to, uint256 indexed tokenId);
        event AsteroidScanned(uint256 indexed asteroidId);
    }
}

/// Infura-backed chain client.
///
/// The project secret is held as a `SecretString` and only surfaces as the
/// basic-auth password on outgoing requests.
#[derive(Clone)]
pub struct InfluenceClient {
    client: Client,
    endpoint: String,
    secret: Option<SecretString>,
    contract: Address,
}

impl InfluenceClient {
    /// Create a client against the Infura mainnet endpoint.
    pub fn new(
        project_id: &str,
        project_secret: Option<SecretString>,
        contract: Address,
    ) -> Result<Self, ChainError> {
        let mut client = Self::from_endpoint(
            format!("https://mainnet.infura.io/v3/{}", project_id),
            contract,
        )?;
        client.secret = project_secret;
        Ok(client)
    }

    /// Create a client against an arbitrary JSON-RPC endpoint.
    pub fn from_endpoint(
        endpoint: impl Into<String>,
        contract: Address,
    ) -> Result<Self, ChainError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            secret: None,
            contract,
        })
    }

    /// The asteroid contract this client queries.
    pub fn contract(&self) -> Address {
        self.contract
    }

    async fn rpc<T: DeserializeOwned>(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<T, ChainError> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            id: 1,
            method,
            params,
        };

        let mut builder = self.client.post(&self.endpoint).json(&request);
        if let Some(secret) = &self.secret {
            builder = builder.basic_auth("", Some(secret.expose_secret()));
        }

        let response = builder.send().await?;
        if !response.status().is_success() {
            let msg = response.text().await.unwrap_or_default();
            return Err(ChainError::Rpc(msg));
        }

        let body: JsonRpcResponse<T> = response.json().await?;
        if let Some(error) = body.error {
            // Reverted calls come back as a plain RPC error.
            if error.message.contains("revert") {
                return Err(ChainError::NotFound);
            }
            return Err(ChainError::Rpc(format!("{} ({})", error.message, error.code)));
        }

        body.result
            .ok_or_else(|| ChainError::Rpc("missing result".into()))
    }

    async fn eth_call(&self, data: Vec<u8>) -> Result<Bytes, ChainError> {
        self.rpc(
            "eth_call",
            json!([
                { "to": self.contract, "data": Bytes::from(data) },
                "latest"
            ]),
        )
        .await
    }

    /// Current owner of an asteroid.
    #[instrument(skip(self))]
    pub async fn owner_of(&self, asteroid_id: u64) -> Result<Address, ChainError> {
        if !is_valid_id(asteroid_id) {
            return Err(ChainError::InvalidId(asteroid_id));
        }

        let call = IAsteroidToken::ownerOfCall {
            tokenId: U256::from(asteroid_id),
        };
        let result = self.eth_call(call.abi_encode()).await?;
        if result.is_empty() {
            return Err(ChainError::NotFound);
        }

        let owner = IAsteroidToken::ownerOfCall::abi_decode_returns(&result)?;
        debug!("Asteroid {} owned by {}", asteroid_id, owner);
        Ok(owner)
    }

    /// Owner plus derived attributes for an asteroid.
    #[instrument(skip(self))]
    pub async fn asteroid(&self, asteroid_id: u64) -> Result<AsteroidInfo, ChainError> {
        let owner = self.owner_of(asteroid_id).await?;
        Ok(AsteroidInfo::derive(asteroid_id, owner))
    }

    /// All asteroid ids owned by an address, via the enumerable extension.
    #[instrument(skip(self))]
    pub async fn owned_asteroids(&self, owner: Address) -> Result<Vec<u64>, ChainError> {
        let call = IAsteroidToken::balanceOfCall { owner };
        let result = self.eth_call(call.abi_encode()).await?;
        let balance = IAsteroidToken::balanceOfCall::abi_decode_returns(&result)?;
        let count = balance.to::<u64>();

        let mut asteroids = Vec::with_capacity(count as usize);
        for index in 0..count {
            let call = IAsteroidToken::tokenOfOwnerByIndexCall {
                owner,
                index: U256::from(index),
            };
            let result = self.eth_call(call.abi_encode()).await?;
            let id = IAsteroidToken::tokenOfOwnerByIndexCall::abi_decode_returns(&result)?;
            asteroids.push(id.to::<u64>());
        }

        debug!("{} owns {} asteroids", owner, asteroids.len());
        Ok(asteroids)
    }

    /// Current chain head.
    #[instrument(skip(self))]
    pub async fn block_number(&self) -> Result<u64, ChainError> {
        let number: U64 = self.rpc("eth_blockNumber", json!([])).await?;
        Ok(number.to::<u64>())
    }

    /// Decoded contract events in the inclusive block range.
    ///
    /// Logs with an unrecognized topic are skipped.
    #[instrument(skip(self))]
    pub async fn events_since(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ChainEvent>, ChainError> {
        let logs: Vec<LogEntry> = self
            .rpc(
                "eth_getLogs",
                json!([{
                    "fromBlock": format!("0x{:x}", from_block),
                    "toBlock": format!("0x{:x}", to_block),
                    "address": self.contract,
                }]),
            )
            .await?;

        let mut events = Vec::new();
        for log in logs {
            match decode_event(&log) {
                Some(event) => events.push(event),
                None => warn!("Skipping log with unrecognized topics: {:?}", log.topics),
            }
        }

        debug!(
            "Decoded {} events in blocks {}..={}",
            events.len(),
            from_block,
            to_block
        );
        Ok(events)
    }
}

fn decode_event(log: &LogEntry) -> Option<ChainEvent> {
    let topic0 = log.topics.first()?;

    if *topic0 == IAsteroidToken::Transfer::SIGNATURE_HASH && log.topics.len() == 4 {
        return Some(ChainEvent::Transfer {
            from: Address::from_word(log.topics[1]),
            to: Address::from_word(log.topics[2]),
            asteroid: U256::from_be_bytes(log.topics[3].0).to::<u64>(),
        });
    }

    if *topic0 == IAsteroidToken::AsteroidScanned::SIGNATURE_HASH && log.topics.len() == 2 {
        return Some(ChainEvent::AsteroidScanned {
            asteroid: U256::from_be_bytes(log.topics[1].0).to::<u64>(),
        });
    }

    None
}
