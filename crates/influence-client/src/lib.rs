//! Ethereum JSON-RPC client for asteroid ownership and event lookups.
//!
//! Talks to an Infura endpoint with plain `eth_call`/`eth_getLogs` requests;
//! ABI encoding is handled by `alloy-sol-types`. Asteroid attributes are
//! derived deterministically from the token id.

mod client;
mod error;
mod types;

pub use client::{InfluenceClient, DEFAULT_ASTEROID_CONTRACT};
pub use error::ChainError;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::IAsteroidToken;
    use alloy_primitives::{hex, Address};
    use alloy_sol_types::{SolCall, SolEvent};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const OWNER: &str = "32be343b94f860124dc4fee278fdcbd38c102d88";

    fn test_client(server: &MockServer) -> InfluenceClient {
        InfluenceClient::from_endpoint(server.uri(), DEFAULT_ASTEROID_CONTRACT).unwrap()
    }

    fn word(hex_tail: &str) -> String {
        format!("0x{:0>64}", hex_tail)
    }

    fn rpc_result(result: serde_json::Value) -> serde_json::Value {
        json!({ "jsonrpc": "2.0", "id": 1, "result": result })
    }

    #[tokio::test]
    async fn test_owner_of_decodes_address() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/"))
            .and(body_string_contains(hex::encode(
                IAsteroidToken::ownerOfCall::SELECTOR,
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(json!(word(OWNER)))))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let owner = client.owner_of(1).await.unwrap();

        assert_eq!(owner, OWNER.parse::<Address>().unwrap());
    }

    #[tokio::test]
    async fn test_owner_of_maps_revert_to_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": 1,
                "error": { "code": 3, "message": "execution reverted" }
            })))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let result = client.owner_of(1).await;

        assert!(matches!(result, Err(ChainError::NotFound)));
    }

    #[tokio::test]
    async fn test_owner_of_rejects_out_of_belt_id() {
        let server = MockServer::start().await;
        let client = test_client(&server);

        assert!(matches!(
            client.owner_of(0).await,
            Err(ChainError::InvalidId(0))
        ));
        assert!(matches!(
            client.owner_of(ASTEROID_COUNT + 1).await,
            Err(ChainError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_owned_asteroids_enumerates_tokens() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains(hex::encode(
                IAsteroidToken::balanceOfCall::SELECTOR,
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(json!(word("1")))))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(body_string_contains(hex::encode(
                IAsteroidToken::tokenOfOwnerByIndexCall::SELECTOR,
            )))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(json!(word("2a")))))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let owned = client
            .owned_asteroids(OWNER.parse().unwrap())
            .await
            .unwrap();

        assert_eq!(owned, vec![42]);
    }

    #[tokio::test]
    async fn test_block_number() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_string_contains("eth_blockNumber"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(json!("0x1b4"))))
            .mount(&server)
            .await;

        let client = test_client(&server);
        assert_eq!(client.block_number().await.unwrap(), 436);
    }

    #[tokio::test]
    async fn test_events_since_decodes_known_topics() {
        let server = MockServer::start().await;

        let transfer_topic = IAsteroidToken::Transfer::SIGNATURE_HASH.to_string();
        let scanned_topic = IAsteroidToken::AsteroidScanned::SIGNATURE_HASH.to_string();

        let logs = json!([
            {
                "address": format!("{}", DEFAULT_ASTEROID_CONTRACT),
                "topics": [transfer_topic, word("0"), word(OWNER), word("7")],
                "data": "0x",
                "blockNumber": "0x10",
                "transactionHash": word("ff")
            },
            {
                "address": format!("{}", DEFAULT_ASTEROID_CONTRACT),
                "topics": [scanned_topic, word("7")],
                "data": "0x",
                "blockNumber": "0x11",
                "transactionHash": word("fe")
            },
            {
                "address": format!("{}", DEFAULT_ASTEROID_CONTRACT),
                "topics": [word("dead")],
                "data": "0x",
                "blockNumber": "0x12",
                "transactionHash": word("fd")
            }
        ]);

        Mock::given(method("POST"))
            .and(body_string_contains("eth_getLogs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(rpc_result(logs)))
            .mount(&server)
            .await;

        let client = test_client(&server);
        let events = client.events_since(16, 18).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            ChainEvent::Transfer {
                from: Address::ZERO,
                to: OWNER.parse().unwrap(),
                asteroid: 7,
            }
        );
        assert_eq!(events[1], ChainEvent::AsteroidScanned { asteroid: 7 });
    }

    #[test]
    fn test_radius_follows_power_law() {
        assert!((radius_m(1) - 375_142.0).abs() < 1e-6);
        assert!(radius_m(2) < radius_m(1));
        // The belt tail is roughly kilometer-scale.
        let tail = radius_m(ASTEROID_COUNT);
        assert!(tail > 900.0 && tail < 1_200.0);
    }

    #[test]
    fn test_spectral_class_is_deterministic() {
        assert_eq!(spectral_class(42), spectral_class(42));
        // Not every asteroid shares a class.
        let classes: std::collections::HashSet<String> =
            (1..=100).map(|id| spectral_class(id).to_string()).collect();
        assert!(classes.len() > 1);
    }

    #[test]
    fn test_adalia_prime_is_named() {
        assert_eq!(asteroid_name(1).as_deref(), Some("Adalia Prime"));
        assert_eq!(asteroid_name(2), None);
    }

    #[test]
    fn test_valid_id_bounds() {
        assert!(!is_valid_id(0));
        assert!(is_valid_id(1));
        assert!(is_valid_id(ASTEROID_COUNT));
        assert!(!is_valid_id(ASTEROID_COUNT + 1));
    }

    #[test]
    fn test_event_kind_names() {
        let transfer = ChainEvent::Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            asteroid: 1,
        };
        assert_eq!(transfer.kind(), "Transfer");
        assert_eq!(ChainEvent::AsteroidScanned { asteroid: 1 }.kind(), "AsteroidScanned");
    }
}
