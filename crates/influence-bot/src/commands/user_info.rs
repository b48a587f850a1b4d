//! Address/user lookup commands.

use crate::commands::parse_mention;
use crate::error::AppResult;
use crate::gateway::Inbound;
use alloy_primitives::Address;
use binding_store::BindingStore;
use std::str::FromStr;

pub struct UserInfoHandler {
    store: BindingStore,
}

impl UserInfoHandler {
    pub fn new(store: BindingStore) -> Self {
        Self { store }
    }

    /// `address [@user]` - verified address for a user, defaulting to the
    /// sender.
    pub async fn show_address(&self, msg: &Inbound, args: &[String]) -> AppResult<String> {
        let target = match args.first() {
            Some(token) => match parse_mention(token) {
                Some(id) => id,
                None => return Ok("Usage: `address [@user]`".into()),
            },
            None => msg.author_id.clone(),
        };

        let reply = match self.store.get_address(&target).await? {
            Some(address) if target == msg.author_id => {
                format!("Your verified address is {}", address)
            }
            Some(address) => format!("<@{}>'s verified address is {}", target, address),
            None if target == msg.author_id => {
                "You have not verified an address yet. Use `verify <address>`.".into()
            }
            None => format!("<@{}> has not verified an address.", target),
        };

        Ok(reply)
    }

    /// `user <address>` - Discord user verified for an address.
    pub async fn show_user(&self, args: &[String]) -> AppResult<String> {
        let address = match args.first().map(|a| Address::from_str(a)) {
            Some(Ok(address)) => address.to_checksum(None),
            _ => return Ok("Usage: `user <address>`".into()),
        };

        let reply = match self.store.get_discord_id(&address).await? {
            Some(discord_id) => format!("{} belongs to <@{}>", address, discord_id),
            None => "No user is bound to this address.".into(),
        };

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADDRESS: &str = "0x32be343b94f860124dc4fee278fdcbd38c102d88";

    /// The canonical EIP-55 form, as the verify flow persists it.
    fn checksummed() -> String {
        Address::from_str(ADDRESS).unwrap().to_checksum(None)
    }

    fn inbound_from(author_id: &str) -> Inbound {
        Inbound {
            author_id: author_id.into(),
            author_name: "tester".into(),
            author_is_bot: false,
            channel_id: "42".into(),
            text: String::new(),
            is_dm: false,
        }
    }

    async fn handler_with_binding() -> UserInfoHandler {
        let store = BindingStore::open_in_memory().await.unwrap();
        store.set_address("1111", &checksummed()).await.unwrap();
        UserInfoHandler::new(store)
    }

    #[tokio::test]
    async fn test_show_address_for_sender() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_address(&inbound_from("1111"), &[])
            .await
            .unwrap();
        assert_eq!(
            reply,
            format!("Your verified address is {}", checksummed())
        );
    }

    #[tokio::test]
    async fn test_show_address_for_mentioned_user() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_address(&inbound_from("2222"), &["<@1111>".to_string()])
            .await
            .unwrap();
        assert_eq!(
            reply,
            format!("<@1111>'s verified address is {}", checksummed())
        );
    }

    #[tokio::test]
    async fn test_show_address_unverified() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_address(&inbound_from("9999"), &[])
            .await
            .unwrap();
        assert!(reply.contains("not verified"));
    }

    #[tokio::test]
    async fn test_show_address_with_non_mention_arg() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_address(&inbound_from("1111"), &["bob".to_string()])
            .await
            .unwrap();
        assert!(reply.starts_with("Usage:"));
    }

    #[tokio::test]
    async fn test_show_user_found() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_user(&[ADDRESS.to_string()])
            .await
            .unwrap();
        assert_eq!(reply, format!("{} belongs to <@1111>", checksummed()));
    }

    #[tokio::test]
    async fn test_show_user_accepts_lowercase_input() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_user(&[ADDRESS.to_lowercase()])
            .await
            .unwrap();
        assert_eq!(reply, format!("{} belongs to <@1111>", checksummed()));
    }

    #[tokio::test]
    async fn test_show_user_unbound() {
        let handler = handler_with_binding().await;

        let reply = handler
            .show_user(&["0xDe0B295669a9FD93d5F28D9Ec85E40f4cb697BAe".to_string()])
            .await
            .unwrap();
        assert_eq!(reply, "No user is bound to this address.");
    }

    #[tokio::test]
    async fn test_show_user_malformed_address() {
        let handler = handler_with_binding().await;

        let reply = handler.show_user(&["nope".to_string()]).await.unwrap();
        assert!(reply.starts_with("Usage:"));
    }
}
