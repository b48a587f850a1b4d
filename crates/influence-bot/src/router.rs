//! Command parsing and message dispatch.

use crate::commands::*;
use crate::error::AppResult;
use crate::gateway::Inbound;
use binding_store::BindingStore;
use influence_client::InfluenceClient;
use std::sync::Arc;
use tracing::info;

/// A parsed bot command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help { topic: Option<String> },
    Ping,
    Verify { args: Vec<String> },
    Address { args: Vec<String> },
    User { args: Vec<String> },
    Asteroid { args: Vec<String> },
    Owned { args: Vec<String> },
    Events { args: Vec<String> },
}

impl Command {
    /// Parse message text into a command.
    ///
    /// The prefix must be at position 0; the first token after it selects
    /// the command case-insensitively. Unknown commands parse to `None` and
    /// are silently ignored by the dispatcher.
    pub fn parse(text: &str, prefix: &str) -> Option<Command> {
        let rest = text.strip_prefix(prefix)?;
        let mut tokens = rest.trim().split_whitespace();
        let command = tokens.next()?.to_lowercase();
        let args: Vec<String> = tokens.map(String::from).collect();

        match command.as_str() {
            "help" => Some(Command::Help {
                topic: args.first().cloned(),
            }),
            // Alias for 'help about'
            "about" => Some(Command::Help {
                topic: Some("about".into()),
            }),
            "ping" => Some(Command::Ping),
            "verify" => Some(Command::Verify { args }),
            "address" => Some(Command::Address { args }),
            "user" => Some(Command::User { args }),
            "asteroid" | "roid" => Some(Command::Asteroid { args }),
            "owned" => Some(Command::Owned { args }),
            "events" => Some(Command::Events { args }),
            _ => None,
        }
    }
}

/// Routes inbound messages to command handlers.
///
/// Holds the store handle and the pending-session map explicitly so tests
/// can build isolated instances.
pub struct Dispatcher {
    prefix: String,
    test_user: Option<String>,
    help: HelpHandler,
    verify: VerifyHandler,
    user_info: UserInfoHandler,
    asteroids: AsteroidsHandler,
    events: EventsHandler,
}

impl Dispatcher {
    pub fn new(
        prefix: impl Into<String>,
        test_user: Option<String>,
        store: BindingStore,
        chain: Option<Arc<InfluenceClient>>,
        verification_link: Option<String>,
    ) -> Self {
        let prefix = prefix.into();
        let sessions = SessionMap::new();

        Self {
            help: HelpHandler::new(prefix.clone()),
            verify: VerifyHandler::new(store.clone(), sessions, verification_link),
            user_info: UserInfoHandler::new(store.clone()),
            asteroids: AsteroidsHandler::new(chain, store.clone()),
            events: EventsHandler::new(store),
            prefix,
            test_user,
        }
    }

    /// Handle one message, returning the reply text if any.
    ///
    /// `None` means the message is silently ignored: bot authors, users
    /// outside the single-user restriction, non-command text, and unknown
    /// commands.
    pub async fn dispatch(&self, msg: &Inbound) -> AppResult<Option<String>> {
        // Ignore bots
        if msg.author_is_bot {
            return Ok(None);
        }

        // The restriction gates everything, pending verification DMs
        // included.
        if let Some(user) = &self.test_user {
            if &msg.author_name != user {
                return Ok(None);
            }
        }

        // A DM from a user mid-verification is the signature payload, not a
        // command.
        if msg.is_dm && self.verify.is_pending(&msg.author_id).await {
            let reply = self.verify.complete(&msg.author_id, &msg.text).await?;
            return Ok(Some(reply));
        }

        let Some(command) = Command::parse(&msg.text, &self.prefix) else {
            return Ok(None);
        };

        let reply = match command {
            Command::Help { topic } => self.help.show(topic.as_deref()),
            Command::Ping => {
                info!("ping");
                "pong".into()
            }
            Command::Verify { args } => self.verify.prepare(&msg.author_id, &args).await,
            Command::Address { args } => self.user_info.show_address(msg, &args).await?,
            Command::User { args } => self.user_info.show_user(&args).await?,
            Command::Asteroid { args } => self.asteroids.show_asteroid(&args).await?,
            Command::Owned { args } => self.asteroids.show_owned(msg, &args).await?,
            Command::Events { args } => self.events.handle(msg, &args).await?,
        };

        Ok(Some(reply))
    }
}
