//! Bot command handlers.

mod asteroids;
mod events;
mod help;
mod user_info;
mod verify;

pub use asteroids::AsteroidsHandler;
pub use events::EventsHandler;
pub use help::HelpHandler;
pub use user_info::UserInfoHandler;
pub use verify::{SessionMap, VerifyHandler};

/// Extract the user id from a raw Discord mention token
/// (`<@123>` or `<@!123>`).
pub(crate) fn parse_mention(token: &str) -> Option<String> {
    let inner = token.strip_prefix("<@")?.strip_suffix('>')?;
    let id = inner.strip_prefix('!').unwrap_or(inner);

    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id.to_string())
    } else {
        None
    }
}
