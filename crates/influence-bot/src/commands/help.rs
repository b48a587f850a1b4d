//! Help command - displays available commands.

pub struct HelpHandler {
    prefix: String,
}

impl HelpHandler {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    pub fn show(&self, topic: Option<&str>) -> String {
        let p = &self.prefix;

        match topic.map(str::to_lowercase).as_deref() {
            Some("about") => "**Asteroid bot**\n\
                Looks up Influence asteroids on Ethereum, links Discord \
                accounts to wallet addresses, and announces on-chain events \
                in subscribed channels."
                .into(),
            Some("verify") => format!(
                "`{p}verify <address>` - start linking a wallet address to \
                 your Discord account. You will get a link to sign a \
                 challenge; send the resulting signature back as a DM."
            ),
            Some("address") => format!(
                "`{p}address [@user]` - show the verified address for a user \
                 (yourself if no one is mentioned)."
            ),
            Some("user") => format!(
                "`{p}user <address>` - show the Discord user verified for an \
                 address."
            ),
            Some("asteroid") | Some("roid") => format!(
                "`{p}asteroid <id>` (alias `{p}roid`) - show owner and \
                 details for an asteroid."
            ),
            Some("owned") => format!(
                "`{p}owned [@user]` - list asteroids owned by a user's \
                 verified address."
            ),
            Some("events") => format!(
                "`{p}events [list]` - show announcement settings for this \
                 channel\n\
                 `{p}events on <Transfer|AsteroidScanned>` - enable a kind\n\
                 `{p}events off <Transfer|AsteroidScanned>` - disable a kind\n\
                 `{p}events clear` - remove this channel's settings"
            ),
            Some("ping") => format!("`{p}ping` - check the bot is alive."),
            _ => format!(
                "**Commands:**\n\
                 - `{p}help [topic]` - this message\n\
                 - `{p}about` - what this bot does\n\
                 - `{p}ping` - pong\n\
                 - `{p}verify <address>` - link a wallet to your account\n\
                 - `{p}address [@user]` - show a user's verified address\n\
                 - `{p}user <address>` - show who verified an address\n\
                 - `{p}asteroid <id>` / `{p}roid <id>` - asteroid details\n\
                 - `{p}owned [@user]` - list a user's asteroids\n\
                 - `{p}events` - channel announcement settings"
            ),
        }
    }
}
