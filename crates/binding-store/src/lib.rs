//! SQLite persistence for the asteroid bot.
//!
//! Two tables: `addresses` linking chain addresses to Discord users, and
//! `channel_events` holding per-channel announcement flags. Both are created
//! lazily on first open.

mod error;
mod store;
mod types;

pub use error::StoreError;
pub use store::BindingStore;
pub use types::*;
