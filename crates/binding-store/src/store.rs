//! SQLite-backed storage for address bindings and channel event flags.

use crate::error::StoreError;
use crate::types::*;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Persistent store backed by a single SQLite file.
///
/// Both tables are created idempotently on open. Write serialization is
/// delegated to SQLite; the store holds no locks of its own.
#[derive(Clone)]
pub struct BindingStore {
    pool: SqlitePool,
}

impl BindingStore {
    /// Open (creating if missing) the database at `path` and run migrations.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        info!("Binding store ready at {}", path.as_ref().display());
        Ok(store)
    }

    /// Open a fresh in-memory database. Used by tests.
    pub async fn open_in_memory() -> Result<Self, StoreError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS addresses (
                address TEXT PRIMARY KEY,
                discord_id TEXT
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_addresses_address ON addresses (address)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_addresses_discord_id ON addresses (discord_id)",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS channel_events (
                channel TEXT PRIMARY KEY,
                transfer INTEGER NOT NULL DEFAULT 0,
                asteroid_scanned INTEGER NOT NULL DEFAULT 0
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_channel_events_channel \
             ON channel_events (channel)",
        )
        .execute(&self.pool)
        .await?;

        debug!("Migrations applied");
        Ok(())
    }

    // Addresses

    /// Bind `address` to `discord_id`, replacing any row that conflicts on
    /// either unique column. Last write wins.
    #[instrument(skip(self))]
    pub async fn set_address(&self, discord_id: &str, address: &str) -> Result<(), StoreError> {
        sqlx::query("INSERT OR REPLACE INTO addresses (address, discord_id) VALUES (?1, ?2)")
            .bind(address)
            .bind(discord_id)
            .execute(&self.pool)
            .await?;

        info!("Bound {} to {}", address, discord_id);
        Ok(())
    }

    /// Address bound to a Discord user, if any.
    #[instrument(skip(self))]
    pub async fn get_address(&self, discord_id: &str) -> Result<Option<String>, StoreError> {
        let binding = sqlx::query_as::<_, AddressBinding>(
            "SELECT address, discord_id FROM addresses WHERE discord_id = ?1",
        )
        .bind(discord_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding.map(|b| b.address))
    }

    /// Discord user bound to an address, if any.
    #[instrument(skip(self))]
    pub async fn get_discord_id(&self, address: &str) -> Result<Option<String>, StoreError> {
        let binding = sqlx::query_as::<_, AddressBinding>(
            "SELECT address, discord_id FROM addresses WHERE address = ?1",
        )
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(binding.map(|b| b.discord_id))
    }

    // Event channels

    /// Channels whose flag for `kind` is set.
    #[instrument(skip(self))]
    pub async fn list_event_channels(&self, kind: EventKind) -> Result<Vec<String>, StoreError> {
        // Column name comes from the enum, never from user input.
        let query = format!(
            "SELECT channel FROM channel_events WHERE {} = 1",
            kind.column()
        );

        let channels = sqlx::query_scalar(&query).fetch_all(&self.pool).await?;
        Ok(channels)
    }

    /// Flags for a channel. A channel without a row reads as all-off;
    /// the default is not written back.
    #[instrument(skip(self))]
    pub async fn get_channel_events(&self, channel: &str) -> Result<ChannelEvents, StoreError> {
        let row = sqlx::query_as::<_, ChannelEvents>(
            "SELECT channel, transfer, asteroid_scanned FROM channel_events WHERE channel = ?1",
        )
        .bind(channel)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.unwrap_or_else(|| ChannelEvents::unset(channel)))
    }

    /// Replace the flags for a channel.
    #[instrument(skip(self))]
    pub async fn set_channel_events(&self, events: &ChannelEvents) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT OR REPLACE INTO channel_events (channel, transfer, asteroid_scanned) \
             VALUES (?1, ?2, ?3)",
        )
        .bind(&events.channel)
        .bind(events.transfer)
        .bind(events.asteroid_scanned)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Delete a channel's row. Deleting an absent row is a no-op.
    #[instrument(skip(self))]
    pub async fn remove_channel_events(&self, channel: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM channel_events WHERE channel = ?1")
            .bind(channel)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
