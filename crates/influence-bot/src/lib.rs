//! Discord bot for Influence asteroids.
//!
//! Routes prefix commands to on-chain asteroid lookups, runs the wallet
//! verification handshake, and announces contract events in subscribed
//! channels.

pub mod announcer;
pub mod commands;
pub mod config;
pub mod error;
pub mod gateway;
pub mod router;
