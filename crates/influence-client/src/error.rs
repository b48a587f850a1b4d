//! Chain client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChainError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("ABI decode error: {0}")]
    Abi(#[from] alloy_sol_types::Error),

    #[error("Asteroid not found")]
    NotFound,

    #[error("Invalid asteroid id: {0}")]
    InvalidId(u64),
}
