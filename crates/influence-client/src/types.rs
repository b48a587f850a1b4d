//! Chain data types and asteroid attribute derivation.

use alloy_primitives::{keccak256, Address, Bytes, B256, U64};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Total asteroids in the belt. Token ids run `1..=ASTEROID_COUNT`.
pub const ASTEROID_COUNT: u64 = 250_000;

/// Radius of asteroid #1 (Adalia Prime), in meters.
const MAX_RADIUS_M: f64 = 375_142.0;

/// JSON-RPC 2.0 request envelope.
#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u32,
    pub method: &'a str,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<JsonRpcErrorBody>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JsonRpcErrorBody {
    pub code: i64,
    pub message: String,
}

/// A single `eth_getLogs` entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_number: Option<U64>,
    pub transaction_hash: Option<B256>,
}

/// Decoded contract event the bot can announce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainEvent {
    Transfer {
        from: Address,
        to: Address,
        asteroid: u64,
    },
    AsteroidScanned {
        asteroid: u64,
    },
}

impl ChainEvent {
    /// Event name, matching the channel-registry flag names.
    pub fn kind(&self) -> &'static str {
        match self {
            ChainEvent::Transfer { .. } => "Transfer",
            ChainEvent::AsteroidScanned { .. } => "AsteroidScanned",
        }
    }
}

/// Spectral classes in the belt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpectralClass {
    C,
    Cm,
    Ci,
    Cs,
    Cms,
    Cis,
    S,
    Sm,
    Si,
    M,
    I,
}

impl fmt::Display for SpectralClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SpectralClass::C => "C",
            SpectralClass::Cm => "Cm",
            SpectralClass::Ci => "Ci",
            SpectralClass::Cs => "Cs",
            SpectralClass::Cms => "Cms",
            SpectralClass::Cis => "Cis",
            SpectralClass::S => "S",
            SpectralClass::Sm => "Sm",
            SpectralClass::Si => "Si",
            SpectralClass::M => "M",
            SpectralClass::I => "I",
        };
        f.write_str(s)
    }
}

/// Cumulative per-mille weights for the spectral distribution.
const SPECTRAL_WEIGHTS: [(SpectralClass, u64); 11] = [
    (SpectralClass::C, 397),
    (SpectralClass::Cm, 501),
    (SpectralClass::Ci, 625),
    (SpectralClass::Cs, 694),
    (SpectralClass::Cms, 753),
    (SpectralClass::Cis, 823),
    (SpectralClass::S, 917),
    (SpectralClass::Sm, 946),
    (SpectralClass::Si, 981),
    (SpectralClass::M, 993),
    (SpectralClass::I, 1000),
];

/// Ownership plus the attributes derived from the token id.
#[derive(Debug, Clone, PartialEq)]
pub struct AsteroidInfo {
    pub id: u64,
    pub owner: Address,
    pub name: Option<String>,
    pub spectral: SpectralClass,
    pub radius_m: f64,
}

impl AsteroidInfo {
    pub fn derive(id: u64, owner: Address) -> Self {
        Self {
            id,
            owner,
            name: asteroid_name(id),
            spectral: spectral_class(id),
            radius_m: radius_m(id),
        }
    }
}

/// Belt radii follow a power law: the largest rock is id 1 and the
/// smallest (~1 km) sits at the end of the 250k belt.
pub fn radius_m(id: u64) -> f64 {
    MAX_RADIUS_M / (id as f64).powf(0.475)
}

/// Spectral class drawn from a keccak-seeded weighted distribution,
/// deterministic per token id.
pub fn spectral_class(id: u64) -> SpectralClass {
    let seed = keccak256(id.to_be_bytes());
    let mut word = [0u8; 8];
    word.copy_from_slice(&seed[..8]);
    let roll = u64::from_be_bytes(word) % 1000;

    for (class, bound) in SPECTRAL_WEIGHTS {
        if roll < bound {
            return class;
        }
    }
    SpectralClass::I
}

pub fn asteroid_name(id: u64) -> Option<String> {
    match id {
        1 => Some("Adalia Prime".to_string()),
        _ => None,
    }
}

/// Whether `id` is a valid belt token id.
pub fn is_valid_id(id: u64) -> bool {
    (1..=ASTEROID_COUNT).contains(&id)
}
