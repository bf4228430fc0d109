//! Protocol message data model.
//!
//! Every user action (post, delete, react, follow) becomes a `MessageData`
//! value: a kind-specific body plus the acting account, a timestamp, and the
//! network tag. The canonical CBOR encoding of that value is what gets
//! hashed and signed.
//!
//! Key invariants:
//! - A cast addresses at most one parent (reply target OR channel), never both
//! - Mention account IDs and byte positions are parallel arrays, same order
//! - The message hash is a content address (BLAKE3-20 of the payload bytes),
//!   not an externally assigned ID

pub mod compose;
pub mod encode;
pub mod sign;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Seconds between the Unix epoch and the protocol epoch (2021-01-01T00:00:00Z).
///
/// Message timestamps are counted from the protocol epoch to keep them small.
pub const PROTOCOL_EPOCH_UNIX: u64 = 1_609_459_200;

/// Truncated digest length for message content addressing (20 bytes).
pub const MESSAGE_HASH_LEN: usize = 20;

/// Numeric protocol account identifier.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Content address of a signed message.
///
/// Produced by `MessageHash::digest` as a BLAKE3 hash truncated to 20 bytes.
/// Parsed hashes (reply URIs, CLI arguments) may carry fewer bytes; the hub
/// is the authority on whether such a reference resolves.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageHash(pub Vec<u8>);

impl MessageHash {
    /// Content-address a canonical payload: BLAKE3, truncated to 20 bytes.
    pub fn digest(payload: &[u8]) -> Self {
        let full = blake3::hash(payload);
        Self(full.as_bytes()[..MESSAGE_HASH_LEN].to_vec())
    }

    /// Parse a `0x`-prefixed hex string. Returns `None` unless the prefix is
    /// present and the remainder is non-empty, even-length hex.
    pub fn from_hex(s: &str) -> Option<Self> {
        let stripped = s.strip_prefix("0x")?;
        if stripped.is_empty() {
            return None;
        }
        hex::decode(stripped).ok().map(Self)
    }

    /// Lowercase `0x`-prefixed hex rendering.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }

    /// Raw hash bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for MessageHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Network tag baked into every signed message.
///
/// A message signed for one network is invalid on the others.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    Mainnet,
    Testnet,
    Devnet,
}

impl std::str::FromStr for Network {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" => Ok(Self::Devnet),
            other => Err(format!("unknown network '{other}'")),
        }
    }
}

/// Reaction kinds supported by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Like,
    Recast,
}

impl std::str::FromStr for ReactionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "like" => Ok(Self::Like),
            "recast" => Ok(Self::Recast),
            other => Err(format!("unknown reaction kind '{other}'")),
        }
    }
}

/// Link kinds supported by the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkKind {
    Follow,
}

/// Account + hash pair identifying a specific cast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastId {
    pub account_id: AccountId,
    pub hash: MessageHash,
}

/// What a cast is addressed to: a parent cast (reply) or a channel.
///
/// At most one per cast; the composer rejects both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetReference {
    Cast(CastId),
    Channel(String),
}

/// Body of a cast-add message.
///
/// `mentions` and `mention_positions` are parallel arrays: entry *i* names
/// the account referenced at byte offset `mention_positions[i]` of `text`
/// (offsets are into the stripped UTF-8 text).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastAddBody {
    pub text: String,
    pub mentions: Vec<AccountId>,
    pub mention_positions: Vec<u32>,
    pub embeds: Vec<String>,
    pub parent: Option<TargetReference>,
}

/// Kind-specific message payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageBody {
    CastAdd(CastAddBody),
    CastRemove {
        target_hash: MessageHash,
    },
    ReactionAdd {
        kind: ReactionKind,
        target: CastId,
    },
    ReactionRemove {
        kind: ReactionKind,
        target: CastId,
    },
    LinkAdd {
        kind: LinkKind,
        target: AccountId,
    },
    LinkRemove {
        kind: LinkKind,
        target: AccountId,
    },
}

/// The canonical signing payload: body plus acting account, timestamp
/// (seconds since the protocol epoch), and network tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageData {
    pub body: MessageBody,
    pub account_id: AccountId,
    pub timestamp: u64,
    pub network: Network,
}
