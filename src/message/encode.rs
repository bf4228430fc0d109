//! Canonical CBOR encoding for signed payloads.
//!
//! - CBOR via `ciborium` (NOT JSON or bincode)
//! - Deterministic for a given value, so payload bytes are stable inputs
//!   for hashing and signing
//! - Protocol limits are enforced here, before any bytes are produced:
//!   an oversized or malformed payload is an `EncodeError`, never retried

use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use super::{MessageBody, MessageData};

/// Maximum cast text length in UTF-8 bytes.
pub const MAX_TEXT_BYTES: usize = 320;

/// Maximum number of mentions per cast.
pub const MAX_MENTIONS: usize = 10;

/// Maximum number of embeds per cast.
pub const MAX_EMBEDS: usize = 2;

/// Maximum embed URL length in bytes.
pub const MAX_EMBED_BYTES: usize = 256;

/// Encoding errors.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// CBOR encoding failed.
    #[error("CBOR encoding failed: {0}")]
    Encode(String),

    /// CBOR decoding failed.
    #[error("CBOR decoding failed: {0}")]
    Decode(String),

    /// Cast text exceeds the protocol limit.
    #[error("cast text is {len} bytes, limit is {MAX_TEXT_BYTES}")]
    TextTooLong { len: usize },

    /// More mentions than the protocol allows.
    #[error("cast has {len} mentions, limit is {MAX_MENTIONS}")]
    TooManyMentions { len: usize },

    /// Mention account and position arrays disagree in length.
    #[error("{accounts} mention accounts but {positions} positions")]
    MentionArrayMismatch { accounts: usize, positions: usize },

    /// A mention position points past the end of the text.
    #[error("mention position {position} exceeds text length {len}")]
    MentionOutOfRange { position: u32, len: usize },

    /// More embeds than the protocol allows.
    #[error("cast has {len} embeds, limit is {MAX_EMBEDS}")]
    TooManyEmbeds { len: usize },

    /// An embed entry is empty or oversized.
    #[error("malformed embed: {0}")]
    MalformedEmbed(String),
}

/// Serialize to canonical CBOR bytes.
pub fn to_cbor<T: Serialize>(value: &T) -> Result<Vec<u8>, EncodeError> {
    let mut bytes = Vec::new();
    ciborium::into_writer(value, &mut bytes)
        .map_err(|e| EncodeError::Encode(format!("{e:?}")))?;
    Ok(bytes)
}

/// Deserialize from CBOR bytes.
pub fn from_cbor<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, EncodeError> {
    ciborium::from_reader(bytes).map_err(|e| EncodeError::Decode(format!("{e:?}")))
}

/// Validate protocol limits, then encode the canonical payload.
pub fn encode_payload(data: &MessageData) -> Result<Vec<u8>, EncodeError> {
    validate(data)?;
    to_cbor(data)
}

/// Check protocol-level constraints on a message payload.
///
/// Only cast-add bodies carry free-form content; the other kinds are
/// structurally valid by construction.
pub fn validate(data: &MessageData) -> Result<(), EncodeError> {
    let MessageBody::CastAdd(body) = &data.body else {
        return Ok(());
    };

    if body.text.len() > MAX_TEXT_BYTES {
        return Err(EncodeError::TextTooLong {
            len: body.text.len(),
        });
    }
    if body.mentions.len() > MAX_MENTIONS {
        return Err(EncodeError::TooManyMentions {
            len: body.mentions.len(),
        });
    }
    if body.mentions.len() != body.mention_positions.len() {
        return Err(EncodeError::MentionArrayMismatch {
            accounts: body.mentions.len(),
            positions: body.mention_positions.len(),
        });
    }
    for &position in &body.mention_positions {
        if position as usize > body.text.len() {
            return Err(EncodeError::MentionOutOfRange {
                position,
                len: body.text.len(),
            });
        }
    }
    if body.embeds.len() > MAX_EMBEDS {
        return Err(EncodeError::TooManyEmbeds {
            len: body.embeds.len(),
        });
    }
    for embed in &body.embeds {
        if embed.is_empty() {
            return Err(EncodeError::MalformedEmbed("empty embed URL".into()));
        }
        if embed.len() > MAX_EMBED_BYTES {
            return Err(EncodeError::MalformedEmbed(format!(
                "embed URL is {} bytes, limit is {MAX_EMBED_BYTES}",
                embed.len()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{AccountId, CastAddBody, MessageBody, MessageData, Network};

    fn cast_data(body: CastAddBody) -> MessageData {
        MessageData {
            body: MessageBody::CastAdd(body),
            account_id: AccountId(42),
            timestamp: 1000,
            network: Network::Testnet,
        }
    }

    fn plain_cast(text: &str) -> CastAddBody {
        CastAddBody {
            text: text.to_string(),
            mentions: vec![],
            mention_positions: vec![],
            embeds: vec![],
            parent: None,
        }
    }

    #[test]
    fn test_cbor_roundtrip() {
        let data = cast_data(plain_cast("gm"));
        let bytes = to_cbor(&data).unwrap();
        let recovered: MessageData = from_cbor(&bytes).unwrap();
        assert_eq!(data, recovered);
    }

    #[test]
    fn test_cbor_deterministic() {
        let data = cast_data(plain_cast("hello world"));
        assert_eq!(to_cbor(&data).unwrap(), to_cbor(&data).unwrap());
    }

    #[test]
    fn test_validate_accepts_plain_cast() {
        assert!(validate(&cast_data(plain_cast("gm"))).is_ok());
    }

    #[test]
    fn test_validate_rejects_oversized_text() {
        let result = validate(&cast_data(plain_cast(&"x".repeat(MAX_TEXT_BYTES + 1))));
        assert!(matches!(result, Err(EncodeError::TextTooLong { .. })));
    }

    #[test]
    fn test_validate_counts_text_in_bytes_not_chars() {
        // 107 crab emoji = 428 bytes but only 107 chars
        let result = validate(&cast_data(plain_cast(&"🦀".repeat(107))));
        assert!(matches!(result, Err(EncodeError::TextTooLong { .. })));
    }

    #[test]
    fn test_validate_rejects_mention_array_mismatch() {
        let mut body = plain_cast("hello");
        body.mentions = vec![AccountId(1), AccountId(2)];
        body.mention_positions = vec![0];
        let result = validate(&cast_data(body));
        assert!(matches!(result, Err(EncodeError::MentionArrayMismatch { .. })));
    }

    #[test]
    fn test_validate_rejects_out_of_range_position() {
        let mut body = plain_cast("hi");
        body.mentions = vec![AccountId(1)];
        body.mention_positions = vec![3];
        let result = validate(&cast_data(body));
        assert!(matches!(result, Err(EncodeError::MentionOutOfRange { .. })));
    }

    #[test]
    fn test_validate_rejects_too_many_mentions() {
        let mut body = plain_cast("crowd");
        body.mentions = (0..11).map(AccountId).collect();
        body.mention_positions = vec![0; 11];
        let result = validate(&cast_data(body));
        assert!(matches!(result, Err(EncodeError::TooManyMentions { .. })));
    }

    #[test]
    fn test_validate_rejects_malformed_embeds() {
        let mut body = plain_cast("look");
        body.embeds = vec![String::new()];
        let result = validate(&cast_data(body));
        assert!(matches!(result, Err(EncodeError::MalformedEmbed(_))));

        let mut body = plain_cast("look");
        body.embeds = vec!["a".into(), "b".into(), "c".into()];
        let result = validate(&cast_data(body));
        assert!(matches!(result, Err(EncodeError::TooManyEmbeds { .. })));
    }

    #[test]
    fn test_non_cast_bodies_skip_content_checks() {
        let data = MessageData {
            body: MessageBody::LinkAdd {
                kind: crate::message::LinkKind::Follow,
                target: AccountId(7),
            },
            account_id: AccountId(42),
            timestamp: 0,
            network: Network::Mainnet,
        };
        assert!(validate(&data).is_ok());
    }
}
