//! Kind-specific message body constructors.
//!
//! Composition is a pure, synchronous transform: all references must already
//! be resolved to protocol identifiers before these run. Protocol size
//! limits are checked later by the encoder; composition only rejects invalid
//! field combinations.

use thiserror::Error;

use super::{
    AccountId, CastAddBody, CastId, LinkKind, MessageBody, MessageHash, ReactionKind,
    TargetReference,
};
use crate::resolve::Mention;

/// Composition errors (invalid field combinations).
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A cast may reply to a parent cast or address a channel, never both.
    #[error("a cast cannot have both a reply target and a channel")]
    ConflictingParent,
}

/// Compose a cast-add body from stripped text and resolved references.
///
/// `mentions` come from the reference resolver and keep its order; they are
/// split into the protocol's parallel account/position arrays here.
pub fn cast_add(
    text: String,
    mentions: Vec<Mention>,
    reply_to: Option<CastId>,
    channel_url: Option<String>,
    embeds: Vec<String>,
) -> Result<MessageBody, ComposeError> {
    let parent = match (reply_to, channel_url) {
        (Some(_), Some(_)) => return Err(ComposeError::ConflictingParent),
        (Some(cast), None) => Some(TargetReference::Cast(cast)),
        (None, Some(url)) => Some(TargetReference::Channel(url)),
        (None, None) => None,
    };

    let (accounts, positions) = mentions
        .into_iter()
        .map(|m| (m.account_id, m.position))
        .unzip();

    Ok(MessageBody::CastAdd(CastAddBody {
        text,
        mentions: accounts,
        mention_positions: positions,
        embeds,
        parent,
    }))
}

/// Compose a cast-remove body. Only the target hash is needed.
pub fn cast_remove(target_hash: MessageHash) -> MessageBody {
    MessageBody::CastRemove { target_hash }
}

/// Compose a reaction-add body. The target must already be resolved to a
/// full cast ID (account + hash) via the cast lookup.
pub fn reaction_add(kind: ReactionKind, target: CastId) -> MessageBody {
    MessageBody::ReactionAdd { kind, target }
}

/// Compose a reaction-remove body.
pub fn reaction_remove(kind: ReactionKind, target: CastId) -> MessageBody {
    MessageBody::ReactionRemove { kind, target }
}

/// Compose a link-add body (e.g. follow).
pub fn link_add(kind: LinkKind, target: AccountId) -> MessageBody {
    MessageBody::LinkAdd { kind, target }
}

/// Compose a link-remove body.
pub fn link_remove(kind: LinkKind, target: AccountId) -> MessageBody {
    MessageBody::LinkRemove { kind, target }
}
