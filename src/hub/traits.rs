//! Trait abstractions for hub collaborators.
//!
//! The pipeline consumes these five interfaces and nothing else; they are
//! constructor-injected, never ambient. Trait objects keep every
//! implementation swappable — the HTTP hub client in production, the mock
//! hub in tests, and whatever key custody a deployment uses for signers.

use async_trait::async_trait;
use thiserror::Error;

use crate::identity::DelegatedSigner;
use crate::message::{AccountId, MessageHash};

/// Result type for hub collaborator calls.
pub type HubResult<T> = Result<T, HubError>;

/// Transport-level collaborator errors.
///
/// A *miss* (unknown name, unknown cast) is `Ok(None)`, not an error; these
/// variants mean the collaborator itself could not answer.
#[derive(Debug, Error)]
pub enum HubError {
    /// The request never produced a usable response.
    #[error("hub transport error: {0}")]
    Transport(String),

    /// The response arrived but could not be interpreted.
    #[error("unexpected hub response: {0}")]
    Protocol(String),
}

/// Hub verdict on a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The hub accepted the message and echoed its canonical hash.
    Accepted { hash: MessageHash },
    /// The hub refused the message; reason text is passed through verbatim.
    Rejected { reason: String },
}

/// Source of delegated signing credentials.
#[async_trait]
pub trait SignerProvider: Send + Sync {
    /// Fetch the signer for a user, or `None` if no signer is registered.
    async fn signer_for(&self, user_id: &str) -> HubResult<Option<DelegatedSigner>>;
}

/// Username-proof lookup: handle text to account ID.
#[async_trait]
pub trait NameLookup: Send + Sync {
    /// Resolve a handle (without the `@`) to its owning account.
    async fn resolve_name(&self, handle: &str) -> HubResult<Option<AccountId>>;
}

/// Channel-tag lookup: tag text to channel URL.
#[async_trait]
pub trait ChannelLookup: Send + Sync {
    /// Resolve a channel tag (without the `/`) to its channel URL.
    async fn resolve_channel(&self, tag: &str) -> HubResult<Option<String>>;
}

/// Cast lookup: message hash to its author.
#[async_trait]
pub trait CastLookup: Send + Sync {
    /// Find the account that authored the cast with this hash.
    async fn cast_author(&self, hash: &MessageHash) -> HubResult<Option<AccountId>>;
}

/// Submission endpoint for signed message envelopes.
#[async_trait]
pub trait RelayClient: Send + Sync {
    /// Submit an encoded envelope. Single call, single attempt — retry
    /// policy belongs to the caller.
    async fn submit(&self, message: &[u8]) -> HubResult<SubmissionOutcome>;
}
