//! Action pipeline: user intent to submitted protocol message.
//!
//! One orchestration shape serves all six operations:
//!
//! 1. Fetch the acting user's delegated signer (must be approved)
//! 2. Resolve references (mentions, channel tags, reply/reaction targets)
//! 3. Compose the kind-specific body
//! 4. Sign (canonical CBOR, BLAKE3-20 content address, Ed25519)
//! 5. Submit to the hub, single attempt
//!
//! Only step 3 varies by kind; everything funnels through one submit path.
//! Collaborators are constructor-injected trait objects — there are no
//! ambient clients, and two pipelines with different hubs coexist freely.
//!
//! Known gap, intentionally not fixed here: no idempotency key accompanies
//! a submission, so a caller-side retry after a transport timeout can
//! produce a duplicate message.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{debug, info};

use crate::hub::traits::{
    CastLookup, ChannelLookup, HubError, NameLookup, RelayClient, SignerProvider,
    SubmissionOutcome,
};
use crate::identity::SignerState;
use crate::message::compose::{self, ComposeError};
use crate::message::encode::EncodeError;
use crate::message::sign::sign_message;
use crate::message::{
    AccountId, CastId, LinkKind, MessageBody, MessageData, MessageHash, Network, ReactionKind,
    PROTOCOL_EPOCH_UNIX,
};
use crate::resolve;

/// Pipeline failures, surfaced to callers with human-readable messages.
#[derive(Debug, Error)]
pub enum ActionError {
    /// No signer is registered for the user.
    #[error("no signer registered for user '{0}'")]
    SignerNotFound(String),

    /// The user's signer exists but approval has not completed.
    #[error("signer for user '{0}' is awaiting account approval")]
    SignerNotReady(String),

    /// A reaction or reply target hash is unknown to the hub.
    #[error("target cast {0} is not known to the hub")]
    TargetNotFound(MessageHash),

    /// Invalid field combination during composition.
    #[error("message composition failed: {0}")]
    Compose(#[from] ComposeError),

    /// Protocol-level encoding violation.
    #[error("message encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// The hub refused the signed message.
    #[error("hub rejected message: {0}")]
    Rejected(String),

    /// A collaborator call failed at the transport level.
    #[error("hub request failed: {0}")]
    Hub(#[from] HubError),
}

/// The action submission pipeline.
///
/// Holds no mutable state; concurrent actions are independent and may land
/// on the hub in either order.
pub struct ActionPipeline {
    signers: Arc<dyn SignerProvider>,
    names: Arc<dyn NameLookup>,
    channels: Arc<dyn ChannelLookup>,
    casts: Arc<dyn CastLookup>,
    relay: Arc<dyn RelayClient>,
    network: Network,
}

impl ActionPipeline {
    /// Build a pipeline from its collaborators.
    pub fn new(
        signers: Arc<dyn SignerProvider>,
        names: Arc<dyn NameLookup>,
        channels: Arc<dyn ChannelLookup>,
        casts: Arc<dyn CastLookup>,
        relay: Arc<dyn RelayClient>,
        network: Network,
    ) -> Self {
        Self {
            signers,
            names,
            channels,
            casts,
            relay,
            network,
        }
    }

    /// Publish a new post.
    ///
    /// Mentions and the channel tag are resolved from `text`; `reply_uri`
    /// (a `hubcast://cast/...` URI) takes precedence as the parent. A
    /// malformed reply URI is treated as absent, not as an error.
    pub async fn create_post(
        &self,
        user_id: &str,
        text: &str,
        channel_url: Option<&str>,
        reply_uri: Option<&str>,
    ) -> Result<String, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;

        let reply_to = reply_uri.and_then(resolve::parse_cast_uri);
        let (resolved, channel) = match (&reply_to, channel_url) {
            // Explicit channel always reaches the composer; it rejects the
            // reply+channel combination itself.
            (_, Some(url)) => (
                resolve::resolve_mentions(self.names.as_ref(), text).await?,
                Some(url.to_string()),
            ),
            (Some(_), None) => (
                resolve::resolve_mentions(self.names.as_ref(), text).await?,
                None,
            ),
            // No explicit parent: mention and channel-tag lookups fan out
            // together.
            (None, None) => tokio::try_join!(
                resolve::resolve_mentions(self.names.as_ref(), text),
                resolve::resolve_channel_tag(self.channels.as_ref(), text),
            )?,
        };

        let body = compose::cast_add(resolved.text, resolved.mentions, reply_to, channel, vec![])?;
        let hash = self.sign_and_submit(account_id, &key, body).await?;
        Ok(hash.to_hex())
    }

    /// Delete one of the user's posts.
    pub async fn delete_post(
        &self,
        user_id: &str,
        hash: &MessageHash,
    ) -> Result<String, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;
        let body = compose::cast_remove(hash.clone());
        let hash = self.sign_and_submit(account_id, &key, body).await?;
        Ok(hash.to_hex())
    }

    /// React to a post. The target's author is resolved before any signing.
    pub async fn add_reaction(
        &self,
        user_id: &str,
        hash: &MessageHash,
        kind: ReactionKind,
    ) -> Result<String, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;
        let target = self.reaction_target(hash).await?;
        let body = compose::reaction_add(kind, target);
        let hash = self.sign_and_submit(account_id, &key, body).await?;
        Ok(hash.to_hex())
    }

    /// Remove a reaction from a post.
    pub async fn remove_reaction(
        &self,
        user_id: &str,
        hash: &MessageHash,
        kind: ReactionKind,
    ) -> Result<String, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;
        let target = self.reaction_target(hash).await?;
        let body = compose::reaction_remove(kind, target);
        let hash = self.sign_and_submit(account_id, &key, body).await?;
        Ok(hash.to_hex())
    }

    /// Follow an account.
    pub async fn follow(
        &self,
        user_id: &str,
        target: AccountId,
    ) -> Result<AccountId, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;
        let body = compose::link_add(LinkKind::Follow, target);
        self.sign_and_submit(account_id, &key, body).await?;
        Ok(target)
    }

    /// Unfollow an account.
    pub async fn unfollow(
        &self,
        user_id: &str,
        target: AccountId,
    ) -> Result<AccountId, ActionError> {
        let (account_id, key) = self.approved_signer(user_id).await?;
        let body = compose::link_remove(LinkKind::Follow, target);
        self.sign_and_submit(account_id, &key, body).await?;
        Ok(target)
    }

    /// Fetch the user's signer and require it to be approved.
    async fn approved_signer(
        &self,
        user_id: &str,
    ) -> Result<(AccountId, ed25519_dalek::SigningKey), ActionError> {
        let signer = self
            .signers
            .signer_for(user_id)
            .await?
            .ok_or_else(|| ActionError::SignerNotFound(user_id.to_string()))?;

        if signer.state != SignerState::Approved {
            return Err(ActionError::SignerNotReady(user_id.to_string()));
        }
        let account_id = signer
            .account_id
            .ok_or_else(|| ActionError::SignerNotReady(user_id.to_string()))?;

        Ok((account_id, signer.signing_key()))
    }

    /// Resolve a reaction target hash to a full cast ID.
    ///
    /// A miss is `TargetNotFound` — a reaction with no target is
    /// meaningless, so this is deliberately stricter than mention handling.
    async fn reaction_target(&self, hash: &MessageHash) -> Result<CastId, ActionError> {
        let author = self
            .casts
            .cast_author(hash)
            .await?
            .ok_or_else(|| ActionError::TargetNotFound(hash.clone()))?;
        Ok(CastId {
            account_id: author,
            hash: hash.clone(),
        })
    }

    /// Sign a composed body and submit it. The shared tail of every action.
    async fn sign_and_submit(
        &self,
        account_id: AccountId,
        key: &ed25519_dalek::SigningKey,
        body: MessageBody,
    ) -> Result<MessageHash, ActionError> {
        let data = MessageData {
            body,
            account_id,
            timestamp: protocol_timestamp(),
            network: self.network,
        };

        let signed = sign_message(data, key)?;
        let bytes = signed.to_bytes()?;
        debug!(
            account = %account_id,
            hash = %signed.hash,
            bytes = bytes.len(),
            "submitting signed message"
        );

        match self.relay.submit(&bytes).await? {
            SubmissionOutcome::Accepted { hash } => {
                // The hub's echo is the source of truth for "known to the
                // network", even though the hash is derivable locally.
                info!(account = %account_id, hash = %hash, "hub accepted message");
                Ok(hash)
            }
            SubmissionOutcome::Rejected { reason } => Err(ActionError::Rejected(reason)),
        }
    }
}

/// Seconds since the protocol epoch, taken once per action.
fn protocol_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
        .saturating_sub(PROTOCOL_EPOCH_UNIX)
}
