//! Mock hub for testing.
//!
//! Implements every collaborator trait against in-memory maps, with setup
//! helpers for seeding names, channels, casts, and signers, plus knobs for
//! forcing the next submission to be rejected.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::traits::{
    CastLookup, ChannelLookup, HubResult, NameLookup, RelayClient, SignerProvider,
    SubmissionOutcome,
};
use crate::identity::DelegatedSigner;
use crate::message::sign::SignedMessage;
use crate::message::{AccountId, MessageHash};

/// Mock hub backed by in-memory state.
#[derive(Clone, Default)]
pub struct MockHub {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    signers: HashMap<String, DelegatedSigner>,
    names: HashMap<String, AccountId>,
    channels: HashMap<String, String>,
    casts: HashMap<MessageHash, AccountId>,
    submitted: Vec<Vec<u8>>,
    reject_reason: Option<String>,
}

impl MockHub {
    /// Create an empty mock hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a signer for a user (test setup).
    pub fn put_signer(&self, user_id: &str, signer: DelegatedSigner) {
        let mut s = self.state.lock().unwrap();
        s.signers.insert(user_id.to_string(), signer);
    }

    /// Register a username proof (test setup).
    pub fn put_name(&self, handle: &str, account_id: AccountId) {
        let mut s = self.state.lock().unwrap();
        s.names.insert(handle.to_string(), account_id);
    }

    /// Register a channel tag (test setup).
    pub fn put_channel(&self, tag: &str, url: &str) {
        let mut s = self.state.lock().unwrap();
        s.channels.insert(tag.to_string(), url.to_string());
    }

    /// Register a known cast and its author (test setup).
    pub fn put_cast(&self, hash: MessageHash, author: AccountId) {
        let mut s = self.state.lock().unwrap();
        s.casts.insert(hash, author);
    }

    /// Make the next submission fail with the given reason.
    pub fn reject_next(&self, reason: &str) {
        let mut s = self.state.lock().unwrap();
        s.reject_reason = Some(reason.to_string());
    }

    /// Envelopes submitted so far, in order.
    pub fn submitted(&self) -> Vec<Vec<u8>> {
        let s = self.state.lock().unwrap();
        s.submitted.clone()
    }
}

#[async_trait]
impl SignerProvider for MockHub {
    async fn signer_for(&self, user_id: &str) -> HubResult<Option<DelegatedSigner>> {
        let s = self.state.lock().unwrap();
        Ok(s.signers.get(user_id).cloned())
    }
}

#[async_trait]
impl NameLookup for MockHub {
    async fn resolve_name(&self, handle: &str) -> HubResult<Option<AccountId>> {
        let s = self.state.lock().unwrap();
        Ok(s.names.get(handle).copied())
    }
}

#[async_trait]
impl ChannelLookup for MockHub {
    async fn resolve_channel(&self, tag: &str) -> HubResult<Option<String>> {
        let s = self.state.lock().unwrap();
        Ok(s.channels.get(tag).cloned())
    }
}

#[async_trait]
impl CastLookup for MockHub {
    async fn cast_author(&self, hash: &MessageHash) -> HubResult<Option<AccountId>> {
        let s = self.state.lock().unwrap();
        Ok(s.casts.get(hash).copied())
    }
}

#[async_trait]
impl RelayClient for MockHub {
    async fn submit(&self, message: &[u8]) -> HubResult<SubmissionOutcome> {
        let mut s = self.state.lock().unwrap();

        if let Some(reason) = s.reject_reason.take() {
            return Ok(SubmissionOutcome::Rejected { reason });
        }

        // Echo the canonical hash the way a real hub does.
        let hash = match SignedMessage::from_bytes(message) {
            Ok(decoded) => decoded.hash,
            Err(e) => {
                return Ok(SubmissionOutcome::Rejected {
                    reason: format!("undecodable envelope: {e}"),
                })
            }
        };

        s.submitted.push(message.to_vec());
        Ok(SubmissionOutcome::Accepted { hash })
    }
}
