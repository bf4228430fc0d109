//! Delegated signer credentials.
//!
//! A delegated signer is an Ed25519 keypair authorized to produce messages
//! on behalf of an account. The account registers the public key with the
//! network out of band; until that approval completes the signer has no
//! account ID and cannot be used.
//!
//! Security notes:
//! - Seed bytes are zeroized on drop
//! - Seeds never appear in `Debug` output or logs
//! - The pipeline only reads a signer for the duration of one action

use async_trait::async_trait;
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use std::path::Path;
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::hub::traits::{HubResult, SignerProvider};
use crate::message::AccountId;

/// Ed25519 seed length (32 bytes).
pub const SEED_LEN: usize = 32;

/// Errors loading or storing signer key material.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// Key file I/O failed.
    #[error("key file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// Key file contents are not a 64-character hex seed.
    #[error("malformed key file: {0}")]
    MalformedKey(String),
}

/// Approval state of a delegated signer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignerState {
    /// Key generated, account approval not yet completed.
    Pending,
    /// Approved by the account; messages may be signed.
    Approved,
}

/// Ed25519 seed, zeroized on drop and redacted from Debug output.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretSeed([u8; SEED_LEN]);

impl SecretSeed {
    /// Wrap raw seed bytes.
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    /// Generate a fresh seed from the OS random number generator.
    pub fn generate() -> Self {
        let mut bytes = [0u8; SEED_LEN];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Debug for SecretSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretSeed(..)")
    }
}

/// A delegated signing credential.
#[derive(Debug, Clone)]
pub struct DelegatedSigner {
    /// Assigned account ID; absent until approval completes.
    pub account_id: Option<AccountId>,
    /// Approval state.
    pub state: SignerState,
    seed: SecretSeed,
}

impl DelegatedSigner {
    /// Build a credential from its parts.
    pub fn new(account_id: Option<AccountId>, state: SignerState, seed: SecretSeed) -> Self {
        Self {
            account_id,
            state,
            seed,
        }
    }

    /// Derive the signing key from the seed.
    pub fn signing_key(&self) -> SigningKey {
        SigningKey::from_bytes(&self.seed.0)
    }

    /// Public half of the delegated keypair.
    pub fn public_key(&self) -> VerifyingKey {
        self.signing_key().verifying_key()
    }
}

/// Write a seed to a key file as 64 hex characters.
///
/// On Unix the file is created with owner-only permissions.
pub fn write_key_file(path: &Path, seed: &SecretSeed) -> Result<(), IdentityError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut encoded = hex::encode(seed.0);
    encoded.push('\n');
    std::fs::write(path, &encoded)?;
    encoded.zeroize();

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

/// Load a seed from a key file written by [`write_key_file`].
pub fn load_key_file(path: &Path) -> Result<SecretSeed, IdentityError> {
    let mut contents = std::fs::read_to_string(path)?;
    let trimmed = contents.trim();

    let decoded = hex::decode(trimmed)
        .map_err(|e| IdentityError::MalformedKey(format!("not hex: {e}")))?;
    let bytes: [u8; SEED_LEN] = decoded.as_slice().try_into().map_err(|_| {
        IdentityError::MalformedKey(format!(
            "expected {SEED_LEN} bytes, got {}",
            decoded.len()
        ))
    })?;
    contents.zeroize();

    Ok(SecretSeed::from_bytes(bytes))
}

/// Signer provider backed by a single key file.
///
/// Serves exactly one user (the local operator). Multi-user deployments
/// implement [`SignerProvider`] against their own key custody instead.
pub struct FileSignerProvider {
    user_id: String,
    signer: DelegatedSigner,
}

impl FileSignerProvider {
    /// Load the operator's signer from a key file.
    ///
    /// The account ID comes from configuration; if it is absent the signer
    /// is treated as pending approval.
    pub fn load(
        user_id: &str,
        key_file: &Path,
        account_id: Option<AccountId>,
    ) -> Result<Self, IdentityError> {
        let seed = load_key_file(key_file)?;
        let state = if account_id.is_some() {
            SignerState::Approved
        } else {
            SignerState::Pending
        };
        Ok(Self {
            user_id: user_id.to_string(),
            signer: DelegatedSigner::new(account_id, state, seed),
        })
    }
}

#[async_trait]
impl SignerProvider for FileSignerProvider {
    async fn signer_for(&self, user_id: &str) -> HubResult<Option<DelegatedSigner>> {
        if user_id == self.user_id {
            Ok(Some(self.signer.clone()))
        } else {
            Ok(None)
        }
    }
}
