//! Message signing and envelope encoding.
//!
//! A signed message is content-addressed: the canonical CBOR payload is
//! hashed with BLAKE3 (truncated to 20 bytes) and the Ed25519 signature
//! covers that hash. Signing is deterministic — the same payload and key
//! always produce identical bytes, hash, and signature.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::encode::{self, EncodeError};
use super::{MessageData, MessageHash};

/// Signature verification errors.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// Envelope hash does not match the payload digest.
    #[error("envelope hash does not match payload digest")]
    HashMismatch,

    /// The Ed25519 signature check failed.
    #[error("signature verification failed: {0}")]
    BadSignature(String),

    /// The envelope bytes could not be decoded.
    #[error("malformed envelope: {0}")]
    Malformed(#[from] EncodeError),
}

/// A composed payload bound to a signer, ready for submission.
#[derive(Debug, Clone)]
pub struct SignedMessage {
    /// The decoded payload, kept for callers that inspect what was signed.
    pub data: MessageData,
    /// Canonical CBOR payload bytes (the hashed and signed content).
    pub payload: Vec<u8>,
    /// Content address: BLAKE3-20 of `payload`.
    pub hash: MessageHash,
    /// Ed25519 signature over the hash bytes.
    pub signature: Signature,
    /// Public key of the delegated signer.
    pub signer: VerifyingKey,
}

/// Wire form of a signed message: what actually travels to the hub.
#[derive(Debug, Serialize, Deserialize)]
struct Envelope {
    payload: Vec<u8>,
    hash: Vec<u8>,
    signature: Vec<u8>,
    signer: Vec<u8>,
}

/// Sign a composed payload with a delegated key.
///
/// Validates protocol limits (via the encoder), derives the content
/// address, and signs it. Fails only on encoding violations — there is no
/// I/O here.
pub fn sign_message(data: MessageData, key: &SigningKey) -> Result<SignedMessage, EncodeError> {
    let payload = encode::encode_payload(&data)?;
    let hash = MessageHash::digest(&payload);
    let signature = key.sign(hash.as_bytes());

    Ok(SignedMessage {
        data,
        payload,
        hash,
        signature,
        signer: key.verifying_key(),
    })
}

impl SignedMessage {
    /// Encode the submission envelope.
    pub fn to_bytes(&self) -> Result<Vec<u8>, EncodeError> {
        encode::to_cbor(&Envelope {
            payload: self.payload.clone(),
            hash: self.hash.as_bytes().to_vec(),
            signature: self.signature.to_bytes().to_vec(),
            signer: self.signer.to_bytes().to_vec(),
        })
    }

    /// Decode a submission envelope and re-derive its decoded payload.
    ///
    /// Structural decoding only; call [`verify`](Self::verify) to check the
    /// hash and signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodeError> {
        let envelope: Envelope = encode::from_cbor(bytes)?;

        let data: MessageData = encode::from_cbor(&envelope.payload)?;
        let signature = Signature::from_slice(&envelope.signature)
            .map_err(|e| EncodeError::Decode(format!("bad signature bytes: {e}")))?;
        let signer_bytes: [u8; 32] = envelope
            .signer
            .as_slice()
            .try_into()
            .map_err(|_| EncodeError::Decode("signer key must be 32 bytes".into()))?;
        let signer = VerifyingKey::from_bytes(&signer_bytes)
            .map_err(|e| EncodeError::Decode(format!("bad signer key: {e}")))?;

        Ok(Self {
            data,
            payload: envelope.payload,
            hash: MessageHash(envelope.hash),
            signature,
            signer,
        })
    }

    /// Verify content address and signature.
    pub fn verify(&self) -> Result<(), VerifyError> {
        if MessageHash::digest(&self.payload) != self.hash {
            return Err(VerifyError::HashMismatch);
        }
        self.signer
            .verify(self.hash.as_bytes(), &self.signature)
            .map_err(|e| VerifyError::BadSignature(e.to_string()))
    }
}
