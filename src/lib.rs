//! Hubcast - client pipeline for a hub-relayed social protocol
//!
//! Turns user-authored intents (post, delete, react, follow) into signed
//! protocol messages and submits them to a hub node.
//!
//! Key principles:
//! - One orchestration path for all action kinds (no duplicated pipelines)
//! - Collaborators behind traits, constructor-injected, mockable
//! - Content-addressed messages (BLAKE3-20 over canonical CBOR)
//! - Single-attempt submission; retry policy belongs to the caller

pub mod hub;
pub mod identity;
pub mod message;
pub mod pipeline;
pub mod resolve;
