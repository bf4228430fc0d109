//! HTTP hub client.
//!
//! Implements the lookup and submission traits against a hub's REST API:
//!
//! - `GET  /v1/userNameProofByName?name={handle}`
//! - `GET  /v1/channelByName?name={tag}`
//! - `GET  /v1/castById?hash={0xhash}`
//! - `POST /v1/submitMessage` (CBOR envelope bytes)
//!
//! Lookup misses arrive as 404 and map to `Ok(None)`. A 4xx on submission
//! is a hub *rejection* (carried in `SubmissionOutcome::Rejected`, reason
//! verbatim); anything else non-2xx is a transport error.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::traits::{
    CastLookup, ChannelLookup, HubError, HubResult, NameLookup, RelayClient, SubmissionOutcome,
};
use crate::message::{AccountId, MessageHash};

/// REST client for a single hub.
pub struct HttpHub {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct NameProofResponse {
    fid: u64,
}

#[derive(Debug, Deserialize)]
struct ChannelResponse {
    url: String,
}

#[derive(Debug, Deserialize)]
struct CastResponse {
    fid: u64,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    hash: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    message: String,
}

impl HttpHub {
    /// Create a client for the hub at `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Fetch the hub's info document (used by `hubcast status`).
    pub async fn info(&self) -> HubResult<serde_json::Value> {
        let url = format!("{}/v1/info", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HubError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(HubError::Transport(format!(
                "hub info returned {}",
                response.status()
            )));
        }
        response
            .json()
            .await
            .map_err(|e| HubError::Protocol(e.to_string()))
    }

    /// GET a lookup endpoint, mapping 404 to `None` and decoding 200 as `T`.
    async fn lookup<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> HubResult<Option<T>> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| HubError::Transport(e.to_string()))?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => response
                .json::<T>()
                .await
                .map(Some)
                .map_err(|e| HubError::Protocol(e.to_string())),
            status => Err(HubError::Transport(format!(
                "{path} returned {status}"
            ))),
        }
    }
}

#[async_trait]
impl NameLookup for HttpHub {
    async fn resolve_name(&self, handle: &str) -> HubResult<Option<AccountId>> {
        let proof: Option<NameProofResponse> = self
            .lookup("/v1/userNameProofByName", &[("name", handle)])
            .await?;
        debug!(handle = %handle, resolved = proof.is_some(), "name lookup");
        Ok(proof.map(|p| AccountId(p.fid)))
    }
}

#[async_trait]
impl ChannelLookup for HttpHub {
    async fn resolve_channel(&self, tag: &str) -> HubResult<Option<String>> {
        let channel: Option<ChannelResponse> =
            self.lookup("/v1/channelByName", &[("name", tag)]).await?;
        debug!(tag = %tag, resolved = channel.is_some(), "channel lookup");
        Ok(channel.map(|c| c.url))
    }
}

#[async_trait]
impl CastLookup for HttpHub {
    async fn cast_author(&self, hash: &MessageHash) -> HubResult<Option<AccountId>> {
        let hex = hash.to_hex();
        let cast: Option<CastResponse> =
            self.lookup("/v1/castById", &[("hash", hex.as_str())]).await?;
        Ok(cast.map(|c| AccountId(c.fid)))
    }
}

#[async_trait]
impl RelayClient for HttpHub {
    async fn submit(&self, message: &[u8]) -> HubResult<SubmissionOutcome> {
        let url = format!("{}/v1/submitMessage", self.base_url);
        let response = self
            .client
            .post(&url)
            .header("content-type", "application/octet-stream")
            .body(message.to_vec())
            .send()
            .await
            .map_err(|e| HubError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            let accepted: SubmitResponse = response
                .json()
                .await
                .map_err(|e| HubError::Protocol(e.to_string()))?;
            let hash = MessageHash::from_hex(&accepted.hash).ok_or_else(|| {
                HubError::Protocol(format!("hub echoed unparseable hash '{}'", accepted.hash))
            })?;
            return Ok(SubmissionOutcome::Accepted { hash });
        }

        if status.is_client_error() {
            // The hub refused the message; pass its reason through verbatim.
            let reason = match response.json::<ErrorResponse>().await {
                Ok(body) => body.message,
                Err(_) => format!("hub rejected message with status {status}"),
            };
            return Ok(SubmissionOutcome::Rejected { reason });
        }

        Err(HubError::Transport(format!(
            "submitMessage returned {status}"
        )))
    }
}
