//! Human-readable reference resolution.
//!
//! Turns the references a user types — `@handles`, `/channel` tags, cast
//! URIs — into protocol identifiers:
//!
//! - Handles are scanned with a word-boundary rule, looked up concurrently
//!   (one lookup per distinct handle), stripped from the text, and emitted
//!   as byte-offset mentions. Offsets are byte offsets because multi-byte
//!   characters make char-index offsets incorrect.
//! - Unresolved handles are dropped silently: a mistyped handle must not
//!   fail the whole post. All matched tokens are stripped either way; only
//!   resolved ones become mentions.
//! - Cast URIs (`hubcast://cast/{account}/{0xhash}`) parse to a reply
//!   target; anything else yields no target and no error.

use futures::future;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::hub::traits::{ChannelLookup, HubResult, NameLookup};
use crate::message::{AccountId, CastId, MessageHash};

/// URI scheme for protocol references.
pub const CAST_URI_SCHEME: &str = "hubcast";

/// A resolved mention: handle, owning account, and the byte offset where
/// the reference belongs in the *stripped* text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mention {
    pub handle: String,
    pub account_id: AccountId,
    pub position: u32,
}

/// Output of mention resolution: text with handle tokens stripped, plus
/// the mentions that resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedText {
    pub text: String,
    pub mentions: Vec<Mention>,
}

/// A handle token found in raw text (byte range includes the `@`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandleToken {
    pub start: usize,
    pub end: usize,
    pub handle: String,
}

fn handle_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"@[A-Za-z0-9_][A-Za-z0-9_-]*").expect("valid regex"))
}

fn channel_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"/[a-z0-9][a-z0-9-]*").expect("valid regex"))
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Scan raw text for handle tokens.
///
/// A token is `@` followed by word characters, where the `@` is not itself
/// preceded by a word character (so `a@b.com` is not a mention).
pub fn scan_handles(text: &str) -> Vec<HandleToken> {
    handle_pattern()
        .find_iter(text)
        .filter(|m| m.start() == 0 || !is_word_byte(text.as_bytes()[m.start() - 1]))
        .map(|m| HandleToken {
            start: m.start(),
            end: m.end(),
            handle: m.as_str()[1..].to_string(),
        })
        .collect()
}

/// Resolve all handle tokens in `raw` and strip them from the text.
///
/// Lookups fan out concurrently, one per *distinct* handle; a miss on one
/// does not cancel the others. Transport errors do propagate — stripping
/// every mention because the hub was unreachable would corrupt intent.
pub async fn resolve_mentions(names: &dyn NameLookup, raw: &str) -> HubResult<ResolvedText> {
    let tokens = scan_handles(raw);

    let mut distinct: Vec<&str> = Vec::new();
    for token in &tokens {
        if !distinct.contains(&token.handle.as_str()) {
            distinct.push(&token.handle);
        }
    }

    let results = future::join_all(distinct.iter().map(|h| names.resolve_name(h))).await;

    let mut resolved = HashMap::new();
    for (handle, result) in distinct.iter().zip(results) {
        match result? {
            Some(account_id) => {
                resolved.insert(handle.to_string(), account_id);
            }
            None => {
                debug!(handle = %handle, "handle did not resolve, dropping");
            }
        }
    }

    Ok(strip_and_index(raw, &tokens, &resolved))
}

/// Strip handle tokens and compute mention offsets into the stripped text.
///
/// Tokens are removed right-to-left so each removal leaves the offsets of
/// still-unprocessed tokens to its left intact.
pub fn strip_and_index(
    raw: &str,
    tokens: &[HandleToken],
    resolved: &HashMap<String, AccountId>,
) -> ResolvedText {
    let mut text = raw.to_string();
    for token in tokens.iter().rev() {
        text.replace_range(token.start..token.end, "");
    }

    // A token's position in the stripped text is its original start minus
    // the bytes stripped to its left.
    let mut removed = 0usize;
    let mut mentions = Vec::new();
    for token in tokens {
        let position = (token.start - removed) as u32;
        removed += token.end - token.start;
        if let Some(&account_id) = resolved.get(&token.handle) {
            mentions.push(Mention {
                handle: token.handle.clone(),
                account_id,
                position,
            });
        }
    }

    ResolvedText { text, mentions }
}

/// Resolve the first `/channel` tag in `raw` to a channel URL.
///
/// Same drop-on-miss policy as handles. The tag text stays in place; only
/// handle tokens are ever stripped.
pub async fn resolve_channel_tag(
    channels: &dyn ChannelLookup,
    raw: &str,
) -> HubResult<Option<String>> {
    let Some(tag) = scan_channel_tag(raw) else {
        return Ok(None);
    };
    let url = channels.resolve_channel(&tag).await?;
    if url.is_none() {
        debug!(tag = %tag, "channel tag did not resolve, dropping");
    }
    Ok(url)
}

/// Find the first channel tag (`/name`) at a word boundary.
pub fn scan_channel_tag(text: &str) -> Option<String> {
    channel_pattern()
        .find_iter(text)
        .find(|m| {
            m.start() == 0 || text.as_bytes()[m.start() - 1].is_ascii_whitespace()
        })
        .map(|m| m.as_str()[1..].to_string())
}

/// Parse a cast URI of the form `hubcast://cast/{account_id}/{0xhash}`.
///
/// Anything else — bare channel URLs, malformed strings — yields `None`,
/// never an error; composition then proceeds without a reply target.
pub fn parse_cast_uri(uri: &str) -> Option<CastId> {
    let rest = uri.strip_prefix(CAST_URI_SCHEME)?.strip_prefix("://cast/")?;
    let (account, hash) = rest.split_once('/')?;
    let account_id = account.parse::<u64>().ok()?;
    let hash = MessageHash::from_hex(hash)?;
    Some(CastId {
        account_id: AccountId(account_id),
        hash,
    })
}

#[cfg(test)]
mod proptests;
