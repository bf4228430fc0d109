//! Publish a post.

use super::context::{self, OPERATOR_USER};

/// Publish a post to the configured hub.
///
/// `@handles` in the text become mentions and `/channel` tags are resolved
/// automatically; `--channel` and `--reply` set the parent explicitly (at
/// most one of the two).
pub async fn execute(
    text: String,
    channel: Option<String>,
    reply: Option<String>,
    config: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, ctx) = context::load(config)?;

    let hash = ctx
        .pipeline
        .create_post(OPERATOR_USER, &text, channel.as_deref(), reply.as_deref())
        .await?;

    println!("✅ Posted: {hash}");
    Ok(())
}
