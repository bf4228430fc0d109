//! Delete one of the operator's posts.

use hubcast::message::MessageHash;

use super::context::{self, OPERATOR_USER};

/// Delete a post by its `0x`-prefixed hash.
pub async fn execute(
    hash: String,
    config: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let hash = MessageHash::from_hex(&hash)
        .ok_or_else(|| format!("'{hash}' is not a 0x-prefixed hex hash"))?;

    let (_config, ctx) = context::load(config)?;

    let delete_hash = ctx.pipeline.delete_post(OPERATOR_USER, &hash).await?;
    println!("✅ Deleted {hash} (delete message {delete_hash})");
    Ok(())
}
