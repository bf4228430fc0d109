//! Add or remove a reaction.

use hubcast::message::{MessageHash, ReactionKind};

use super::context::{self, OPERATOR_USER};

/// React to a post (`like` or `recast`), or remove a prior reaction.
pub async fn execute(
    kind: String,
    hash: String,
    remove: bool,
    config: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let kind: ReactionKind = kind.parse()?;
    let hash = MessageHash::from_hex(&hash)
        .ok_or_else(|| format!("'{hash}' is not a 0x-prefixed hex hash"))?;

    let (_config, ctx) = context::load(config)?;

    let result = if remove {
        ctx.pipeline
            .remove_reaction(OPERATOR_USER, &hash, kind)
            .await?
    } else {
        ctx.pipeline.add_reaction(OPERATOR_USER, &hash, kind).await?
    };

    let verb = if remove { "Removed" } else { "Added" };
    println!("✅ {verb} {kind:?} on {hash} ({result})");
    Ok(())
}
