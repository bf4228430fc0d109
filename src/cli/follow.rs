//! Follow or unfollow an account.

use hubcast::message::AccountId;

use super::context::{self, OPERATOR_USER};

/// Follow (or unfollow, with `remove`) an account by numeric ID.
pub async fn execute(
    account: u64,
    remove: bool,
    config: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let (_config, ctx) = context::load(config)?;

    let target = AccountId(account);
    if remove {
        ctx.pipeline.unfollow(OPERATOR_USER, target).await?;
        println!("✅ Unfollowed account {target}");
    } else {
        ctx.pipeline.follow(OPERATOR_USER, target).await?;
        println!("✅ Followed account {target}");
    }
    Ok(())
}
