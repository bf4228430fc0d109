//! Check hub connectivity and signer readiness.

use super::context;

/// Query the configured hub's info endpoint and report signer state.
pub async fn execute(config: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (config, ctx) = context::load(config)?;

    println!("📊 Hubcast Status");
    println!();
    println!("Hub:     {}", config.hub.url);
    println!("Network: {}", config.hub.network);

    match config.signer.account_id {
        Some(account_id) => println!("Signer:  approved for account {account_id}"),
        None => println!("Signer:  awaiting account approval (no account_id configured)"),
    }
    println!();

    match ctx.hub.info().await {
        Ok(info) => {
            println!("✅ Hub reachable");
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Err(e) => {
            println!("❌ Hub unreachable: {e}");
        }
    }

    Ok(())
}
