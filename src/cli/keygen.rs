//! Generate a delegated signer key.

use std::path::PathBuf;

use hubcast::identity::{write_key_file, DelegatedSigner, SecretSeed, SignerState};

use super::config::{default_config_path, default_key_path, HubcastConfig};

/// Generate a new signer key file and print the public key.
///
/// The printed public key is what the account registers with the network to
/// approve this signer. Once approved, set `signer.account_id` in the
/// config file.
pub fn execute(out: Option<String>, force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let key_path = out.map(PathBuf::from).unwrap_or_else(default_key_path);

    if key_path.exists() && !force {
        return Err(format!(
            "key file '{}' already exists (use --force to overwrite)",
            key_path.display()
        )
        .into());
    }

    let seed = SecretSeed::generate();
    write_key_file(&key_path, &seed)?;

    let signer = DelegatedSigner::new(None, SignerState::Pending, seed);
    let public_key = hex::encode(signer.public_key().to_bytes());

    println!("🔑 Generated signer key: {}", key_path.display());
    println!();
    println!("Public key: 0x{public_key}");
    println!();
    println!("Register this public key with your account to approve the signer,");
    println!("then set signer.account_id in the config file.");

    // First run: drop a default config next to the key so the other
    // commands work out of the box.
    let config_path = default_config_path();
    if !config_path.exists() {
        HubcastConfig::create_default(&config_path, &key_path)?;
        println!();
        println!("📝 Created default config: {}", config_path.display());
    }

    Ok(())
}
