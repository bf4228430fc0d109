use clap::{Parser, Subcommand};

pub mod config;
pub mod context;
pub mod delete;
pub mod follow;
pub mod keygen;
pub mod post;
pub mod react;
pub mod status;
pub mod version;

#[derive(Parser)]
#[command(name = "hubcast")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Client CLI for hub-relayed social protocol actions", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate a delegated signer key and print its public key
    Keygen {
        /// Output path for the key file (default: ~/.config/hubcast/signer.key)
        #[arg(long)]
        out: Option<String>,

        /// Overwrite an existing key file
        #[arg(long)]
        force: bool,
    },

    /// Publish a post (@handles become mentions, /tags pick a channel)
    Post {
        /// Post text
        text: String,

        /// Channel URL to post into
        #[arg(long)]
        channel: Option<String>,

        /// Cast URI to reply to (hubcast://cast/{account}/{0xhash})
        #[arg(long)]
        reply: Option<String>,

        /// Path to config file (default: ~/.config/hubcast/config.toml)
        #[arg(long)]
        config: Option<String>,
    },

    /// Delete one of your posts by hash
    Delete {
        /// Hash of the post to delete (0x-prefixed hex)
        hash: String,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// React to a post (like or recast)
    React {
        /// Reaction kind: like or recast
        kind: String,

        /// Hash of the target post (0x-prefixed hex)
        hash: String,

        /// Remove the reaction instead of adding it
        #[arg(long)]
        remove: bool,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Follow an account
    Follow {
        /// Numeric account ID to follow
        account: u64,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Unfollow an account
    Unfollow {
        /// Numeric account ID to unfollow
        account: u64,

        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Check hub connectivity and signer readiness
    Status {
        /// Path to config file
        #[arg(long)]
        config: Option<String>,
    },

    /// Display version information
    Version,
}

pub async fn execute(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Keygen { out, force } => keygen::execute(out, force),
        Commands::Post {
            text,
            channel,
            reply,
            config,
        } => post::execute(text, channel, reply, config).await,
        Commands::Delete { hash, config } => delete::execute(hash, config).await,
        Commands::React {
            kind,
            hash,
            remove,
            config,
        } => react::execute(kind, hash, remove, config).await,
        Commands::Follow { account, config } => follow::execute(account, false, config).await,
        Commands::Unfollow { account, config } => follow::execute(account, true, config).await,
        Commands::Status { config } => status::execute(config).await,
        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}
