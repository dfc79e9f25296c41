//! token-actions: create SPL token accounts from the command line
//!
//! ```text
//! token-actions fee
//! token-actions create --mint <MINT_ADDRESS>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use spl_token_actions::config::Config;
use spl_token_actions::wallet::WalletManager;
use spl_token_actions::{Action, SolanaRpc};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the lamports needed to create a token account
    Fee,

    /// Create and initialize a token account for a mint
    Create {
        /// Mint address (base58)
        #[arg(long)]
        mint: String,

        /// Fee payer keypair file, overriding the configured wallet
        #[arg(long, env = "TOKEN_ACTIONS_KEYPAIR")]
        keypair: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.json_logs)?;

    let config = load_config(&args.config)?;
    config.validate().context("Invalid configuration")?;
    info!(endpoint = %config.rpc.url, "Using RPC endpoint");

    let action = Action::new(Arc::new(SolanaRpc::from_config(&config)));

    match args.command {
        Command::Fee => {
            let lamports = action.get_creating_token_account_fee().await?;
            println!("{}", lamports);
        }
        Command::Create { mint, keypair } => {
            let keypair_path = keypair.unwrap_or_else(|| config.wallet.keypair_path.clone());
            let wallet = WalletManager::from_file(&keypair_path).context("Failed to load wallet")?;
            info!(payer = %wallet.pubkey(), "Loaded fee payer");

            let payer = wallet.fee_payer();
            let created = action.create_token_account(&mint, payer.as_ref()).await?;
            println!("signature: {}", created.signature);
            println!("account:   {}", created.new_account);
        }
    }

    Ok(())
}

/// Initialize logging subsystem
fn init_logging(verbose: bool, json: bool) -> Result<()> {
    let default_filter = if verbose {
        "spl_token_actions=debug,token_actions=debug,info"
    } else {
        "spl_token_actions=info,warn"
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    // stdout carries command output only
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    }

    Ok(())
}

/// Load configuration from file with fallback to defaults
fn load_config(path: &str) -> Result<Config> {
    if std::path::Path::new(path).exists() {
        Config::from_file_with_env(path)
            .with_context(|| format!("Failed to load config from {}", path))
    } else {
        warn!("Config file '{}' not found, using defaults", path);
        dotenvy::dotenv().ok();
        let mut config = Config::default();
        config.apply_env_overrides();
        Ok(config)
    }
}
