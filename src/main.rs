//! unregd-claim
//!
//! Claims a pre-allocated EOS account by signing a message with the
//! Ethereum key the allocation was recorded against.
//!
//! # Flow
//!
//! ```text
//!   node /v1/chain/get_info
//!         │  last_irreversible_block_id
//!         ▼
//!   TAPOS (ref_block_num, ref_block_prefix)
//!         │
//!         ▼
//!   claim message ──▶ digest (plain | eth-personal) ──▶ canonical ECDSA signature
//!         │
//!         ▼
//!   push: cleos push action eosio.unregd regaccount <data> -p <actor>
//!   sign: abi_json_to_bin → transaction file → cleos sign -p -k <key> <file>
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};

use unregd_claim::chain::{NodeClient, Wallet};
use unregd_claim::config::{self, validation::validate_config, ClaimConfig, ConfigError};
use unregd_claim::dispatch::{CleosDispatcher, DispatchError, SIGNING_KEY_ENV_VAR};
use unregd_claim::observability;
use unregd_claim::signing::{MessageSigner, SigningScheme};
use unregd_claim::{ClaimRequest, ClaimResult, ClaimService};

#[derive(Parser)]
#[command(name = "unregd-claim", version)]
#[command(about = "Claim a pre-allocated EOS account with an Ethereum key", long_about = None)]
struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Node endpoint (overrides API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Message hashing scheme
    #[arg(long, value_enum, global = true)]
    scheme: Option<SigningScheme>,

    /// Maximum attempts to obtain a canonical signature
    #[arg(long, global = true)]
    max_attempts: Option<u32>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the claim transaction, sign it with cleos and print the file path
    Sign(ClaimCli),
    /// Push the claim action directly with cleos
    Push(ClaimCli),
}

#[derive(Args)]
struct ClaimCli {
    /// Desired EOS account name
    account: String,

    /// EOS public key for the new account
    eos_pubkey: String,

    /// Pushing actor, as `actor` or `actor@permission`
    #[arg(long)]
    actor: String,

    /// Ethereum private key (hex or WIF); `-` reads stdin, default ETH_PRIVATE_KEY
    #[arg(long)]
    eth_key: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli).await {
        Ok(output) => {
            println!("{}", output.trim_end());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> ClaimResult<String> {
    let config = resolve_config(&cli)?;
    observability::init_logging(&config.observability.log_level);

    tracing::info!(
        node_url = %config.node.url,
        scheme = ?config.signing.scheme,
        contract = %config.transaction.contract,
        "unregd-claim v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    let (args, sign_mode) = match &cli.command {
        Commands::Sign(args) => (args, true),
        Commands::Push(args) => (args, false),
    };

    let request = ClaimRequest::new(
        &args.account,
        &args.eos_pubkey,
        &args.actor,
        &config.transaction.permission,
    )?;

    let mut dispatcher = CleosDispatcher::new(&config.cleos.binary, &config.node.url);
    if sign_mode {
        dispatcher = dispatcher.with_signing_key_from_env();
        if !dispatcher.has_signing_key() {
            return Err(DispatchError::MissingSigningKey(SIGNING_KEY_ENV_VAR).into());
        }
    }

    let wallet = Wallet::from_arg(args.eth_key.as_deref())?;
    let signer = MessageSigner::new(wallet, &config.signing);
    let client = NodeClient::new(&config.node)?;
    let service = ClaimService::new(client, signer, Arc::new(dispatcher), config.transaction);

    if sign_mode {
        let path = service.sign_transaction(&request).await?;
        Ok(path.display().to_string())
    } else {
        service.push(&request).await
    }
}

/// Defaults < config file < API_URL < command-line flags.
fn resolve_config(cli: &Cli) -> Result<ClaimConfig, ConfigError> {
    let mut config = config::load(cli.config.as_deref())?;

    if let Some(url) = &cli.api_url {
        config.node.url = url.trim_end_matches('/').to_string();
    }
    if let Some(scheme) = cli.scheme {
        config.signing.scheme = scheme;
    }
    if let Some(max_attempts) = cli.max_attempts {
        config.signing.max_attempts = max_attempts;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
