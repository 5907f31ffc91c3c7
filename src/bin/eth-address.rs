use std::process::ExitCode;

use clap::Parser;

use unregd_claim::chain::{derive_address, format_address, Wallet};

#[derive(Parser)]
#[command(name = "eth-address")]
#[command(about = "Print the Ethereum address of a private key", long_about = None)]
struct Cli {
    /// Private key (hex or WIF); `-` reads stdin, default ETH_PRIVATE_KEY
    key: Option<String>,
}

fn main() -> ExitCode {
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

    match Wallet::from_arg(cli.key.as_deref()) {
        Ok(wallet) => {
            println!("{}", format_address(&derive_address(wallet.signing_key())));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
