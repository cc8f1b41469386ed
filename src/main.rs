//! Multisig Wallet CLI Application
//!
//! A command-line interface for building m-of-n multisig wallets.

use clap::{Parser, Subcommand};
use multisig_wallet::cli;
use multisig_wallet::network::Network;

#[derive(Parser)]
#[command(name = "multisig-wallet")]
#[command(author = "Darshan")]
#[command(version = "0.1.0")]
#[command(about = "BIP-48 m-of-n multisig wallet builder", long_about = None)]
struct Cli {
    /// Network to encode addresses for (mainnet or testnet)
    #[arg(long, global = true, default_value = "testnet")]
    network: Network,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new multisig wallet
    Generate {
        /// Required signatures (M)
        #[arg(short = 'm', long, allow_negative_numbers = true)]
        threshold: i32,

        /// Number of participants (N)
        #[arg(short = 'n', long, allow_negative_numbers = true)]
        participants: i32,

        /// Include every participant's mnemonic in the output
        #[arg(long)]
        show_mnemonics: bool,
    },

    /// Decode a redeem script and recompute its addresses
    Inspect {
        /// Redeem script as hex
        #[arg(short, long)]
        script: String,
    },

    /// Generate a single-key P2PKH address
    Address,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            threshold,
            participants,
            show_mnemonics,
        } => cli::cmd_generate(threshold, participants, cli.network, cli.json, show_mnemonics)?,
        Commands::Inspect { script } => cli::cmd_inspect(&script, cli.network, cli.json)?,
        Commands::Address => cli::cmd_address(cli.network)?,
    }

    Ok(())
}
