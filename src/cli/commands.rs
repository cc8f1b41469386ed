//! CLI commands for the multisig wallet builder
//!
//! Implements all command handlers for the CLI interface.

use serde::Serialize;

use crate::address::WalletAddresses;
use crate::crypto::KeyPair;
use crate::multisig::{MultisigWallet, WalletOptions, WalletSummary};
use crate::network::Network;
use crate::script::RedeemScript;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Decoded view of an existing redeem script
#[derive(Debug, Clone, Serialize)]
pub struct ScriptReport {
    pub network: Network,
    pub description: String,
    pub threshold: u8,
    pub participants: usize,
    pub sorted_keys: bool,
    pub public_keys: Vec<String>,
    pub asm: String,
    pub addresses: WalletAddresses,
}

/// Generate a new multisig wallet
pub fn cmd_generate(
    threshold: i32,
    participants: i32,
    network: Network,
    json: bool,
    show_mnemonics: bool,
) -> CliResult<()> {
    let wallet = MultisigWallet::new(threshold, participants, WalletOptions::with_network(network))?;
    wallet.generate_wallet()?;
    let summary = wallet.summary(show_mnemonics)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &WalletSummary) {
    println!(
        "🔐 {} multisig wallet created on {}",
        summary.description, summary.network
    );
    println!("   📍 P2SH:  {}", summary.addresses.p2sh);
    println!("   📍 P2WSH: {}", summary.addresses.p2wsh);
    println!("   📜 Redeem script: {}", summary.redeem_script);

    println!("\n   Cosigners:");
    for cosigner in &summary.cosigners {
        println!(
            "   ├─ #{} {} {}",
            cosigner.index, cosigner.derivation_path, cosigner.public_key
        );
        if let Some(mnemonic) = &cosigner.mnemonic {
            println!("   │    {}", mnemonic);
        }
    }

    if summary.cosigners.iter().any(|c| c.mnemonic.is_some()) {
        println!("\n   ⚠️  IMPORTANT: The mnemonics above control the wallet's funds.");
        println!("   Hand each one to its cosigner and keep it offline!");
    } else {
        println!("\n   Mnemonics hidden. Re-run with --show-mnemonics to reveal them.");
    }
}

/// Decode a redeem script and recompute its addresses
pub fn inspect_script(script_hex: &str, network: Network) -> CliResult<ScriptReport> {
    let bytes = hex::decode(script_hex.trim())?;
    let script = RedeemScript::parse(&bytes)?;
    let addresses = WalletAddresses::from_script(script.as_bytes(), network)?;

    Ok(ScriptReport {
        network,
        description: script.description(),
        threshold: script.threshold(),
        participants: script.key_count(),
        sorted_keys: script.has_sorted_keys(),
        public_keys: script
            .public_keys()
            .iter()
            .map(|key| hex::encode(key.serialize()))
            .collect(),
        asm: script.asm(),
        addresses,
    })
}

/// Inspect an existing redeem script
pub fn cmd_inspect(script_hex: &str, network: Network, json: bool) -> CliResult<()> {
    let report = inspect_script(script_hex, network)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("📜 {} multisig script on {}", report.description, report.network);
    println!("   {}", report.asm);
    println!("   📍 P2SH:  {}", report.addresses.p2sh);
    println!("   📍 P2WSH: {}", report.addresses.p2wsh);
    if !report.sorted_keys {
        println!("\n   ⚠️  Keys are not in sorted order; other wallets may derive a different script.");
    }

    Ok(())
}

/// Generate a single-key P2PKH address
pub fn cmd_address(network: Network) -> CliResult<()> {
    let key_pair = KeyPair::generate();

    println!("🔑 New key pair on {}", network);
    println!("   📍 Address: {}", key_pair.address(network)?);
    println!("   🔑 Public Key: {}", key_pair.public_key_hex());
    println!("   🗝️  Private Key: {}", key_pair.private_key_hex());
    println!("\n   ⚠️  IMPORTANT: Store the private key securely, it is not saved anywhere.");

    Ok(())
}
