//! Multisig Wallet: BIP-48 m-of-n multisig wallet construction in Rust
//!
//! This crate provides:
//! - 24-word BIP-39 mnemonics from an injectable entropy source
//! - BIP-48 key derivation at `m/48'/0'/0'/2'/<participant>`
//! - Canonical (sorted-key) m-of-n redeem scripts
//! - P2SH and P2WSH address encoding for mainnet and testnet
//! - Single-key P2PKH address generation
//!
//! # Example
//!
//! ```rust
//! use multisig_wallet::multisig::{MultisigWallet, WalletOptions};
//!
//! // Create a 2-of-3 testnet wallet
//! let wallet = MultisigWallet::new(2, 3, WalletOptions::default()).unwrap();
//! wallet.generate_wallet().unwrap();
//!
//! let addresses = wallet.addresses().unwrap();
//! assert!(addresses.p2sh.starts_with('2'));
//! assert!(addresses.p2wsh.starts_with("tb1"));
//!
//! // Each participant keeps their own mnemonic and path
//! for (mnemonic, path) in wallet
//!     .mnemonics()
//!     .unwrap()
//!     .iter()
//!     .zip(wallet.derivation_paths().unwrap())
//! {
//!     println!("{}: {}", path, mnemonic);
//! }
//! ```

pub mod address;
pub mod cli;
pub mod crypto;
pub mod multisig;
pub mod network;
pub mod script;

// Re-export commonly used types
pub use address::{EncodingError, WalletAddresses};
pub use crypto::{
    create_bitcoin_address, DerivationError, EntropyError, EntropySource, KeyPair,
    ParticipantKey,
};
pub use multisig::{
    MultisigError, MultisigWallet, ThresholdConfig, WalletOptions, WalletState, WalletSummary,
};
pub use network::Network;
pub use script::{RedeemScript, ScriptError};
