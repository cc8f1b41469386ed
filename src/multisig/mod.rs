//! Multi-signature wallet construction
//!
//! Builds M-of-N wallets where any M of the N participants' keys can
//! authorize a spend.
//!
//! # Example
//!
//! ```no_run
//! use multisig_wallet::multisig::{MultisigWallet, WalletOptions};
//!
//! // Create a 2-of-3 testnet wallet and generate its keys
//! let wallet = MultisigWallet::new(2, 3, WalletOptions::default())?;
//! wallet.generate_wallet()?;
//!
//! let addresses = wallet.addresses()?;
//! println!("P2SH:  {}", addresses.p2sh);
//! println!("P2WSH: {}", addresses.p2wsh);
//! # Ok::<(), multisig_wallet::multisig::MultisigError>(())
//! ```

pub mod config;
pub mod summary;
pub mod wallet;

pub use config::{ThresholdConfig, WalletOptions};
pub use summary::{CosignerSummary, WalletSummary};
pub use wallet::{GeneratedWallet, MultisigError, MultisigWallet, WalletState};
