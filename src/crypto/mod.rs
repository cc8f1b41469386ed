//! Cryptographic building blocks for multisig wallets
//!
//! This module provides:
//! - SHA-256 and HASH160 hashing
//! - Entropy sources and BIP-39 mnemonic generation
//! - BIP-48 participant key derivation
//! - Single-key (P2PKH) key pairs

pub mod derivation;
pub mod entropy;
pub mod hash;
pub mod keys;

pub use derivation::{derive_participant, participant_path, DerivationError, ParticipantKey};
pub use entropy::{
    generate_mnemonic, generate_mnemonics, validate_mnemonic, EntropyError, EntropySource,
    ENTROPY_BYTES, MNEMONIC_WORDS,
};
pub use hash::{hash160, sha256};
pub use keys::{create_bitcoin_address, KeyError, KeyPair};
