//! Redeem script construction
//!
//! This module provides:
//! - Opcode constants and small-integer encoding
//! - Script decompilation into instructions
//! - Canonical m-of-n multisig redeem scripts

pub mod instruction;
pub mod opcodes;
pub mod redeem;

use thiserror::Error;

pub use instruction::{decompile, Instruction};
pub use redeem::{
    check_key_count, sort_public_keys, RedeemScript, COMPRESSED_KEY_SIZE, MAX_MULTISIG_KEYS,
};

/// Script-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("Multisig requires at least one public key")]
    NoKeys,
    #[error("Too many keys: {count} exceeds the multisig limit of {max}")]
    TooManyKeys { count: usize, max: usize },
    #[error("Invalid threshold: {threshold}-of-{total}")]
    InvalidThreshold { threshold: u8, total: u8 },
    #[error("Duplicate public key")]
    DuplicateKey,
    #[error("Invalid public key in script")]
    InvalidPublicKey,
    #[error("Script truncated at byte {0}")]
    Truncated(usize),
    #[error("Not a multisig script: {0}")]
    NotMultisig(String),
}
