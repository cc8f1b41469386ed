//! Entropy and mnemonic generation
//!
//! Every participant seed starts as 256 bits drawn from an
//! [`EntropySource`] and is encoded as a 24-word BIP-39 mnemonic.
//! The source is injected so callers can substitute a seeded RNG.

use bip39::Mnemonic;
use rand::{CryptoRng, RngCore};
use std::collections::HashSet;
use thiserror::Error;

/// Bytes of entropy behind each mnemonic (256 bits)
pub const ENTROPY_BYTES: usize = 32;

/// Words in a mnemonic encoding [`ENTROPY_BYTES`] of entropy
pub const MNEMONIC_WORDS: usize = 24;

/// Errors raised while drawing entropy or encoding mnemonics
#[derive(Error, Debug)]
pub enum EntropyError {
    #[error("Entropy source failed: {0}")]
    Source(#[from] rand::Error),
    #[error("Mnemonic error: {0}")]
    Mnemonic(#[from] bip39::Error),
    #[error("Expected a 24-word mnemonic, got {0} words")]
    WordCount(usize),
    #[error("Entropy source repeated the mnemonic of participant {0}")]
    DuplicateMnemonic(usize),
    #[error("Entropy source is unavailable")]
    Unavailable,
}

/// Provider of cryptographically secure random bytes
pub trait EntropySource: Send {
    /// Fill `dest` entirely with fresh random bytes
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;
}

impl<R: RngCore + CryptoRng + Send> EntropySource for R {
    fn fill_entropy(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.try_fill_bytes(dest)?;
        Ok(())
    }
}

/// Generate a single 24-word mnemonic
pub fn generate_mnemonic<E: EntropySource + ?Sized>(
    source: &mut E,
) -> Result<Mnemonic, EntropyError> {
    let mut entropy = [0u8; ENTROPY_BYTES];
    source.fill_entropy(&mut entropy)?;
    Ok(Mnemonic::from_entropy(&entropy)?)
}

/// Generate `count` distinct 24-word mnemonics, one per participant
///
/// # Errors
/// Fails if the source errors or hands out the same entropy twice.
pub fn generate_mnemonics<E: EntropySource + ?Sized>(
    source: &mut E,
    count: usize,
) -> Result<Vec<Mnemonic>, EntropyError> {
    let mut seen = HashSet::with_capacity(count);
    let mut mnemonics = Vec::with_capacity(count);

    for index in 0..count {
        let mnemonic = generate_mnemonic(source)?;
        if !seen.insert(mnemonic.to_string()) {
            return Err(EntropyError::DuplicateMnemonic(index));
        }
        mnemonics.push(mnemonic);
    }

    Ok(mnemonics)
}

/// Parse a phrase, checking wordlist membership, checksum and length
pub fn validate_mnemonic(phrase: &str) -> Result<Mnemonic, EntropyError> {
    let mnemonic = Mnemonic::parse(phrase)?;
    let words = mnemonic.word_count();
    if words != MNEMONIC_WORDS {
        return Err(EntropyError::WordCount(words));
    }
    Ok(mnemonic)
}
