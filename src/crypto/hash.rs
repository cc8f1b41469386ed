//! Hashing utilities for scripts and keys
//!
//! Provides the SHA-256 and HASH160 digests used to commit to redeem
//! scripts and public keys inside addresses.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Computes SHA-256 hash of the input data
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Computes HASH160 (RIPEMD-160 of SHA-256)
/// Used for P2SH script hashes and P2PKH key hashes
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let mut ripemd = Ripemd160::new();
    ripemd.update(sha256(data));
    ripemd.finalize().into()
}
