//! Address encoding
//!
//! Turns a redeem script into its P2SH (Base58Check over HASH160) and
//! P2WSH (Bech32 segwit v0 over SHA-256) addresses. Both are pure
//! functions of the script bytes and the network, so anyone holding the
//! script can recompute them.

use bech32::{u5, ToBase32, Variant};
use secp256k1::PublicKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::crypto::{hash160, sha256};
use crate::network::Network;

/// Length of a HASH160 payload
pub const HASH160_LEN: usize = 20;

/// Length of a P2WSH witness program
pub const WITNESS_SCRIPT_HASH_LEN: usize = 32;

/// Errors raised while encoding addresses
#[derive(Error, Debug)]
pub enum EncodingError {
    #[error("Invalid payload length: expected {expected} bytes, got {actual}")]
    InvalidPayloadLength { expected: usize, actual: usize },
    #[error("Invalid witness program length: {0} bytes")]
    InvalidWitnessProgramLength(usize),
    #[error("Bech32 error: {0}")]
    Bech32(#[from] bech32::Error),
}

/// The two script-hash addresses of a redeem script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletAddresses {
    /// Legacy pay-to-script-hash address
    pub p2sh: String,
    /// Native segwit pay-to-witness-script-hash address
    pub p2wsh: String,
}

impl WalletAddresses {
    /// Compute both addresses for a redeem script
    pub fn from_script(script: &[u8], network: Network) -> Result<Self, EncodingError> {
        Ok(Self {
            p2sh: p2sh_address(script, network)?,
            p2wsh: p2wsh_address(script, network)?,
        })
    }
}

/// Base58Check-encode a 20-byte hash under a version byte
pub fn encode_base58check(version: u8, payload: &[u8]) -> Result<String, EncodingError> {
    if payload.len() != HASH160_LEN {
        return Err(EncodingError::InvalidPayloadLength {
            expected: HASH160_LEN,
            actual: payload.len(),
        });
    }

    Ok(bs58::encode(payload)
        .with_check_version(version)
        .into_string())
}

/// Encode a segwit version 0 witness program as Bech32
pub fn encode_segwit_v0(hrp: &str, program: &[u8]) -> Result<String, EncodingError> {
    if program.len() != HASH160_LEN && program.len() != WITNESS_SCRIPT_HASH_LEN {
        return Err(EncodingError::InvalidWitnessProgramLength(program.len()));
    }

    let mut data = vec![u5::try_from_u8(0)?];
    data.extend(program.to_base32());
    Ok(bech32::encode(hrp, data, Variant::Bech32)?)
}

/// P2SH address: Base58Check(version || HASH160(script))
pub fn p2sh_address(script: &[u8], network: Network) -> Result<String, EncodingError> {
    encode_base58check(network.p2sh_version(), &hash160(script))
}

/// P2WSH address: Bech32(hrp, 0 || SHA256(script))
pub fn p2wsh_address(script: &[u8], network: Network) -> Result<String, EncodingError> {
    encode_segwit_v0(network.bech32_hrp(), &sha256(script))
}

/// P2PKH address of a compressed public key
pub fn p2pkh_address(public_key: &PublicKey, network: Network) -> Result<String, EncodingError> {
    encode_base58check(network.p2pkh_version(), &hash160(&public_key.serialize()))
}
