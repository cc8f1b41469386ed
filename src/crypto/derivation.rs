//! BIP-48 key derivation for multisig participants
//!
//! Each participant turns their mnemonic into a BIP-39 seed, builds a
//! BIP-32 master key from it and derives the child at
//! `m/48'/0'/0'/2'/<index>`: purpose 48', coin type 0', account 0',
//! script type 2' (native segwit multisig), then the unhardened
//! participant index.

use bip39::Mnemonic;
use bitcoin::bip32::{self, ChildNumber, DerivationPath, Xpriv};
use secp256k1::{All, PublicKey, Secp256k1, SecretKey};
use std::fmt;
use thiserror::Error;

use crate::network::Network;

// =============================================================================
// Path Constants
// =============================================================================

/// BIP-48 purpose field
pub const BIP48_PURPOSE: u32 = 48;

/// Coin type used for every network
pub const COIN_TYPE: u32 = 0;

/// Account index shared by all participants
pub const ACCOUNT: u32 = 0;

/// BIP-48 script type for P2WSH multisig
pub const SCRIPT_TYPE_P2WSH: u32 = 2;

/// Errors that can occur during key derivation
#[derive(Error, Debug)]
pub enum DerivationError {
    #[error("BIP32 derivation error: {0}")]
    Bip32(#[from] bip32::Error),
    #[error("Participant index {0} cannot be used as an unhardened child number")]
    IndexOutOfRange(u32),
}

/// Build the derivation path for a participant index
pub fn participant_path(index: u32) -> Result<DerivationPath, DerivationError> {
    let children = [
        ChildNumber::from_hardened_idx(BIP48_PURPOSE)?,
        ChildNumber::from_hardened_idx(COIN_TYPE)?,
        ChildNumber::from_hardened_idx(ACCOUNT)?,
        ChildNumber::from_hardened_idx(SCRIPT_TYPE_P2WSH)?,
        ChildNumber::from_normal_idx(index)
            .map_err(|_| DerivationError::IndexOutOfRange(index))?,
    ];
    Ok(DerivationPath::from(children.to_vec()))
}

/// One participant's derived key material
///
/// The secret key stays inside the crate; callers only see the mnemonic
/// owner's public material unless they ask for the phrase explicitly.
#[derive(Clone)]
pub struct ParticipantKey {
    index: u32,
    mnemonic: Mnemonic,
    path: DerivationPath,
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl ParticipantKey {
    /// Participant index (position in generation order)
    pub fn index(&self) -> u32 {
        self.index
    }

    /// The participant's 24-word mnemonic
    pub fn mnemonic(&self) -> &Mnemonic {
        &self.mnemonic
    }

    /// Derivation path of the participant key
    pub fn derivation_path(&self) -> &DerivationPath {
        &self.path
    }

    /// Derivation path formatted as `m/48'/0'/0'/2'/i`
    pub fn derivation_path_string(&self) -> String {
        self.path.to_string()
    }

    /// Compressed public key
    pub fn public_key(&self) -> PublicKey {
        self.public_key
    }

    /// Compressed public key as hex
    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key.serialize())
    }

    #[cfg(test)]
    pub(crate) fn secret_key(&self) -> &SecretKey {
        &self.secret_key
    }
}

impl Drop for ParticipantKey {
    fn drop(&mut self) {
        self.secret_key.non_secure_erase();
    }
}

impl fmt::Debug for ParticipantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParticipantKey")
            .field("index", &self.index)
            .field("path", &self.derivation_path_string())
            .field("public_key", &self.public_key_hex())
            .finish_non_exhaustive()
    }
}

/// Derive a participant's key at `m/48'/0'/0'/2'/<index>`
///
/// The mnemonic is stretched with an empty passphrase. `network` only
/// selects the extended key version and never changes the derived key.
pub fn derive_participant(
    secp: &Secp256k1<All>,
    index: u32,
    mnemonic: Mnemonic,
    network: Network,
) -> Result<ParticipantKey, DerivationError> {
    let path = participant_path(index)?;
    let seed = mnemonic.to_seed("");

    let master = Xpriv::new_master(network.to_bitcoin(), &seed)?;
    let child = master.derive_priv(secp, &path)?;
    let secret_key = child.private_key;
    let public_key = PublicKey::from_secret_key(secp, &secret_key);

    log::debug!(
        "Derived participant {} at {}: {}",
        index,
        path,
        hex::encode(public_key.serialize())
    );

    Ok(ParticipantKey {
        index,
        mnemonic,
        path,
        public_key,
        secret_key,
    })
}
