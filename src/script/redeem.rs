//! Multisig redeem scripts
//!
//! Builds `OP_m <pubkey>... OP_n OP_CHECKMULTISIG` over the
//! lexicographically sorted set of participant keys, so the same key set
//! always yields the same script regardless of generation order.

use secp256k1::PublicKey;
use std::fmt;

use super::instruction::{decompile, Instruction};
use super::opcodes::{small_int_opcode, small_int_value, OP_CHECKMULTISIG, OP_PUSHBYTES_33};
use super::ScriptError;

/// Maximum number of keys in a standard multisig script
pub const MAX_MULTISIG_KEYS: usize = 15;

/// Size of a compressed public key
pub const COMPRESSED_KEY_SIZE: usize = 33;

/// Check `n` against the multisig key-count ceiling
pub fn check_key_count(n: usize) -> Result<(), ScriptError> {
    if n == 0 {
        return Err(ScriptError::NoKeys);
    }
    if n > MAX_MULTISIG_KEYS {
        return Err(ScriptError::TooManyKeys {
            count: n,
            max: MAX_MULTISIG_KEYS,
        });
    }
    Ok(())
}

/// Sort public keys ascending by their compressed serialization
pub fn sort_public_keys(keys: &mut [PublicKey]) {
    keys.sort_by_key(|key| key.serialize());
}

/// An m-of-n multisig redeem script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedeemScript {
    threshold: u8,
    public_keys: Vec<PublicKey>,
    bytes: Vec<u8>,
}

impl RedeemScript {
    /// Build an m-of-n script over the given keys
    ///
    /// The keys are sorted first; their input order does not matter.
    ///
    /// # Errors
    /// Fails on an empty key set, more than [`MAX_MULTISIG_KEYS`] keys,
    /// a threshold outside `1..=n`, or a repeated key.
    pub fn multisig(threshold: u8, keys: &[PublicKey]) -> Result<Self, ScriptError> {
        check_key_count(keys.len())?;
        let total = keys.len() as u8;
        if threshold == 0 || threshold > total {
            return Err(ScriptError::InvalidThreshold { threshold, total });
        }

        let mut public_keys = keys.to_vec();
        sort_public_keys(&mut public_keys);
        if public_keys.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ScriptError::DuplicateKey);
        }

        let mut bytes = Vec::with_capacity(3 + public_keys.len() * (COMPRESSED_KEY_SIZE + 1));
        bytes.push(small_int(threshold)?);
        for key in &public_keys {
            bytes.push(OP_PUSHBYTES_33);
            bytes.extend_from_slice(&key.serialize());
        }
        bytes.push(small_int(total)?);
        bytes.push(OP_CHECKMULTISIG);

        Ok(Self {
            threshold,
            public_keys,
            bytes,
        })
    }

    /// Parse an existing multisig redeem script
    ///
    /// Keys keep the order they have in the script.
    pub fn parse(bytes: &[u8]) -> Result<Self, ScriptError> {
        let instructions = decompile(bytes)?;
        if instructions.len() < 4 {
            return Err(ScriptError::NotMultisig(
                "too few script elements".to_string(),
            ));
        }

        let last = instructions.len() - 1;
        if instructions[last] != Instruction::Op(OP_CHECKMULTISIG) {
            return Err(ScriptError::NotMultisig(
                "missing OP_CHECKMULTISIG".to_string(),
            ));
        }

        let threshold = read_small_int(&instructions[0])?;
        let total = read_small_int(&instructions[last - 1])?;
        let key_pushes = &instructions[1..last - 1];
        if key_pushes.len() != total as usize {
            return Err(ScriptError::NotMultisig(format!(
                "declares {} keys but pushes {}",
                total,
                key_pushes.len()
            )));
        }

        let public_keys = key_pushes
            .iter()
            .map(|instruction| {
                let data = instruction
                    .push_bytes()
                    .filter(|data| data.len() == COMPRESSED_KEY_SIZE)
                    .ok_or(ScriptError::InvalidPublicKey)?;
                PublicKey::from_slice(data).map_err(|_| ScriptError::InvalidPublicKey)
            })
            .collect::<Result<Vec<_>, _>>()?;

        check_key_count(public_keys.len())?;
        if threshold == 0 || threshold > total {
            return Err(ScriptError::InvalidThreshold { threshold, total });
        }

        let mut sorted = public_keys.clone();
        sort_public_keys(&mut sorted);
        if sorted.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(ScriptError::DuplicateKey);
        }

        Ok(Self {
            threshold,
            public_keys,
            bytes: bytes.to_vec(),
        })
    }

    /// Required signatures (m)
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Number of keys (n)
    pub fn key_count(&self) -> usize {
        self.public_keys.len()
    }

    /// Public keys in script order
    pub fn public_keys(&self) -> &[PublicKey] {
        &self.public_keys
    }

    /// Whether the keys appear in canonical sorted order
    pub fn has_sorted_keys(&self) -> bool {
        self.public_keys
            .windows(2)
            .all(|pair| pair[0].serialize() <= pair[1].serialize())
    }

    /// Raw script bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Script bytes as hex
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }

    /// Decompiled script elements
    pub fn instructions(&self) -> Vec<Instruction> {
        // built or parsed from a well-formed script
        decompile(&self.bytes).unwrap_or_default()
    }

    /// Human-readable assembly, e.g. `OP_2 02ab.. 03cd.. OP_2 OP_CHECKMULTISIG`
    pub fn asm(&self) -> String {
        self.instructions()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.public_keys.len())
    }
}

impl AsRef<[u8]> for RedeemScript {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for RedeemScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.asm())
    }
}

fn small_int(value: u8) -> Result<u8, ScriptError> {
    small_int_opcode(value).ok_or(ScriptError::TooManyKeys {
        count: value as usize,
        max: MAX_MULTISIG_KEYS,
    })
}

fn read_small_int(instruction: &Instruction) -> Result<u8, ScriptError> {
    instruction
        .opcode()
        .and_then(small_int_value)
        .ok_or_else(|| ScriptError::NotMultisig("expected a small integer opcode".to_string()))
}
