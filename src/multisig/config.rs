//! Wallet configuration
//!
//! Validates the m-of-n threshold before any key material exists.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::wallet::MultisigError;
use crate::network::Network;

/// Options accepted when constructing a wallet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalletOptions {
    /// Network the addresses are encoded for (testnet by default)
    #[serde(default)]
    pub network: Network,
}

impl WalletOptions {
    /// Options targeting the given network
    pub fn with_network(network: Network) -> Self {
        Self { network }
    }

    /// Options targeting mainnet
    pub fn mainnet() -> Self {
        Self::with_network(Network::Mainnet)
    }

    /// Options targeting testnet
    pub fn testnet() -> Self {
        Self::with_network(Network::Testnet)
    }
}

/// A validated m-of-n threshold and its target network
///
/// Deserialization goes through [`ThresholdConfig::new`], so a decoded
/// value satisfies the same bounds as a constructed one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawThresholdConfig")]
pub struct ThresholdConfig {
    /// Minimum signatures required (M in M-of-N)
    threshold: u8,
    /// Number of participants (N)
    participants: u8,
    network: Network,
}

/// Unchecked wire form of [`ThresholdConfig`]
#[derive(Deserialize)]
struct RawThresholdConfig {
    threshold: i64,
    participants: i64,
    #[serde(default)]
    network: Network,
}

impl TryFrom<RawThresholdConfig> for ThresholdConfig {
    type Error = MultisigError;

    fn try_from(raw: RawThresholdConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.threshold,
            raw.participants,
            WalletOptions::with_network(raw.network),
        )
    }
}

impl ThresholdConfig {
    /// Create a new threshold configuration
    ///
    /// # Arguments
    /// * `m` - Minimum signatures required
    /// * `n` - Number of participants
    /// * `options` - Network selection
    ///
    /// # Errors
    /// Returns [`MultisigError::InvalidThreshold`] unless `1 <= m <= n <= 255`.
    /// Negative values are rejected, never wrapped.
    pub fn new<M, N>(m: M, n: N, options: WalletOptions) -> Result<Self, MultisigError>
    where
        M: TryInto<u8> + Copy + fmt::Display,
        N: TryInto<u8> + Copy + fmt::Display,
    {
        let threshold: u8 = m
            .try_into()
            .ok()
            .filter(|threshold| *threshold >= 1)
            .ok_or_else(|| {
                MultisigError::InvalidThreshold(format!(
                    "threshold must be a positive integer, got {}",
                    m
                ))
            })?;

        let participants: u8 = n.try_into().map_err(|_| {
            MultisigError::InvalidThreshold(format!(
                "participant count must be between 1 and {}, got {}",
                u8::MAX,
                n
            ))
        })?;

        if threshold > participants {
            return Err(MultisigError::InvalidThreshold(format!(
                "threshold {} exceeds participant count {}",
                threshold, participants
            )));
        }

        Ok(Self {
            threshold,
            participants,
            network: options.network,
        })
    }

    /// Get the threshold (M)
    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    /// Get the participant count (N)
    pub fn participants(&self) -> u8 {
        self.participants
    }

    /// Get the target network
    pub fn network(&self) -> Network {
        self.network
    }

    /// Get description like "2-of-3"
    pub fn description(&self) -> String {
        format!("{}-of-{}", self.threshold, self.participants)
    }
}
