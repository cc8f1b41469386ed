//! Serializable wallet overview
//!
//! Carries only public material unless mnemonics are explicitly requested.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::config::ThresholdConfig;
use super::wallet::GeneratedWallet;
use crate::address::WalletAddresses;
use crate::network::Network;

/// Public view of one participant
#[derive(Debug, Clone, Serialize)]
pub struct CosignerSummary {
    pub index: u32,
    pub derivation_path: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mnemonic: Option<String>,
}

/// Public view of a generated wallet
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub network: Network,
    pub threshold: u8,
    pub participants: u8,
    pub description: String,
    /// Participants in derivation-index order
    pub cosigners: Vec<CosignerSummary>,
    /// Public keys in script order
    pub public_keys: Vec<String>,
    pub redeem_script: String,
    pub redeem_script_asm: String,
    pub addresses: WalletAddresses,
    pub generated_at: DateTime<Utc>,
}

impl WalletSummary {
    pub(crate) fn new(
        config: &ThresholdConfig,
        generated: &GeneratedWallet,
        include_mnemonics: bool,
    ) -> Self {
        let cosigners = generated
            .participants()
            .iter()
            .map(|participant| CosignerSummary {
                index: participant.index(),
                derivation_path: participant.derivation_path_string(),
                public_key: participant.public_key_hex(),
                mnemonic: include_mnemonics.then(|| participant.mnemonic().to_string()),
            })
            .collect();

        let script = generated.redeem_script();

        Self {
            network: config.network(),
            threshold: config.threshold(),
            participants: config.participants(),
            description: config.description(),
            cosigners,
            public_keys: script
                .public_keys()
                .iter()
                .map(|key| hex::encode(key.serialize()))
                .collect(),
            redeem_script: script.to_hex(),
            redeem_script_asm: script.asm(),
            addresses: generated.addresses().clone(),
            generated_at: generated.generated_at(),
        }
    }
}
