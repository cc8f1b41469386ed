//! Multi-signature wallet implementation
//!
//! A [`MultisigWallet`] starts out holding only its threshold
//! configuration. [`MultisigWallet::generate_wallet`] runs the one-shot
//! pipeline (mnemonics, BIP-48 keys, sorted redeem script, addresses)
//! and commits the result atomically; afterwards the wallet is
//! read-only.

use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1};
use std::fmt;
use std::sync::{Mutex, OnceLock};
use thiserror::Error;

use super::config::{ThresholdConfig, WalletOptions};
use super::summary::WalletSummary;
use crate::address::{EncodingError, WalletAddresses};
use crate::crypto::{
    derive_participant, generate_mnemonics, DerivationError, EntropyError, EntropySource,
    ParticipantKey,
};
use crate::network::Network;
use crate::script::{check_key_count, RedeemScript, ScriptError};

/// Errors related to multisig operations
#[derive(Error, Debug)]
pub enum MultisigError {
    #[error("Invalid threshold: {0}")]
    InvalidThreshold(String),
    #[error("Wallet has already been generated")]
    AlreadyGenerated,
    #[error("Wallet has not been generated yet")]
    NotGenerated,
    #[error("Entropy error: {0}")]
    Entropy(#[from] EntropyError),
    #[error("Derivation error: {0}")]
    Derivation(#[from] DerivationError),
    #[error("Script construction error: {0}")]
    Script(#[from] ScriptError),
    #[error("Encoding error: {0}")]
    Encoding(#[from] EncodingError),
}

/// Key material, script and addresses produced by generation
#[derive(Debug, Clone)]
pub struct GeneratedWallet {
    participants: Vec<ParticipantKey>,
    redeem_script: RedeemScript,
    addresses: WalletAddresses,
    generated_at: DateTime<Utc>,
}

impl GeneratedWallet {
    /// Participants in derivation-index order
    pub fn participants(&self) -> &[ParticipantKey] {
        &self.participants
    }

    /// The m-of-n redeem script
    pub fn redeem_script(&self) -> &RedeemScript {
        &self.redeem_script
    }

    /// P2SH and P2WSH addresses of the redeem script
    pub fn addresses(&self) -> &WalletAddresses {
        &self.addresses
    }

    /// When the wallet was generated
    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }
}

/// Lifecycle state of a wallet
#[derive(Debug, Clone, Copy)]
pub enum WalletState<'a> {
    /// Only the configuration exists
    Uninitialized,
    /// Generation completed
    Generated(&'a GeneratedWallet),
}

/// An m-of-n multisig wallet
///
/// `E` supplies the entropy behind every participant mnemonic. The
/// default [`MultisigWallet::new`] draws from the operating system.
pub struct MultisigWallet<E: EntropySource = OsRng> {
    config: ThresholdConfig,
    entropy: Mutex<E>,
    state: OnceLock<GeneratedWallet>,
}

impl MultisigWallet<OsRng> {
    /// Create a wallet backed by the operating system RNG
    ///
    /// # Errors
    /// Returns [`MultisigError::InvalidThreshold`] unless `1 <= m <= n`.
    pub fn new<M, N>(m: M, n: N, options: WalletOptions) -> Result<Self, MultisigError>
    where
        M: TryInto<u8> + Copy + fmt::Display,
        N: TryInto<u8> + Copy + fmt::Display,
    {
        Self::with_entropy(m, n, options, OsRng)
    }
}

impl<E: EntropySource> MultisigWallet<E> {
    /// Create a wallet drawing mnemonic entropy from `source`
    pub fn with_entropy<M, N>(
        m: M,
        n: N,
        options: WalletOptions,
        source: E,
    ) -> Result<Self, MultisigError>
    where
        M: TryInto<u8> + Copy + fmt::Display,
        N: TryInto<u8> + Copy + fmt::Display,
    {
        let config = ThresholdConfig::new(m, n, options)?;
        Ok(Self::from_config(config, source))
    }

    /// Create a wallet from an already validated configuration
    pub fn from_config(config: ThresholdConfig, source: E) -> Self {
        Self {
            config,
            entropy: Mutex::new(source),
            state: OnceLock::new(),
        }
    }

    /// Generate all key material, the redeem script and the addresses
    ///
    /// Runs at most once per wallet. Nothing becomes visible until every
    /// step has succeeded; on failure the wallet stays uninitialized.
    ///
    /// # Errors
    /// [`MultisigError::AlreadyGenerated`] on a repeat call, otherwise the
    /// first error raised by the pipeline.
    pub fn generate_wallet(&self) -> Result<&GeneratedWallet, MultisigError> {
        if self.is_generated() {
            log::warn!("Refusing to regenerate {} wallet", self.description());
            return Err(MultisigError::AlreadyGenerated);
        }
        check_key_count(self.config.participants() as usize)?;

        let mut source = self
            .entropy
            .lock()
            .map_err(|_| EntropyError::Unavailable)?;

        // another caller may have committed while we waited for the lock
        if self.is_generated() {
            log::warn!("Refusing to regenerate {} wallet", self.description());
            return Err(MultisigError::AlreadyGenerated);
        }

        log::info!(
            "Generating {} multisig wallet on {}",
            self.description(),
            self.network()
        );
        let generated = self.build(&mut *source)?;
        log::info!(
            "Generated {} wallet: p2sh={} p2wsh={}",
            self.description(),
            generated.addresses.p2sh,
            generated.addresses.p2wsh
        );

        self.state
            .set(generated)
            .map_err(|_| MultisigError::AlreadyGenerated)?;
        self.generated()
    }

    fn build(&self, source: &mut E) -> Result<GeneratedWallet, MultisigError> {
        let network = self.config.network();
        let mnemonics = generate_mnemonics(source, self.config.participants() as usize)?;

        let secp = Secp256k1::new();
        let participants = mnemonics
            .into_iter()
            .zip(0u32..)
            .map(|(mnemonic, index)| derive_participant(&secp, index, mnemonic, network))
            .collect::<Result<Vec<_>, _>>()?;

        let keys: Vec<PublicKey> = participants.iter().map(ParticipantKey::public_key).collect();
        let redeem_script = RedeemScript::multisig(self.config.threshold(), &keys)?;
        log::debug!("Redeem script: {}", redeem_script.to_hex());

        let addresses = WalletAddresses::from_script(redeem_script.as_bytes(), network)?;

        Ok(GeneratedWallet {
            participants,
            redeem_script,
            addresses,
            generated_at: Utc::now(),
        })
    }

    /// Current lifecycle state
    pub fn state(&self) -> WalletState<'_> {
        match self.state.get() {
            Some(generated) => WalletState::Generated(generated),
            None => WalletState::Uninitialized,
        }
    }

    /// Whether generation has completed
    pub fn is_generated(&self) -> bool {
        self.state.get().is_some()
    }

    /// Generated state, or [`MultisigError::NotGenerated`]
    pub fn generated(&self) -> Result<&GeneratedWallet, MultisigError> {
        match self.state() {
            WalletState::Generated(generated) => Ok(generated),
            WalletState::Uninitialized => Err(MultisigError::NotGenerated),
        }
    }

    /// P2SH and P2WSH addresses
    pub fn addresses(&self) -> Result<&WalletAddresses, MultisigError> {
        Ok(self.generated()?.addresses())
    }

    /// Mnemonic phrases in participant-index order
    pub fn mnemonics(&self) -> Result<Vec<String>, MultisigError> {
        Ok(self
            .generated()?
            .participants
            .iter()
            .map(|participant| participant.mnemonic().to_string())
            .collect())
    }

    /// Derivation paths in participant-index order
    pub fn derivation_paths(&self) -> Result<Vec<String>, MultisigError> {
        Ok(self
            .generated()?
            .participants
            .iter()
            .map(ParticipantKey::derivation_path_string)
            .collect())
    }

    /// The redeem script
    pub fn redeem_script(&self) -> Result<&RedeemScript, MultisigError> {
        Ok(self.generated()?.redeem_script())
    }

    /// Public keys in sorted (script) order
    pub fn public_keys(&self) -> Result<&[PublicKey], MultisigError> {
        Ok(self.generated()?.redeem_script.public_keys())
    }

    /// Participant keys in derivation-index order
    pub fn participants(&self) -> Result<&[ParticipantKey], MultisigError> {
        Ok(self.generated()?.participants())
    }

    /// Serializable overview of the wallet
    pub fn summary(&self, include_mnemonics: bool) -> Result<WalletSummary, MultisigError> {
        Ok(WalletSummary::new(
            &self.config,
            self.generated()?,
            include_mnemonics,
        ))
    }

    /// Get the configuration
    pub fn config(&self) -> &ThresholdConfig {
        &self.config
    }

    /// Get the required threshold
    pub fn threshold(&self) -> u8 {
        self.config.threshold()
    }

    /// Get the total number of participants
    pub fn participant_count(&self) -> usize {
        self.config.participants() as usize
    }

    /// Get the target network
    pub fn network(&self) -> Network {
        self.config.network()
    }

    /// Get human-readable description
    pub fn description(&self) -> String {
        self.config.description()
    }
}

impl<E: EntropySource> fmt::Debug for MultisigWallet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MultisigWallet")
            .field("config", &self.config)
            .field("generated", &self.is_generated())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::validate_mnemonic;
    use crate::script::{sort_public_keys, Instruction};
    use rand::rngs::StdRng;
    use rand::{CryptoRng, RngCore, SeedableRng};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Seeded RNG that counts how often it is asked for bytes
    struct CountingRng {
        inner: StdRng,
        calls: Arc<AtomicUsize>,
    }

    impl RngCore for CountingRng {
        fn next_u32(&mut self) -> u32 {
            self.inner.next_u32()
        }

        fn next_u64(&mut self) -> u64 {
            self.inner.next_u64()
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            self.inner.fill_bytes(dest)
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.inner.try_fill_bytes(dest)
        }
    }

    impl CryptoRng for CountingRng {}

    struct BrokenRng;

    impl RngCore for BrokenRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("no entropy"))
        }
    }

    impl CryptoRng for BrokenRng {}

    fn generated_2_of_3() -> MultisigWallet {
        let wallet = MultisigWallet::new(2, 3, WalletOptions::default()).unwrap();
        wallet.generate_wallet().unwrap();
        wallet
    }

    #[test]
    fn test_create_2_of_3_testnet() {
        let wallet = generated_2_of_3();
        let addresses = wallet.addresses().unwrap();

        assert!(addresses.p2sh.starts_with('2'));
        assert!(addresses.p2wsh.starts_with("tb1"));
        assert_eq!(wallet.description(), "2-of-3");
    }

    #[test]
    fn test_mnemonics() {
        let wallet = generated_2_of_3();
        let mnemonics = wallet.mnemonics().unwrap();

        assert_eq!(mnemonics.len(), 3);
        for mnemonic in &mnemonics {
            assert_eq!(mnemonic.split(' ').count(), 24);
            assert!(validate_mnemonic(mnemonic).is_ok());
        }
    }

    #[test]
    fn test_derivation_paths() {
        let wallet = generated_2_of_3();
        let paths = wallet.derivation_paths().unwrap();

        assert_eq!(paths.len(), 3);
        for (index, path) in paths.iter().enumerate() {
            assert_eq!(path, &format!("m/48'/0'/0'/2'/{}", index));
        }
    }

    #[test]
    fn test_threshold_validation() {
        assert!(matches!(
            MultisigWallet::new(3, 2, WalletOptions::default()),
            Err(MultisigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            MultisigWallet::new(0, 3, WalletOptions::default()),
            Err(MultisigError::InvalidThreshold(_))
        ));
        assert!(matches!(
            MultisigWallet::new(-1, 3, WalletOptions::default()),
            Err(MultisigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_threshold_validation_touches_no_entropy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingRng {
            inner: StdRng::seed_from_u64(1),
            calls: calls.clone(),
        };

        assert!(MultisigWallet::with_entropy(3, 2, WalletOptions::default(), source).is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_script_structure() {
        let wallet = generated_2_of_3();
        let script = wallet.redeem_script().unwrap();
        let public_keys = wallet.public_keys().unwrap();
        let instructions = script.instructions();

        assert_eq!(instructions.len(), public_keys.len() + 3);
        for (i, key) in public_keys.iter().enumerate() {
            assert_eq!(instructions[i + 1], Instruction::Push(key.serialize().to_vec()));
        }
        assert_eq!(
            instructions.last(),
            Some(&Instruction::Op(crate::script::opcodes::OP_CHECKMULTISIG))
        );
    }

    #[test]
    fn test_addresses_match_bitcoin_crate() {
        use bitcoin::Address;

        let wallet = generated_2_of_3();
        let script = bitcoin::Script::from_bytes(wallet.redeem_script().unwrap().as_bytes());
        let addresses = wallet.addresses().unwrap();

        let p2sh = Address::p2sh(script, bitcoin::Network::Testnet).unwrap();
        let p2wsh = Address::p2wsh(script, bitcoin::Network::Testnet);
        assert_eq!(addresses.p2sh, p2sh.to_string());
        assert_eq!(addresses.p2wsh, p2wsh.to_string());
    }

    #[test]
    fn test_public_keys_sorted_and_compressed() {
        let wallet = generated_2_of_3();
        let public_keys = wallet.public_keys().unwrap();

        for key in public_keys {
            let bytes = key.serialize();
            assert_eq!(bytes.len(), 33);
            assert!(PublicKey::from_slice(&bytes).is_ok());
        }

        let mut resorted = public_keys.to_vec();
        sort_public_keys(&mut resorted);
        assert_eq!(resorted, public_keys);
    }

    #[test]
    fn test_participants_keep_their_index() {
        let wallet = generated_2_of_3();
        let participants = wallet.participants().unwrap();
        let public_keys = wallet.public_keys().unwrap();

        for (index, participant) in participants.iter().enumerate() {
            assert_eq!(participant.index() as usize, index);
            assert!(public_keys.contains(&participant.public_key()));
        }
    }

    #[test]
    fn test_mainnet_configuration() {
        let wallet = MultisigWallet::new(2, 3, WalletOptions::mainnet()).unwrap();
        wallet.generate_wallet().unwrap();

        let addresses = wallet.addresses().unwrap();
        assert!(addresses.p2sh.starts_with('3'));
        assert!(addresses.p2wsh.starts_with("bc1"));
    }

    #[test]
    fn test_network_only_changes_addresses() {
        let main = MultisigWallet::with_entropy(
            2,
            3,
            WalletOptions::mainnet(),
            StdRng::seed_from_u64(5),
        )
        .unwrap();
        let test = MultisigWallet::with_entropy(
            2,
            3,
            WalletOptions::testnet(),
            StdRng::seed_from_u64(5),
        )
        .unwrap();
        main.generate_wallet().unwrap();
        test.generate_wallet().unwrap();

        assert_eq!(main.redeem_script().unwrap(), test.redeem_script().unwrap());
        assert_ne!(main.addresses().unwrap(), test.addresses().unwrap());
    }

    #[test]
    fn test_deterministic_entropy() {
        let a = MultisigWallet::with_entropy(2, 3, WalletOptions::default(), StdRng::seed_from_u64(9))
            .unwrap();
        let b = MultisigWallet::with_entropy(2, 3, WalletOptions::default(), StdRng::seed_from_u64(9))
            .unwrap();
        a.generate_wallet().unwrap();
        b.generate_wallet().unwrap();

        assert_eq!(a.mnemonics().unwrap(), b.mnemonics().unwrap());
        assert_eq!(a.addresses().unwrap(), b.addresses().unwrap());
    }

    #[test]
    fn test_accessors_before_generation() {
        let wallet = MultisigWallet::new(2, 3, WalletOptions::default()).unwrap();

        assert!(matches!(wallet.state(), WalletState::Uninitialized));
        assert!(matches!(wallet.addresses(), Err(MultisigError::NotGenerated)));
        assert!(matches!(wallet.mnemonics(), Err(MultisigError::NotGenerated)));
        assert!(matches!(
            wallet.derivation_paths(),
            Err(MultisigError::NotGenerated)
        ));
        assert!(matches!(
            wallet.redeem_script(),
            Err(MultisigError::NotGenerated)
        ));
        assert!(matches!(wallet.public_keys(), Err(MultisigError::NotGenerated)));
        assert!(matches!(wallet.summary(false), Err(MultisigError::NotGenerated)));
    }

    #[test]
    fn test_regeneration_rejected() {
        let wallet = generated_2_of_3();
        let before = wallet.addresses().unwrap().clone();

        assert!(matches!(
            wallet.generate_wallet(),
            Err(MultisigError::AlreadyGenerated)
        ));
        assert_eq!(wallet.addresses().unwrap(), &before);
    }

    #[test]
    fn test_too_many_participants() {
        let calls = Arc::new(AtomicUsize::new(0));
        let source = CountingRng {
            inner: StdRng::seed_from_u64(3),
            calls: calls.clone(),
        };
        let wallet = MultisigWallet::with_entropy(2, 16, WalletOptions::default(), source).unwrap();

        assert!(matches!(
            wallet.generate_wallet(),
            Err(MultisigError::Script(ScriptError::TooManyKeys { .. }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!wallet.is_generated());
    }

    #[test]
    fn test_failed_generation_leaves_no_state() {
        let wallet =
            MultisigWallet::with_entropy(2, 3, WalletOptions::default(), BrokenRng).unwrap();

        assert!(matches!(
            wallet.generate_wallet(),
            Err(MultisigError::Entropy(_))
        ));
        assert!(matches!(wallet.state(), WalletState::Uninitialized));
        assert!(wallet.mnemonics().is_err());
    }

    #[test]
    fn test_every_participant_count() {
        for n in 1..=15u8 {
            let m = n.div_ceil(2);
            let wallet = MultisigWallet::with_entropy(
                m,
                n,
                WalletOptions::default(),
                StdRng::seed_from_u64(n as u64),
            )
            .unwrap();
            wallet.generate_wallet().unwrap();

            assert_eq!(wallet.mnemonics().unwrap().len(), n as usize);
            assert_eq!(wallet.derivation_paths().unwrap().len(), n as usize);
            assert_eq!(wallet.public_keys().unwrap().len(), n as usize);
            assert_eq!(
                wallet.redeem_script().unwrap().instructions().len(),
                n as usize + 3
            );
        }
    }

    #[test]
    fn test_concurrent_generation_commits_once() {
        let wallet = Arc::new(MultisigWallet::new(2, 3, WalletOptions::default()).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let wallet = Arc::clone(&wallet);
                std::thread::spawn(move || {
                    wallet
                        .generate_wallet()
                        .map(|generated| generated.addresses().clone())
                })
            })
            .collect();

        let results: Vec<_> = handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect();

        let winners: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        assert_eq!(winners.len(), 1);
        assert!(results
            .iter()
            .filter(|r| r.is_err())
            .all(|r| matches!(r, Err(MultisigError::AlreadyGenerated))));
        assert_eq!(wallet.addresses().unwrap(), winners[0]);
    }

    #[test]
    fn test_summary() {
        let wallet = generated_2_of_3();

        let summary = wallet.summary(false).unwrap();
        assert_eq!(summary.cosigners.len(), 3);
        assert!(summary.cosigners.iter().all(|c| c.mnemonic.is_none()));

        let json = serde_json::to_string(&summary).unwrap();
        assert!(!json.contains("mnemonic"));
        assert!(json.contains(&wallet.addresses().unwrap().p2wsh));

        let with_secrets = wallet.summary(true).unwrap();
        assert_eq!(
            with_secrets.cosigners[0].mnemonic.as_deref(),
            Some(wallet.mnemonics().unwrap()[0].as_str())
        );
    }
}
