//! The full derivation pipeline.
//!
//! Chains entropy, mnemonic, seed, master key, BIP-44 path walk and
//! address encoding into one call, collecting every intermediate
//! product into a [`Derivation`] record.

use zeroize::Zeroize;

use crate::address;
use crate::bip32::{DerivationPath, ExtendedPrivateKey, HARDENED_OFFSET};
use crate::bip39;
use crate::WalletError;

/// Options controlling a pipeline run.
#[derive(Clone, Debug)]
pub struct DerivationConfig {
    /// Entropy strength in bits when no entropy is supplied.
    pub entropy_bits: usize,
    /// BIP-44 coin type; 0 (Bitcoin) and 60 (Ethereum) are supported.
    pub coin_type: u32,
    /// BIP-44 account index, hardened during derivation.
    pub account: u32,
    /// BIP-44 change level: 0 for external, 1 for internal addresses.
    pub change: u32,
    /// BIP-44 address index.
    pub address_index: u32,
    /// BIP-39 passphrase mixed into seed stretching; empty for none.
    pub passphrase: String,
}

impl Default for DerivationConfig {
    fn default() -> Self {
        DerivationConfig {
            entropy_bits: 128,
            coin_type: address::COIN_TYPE_BITCOIN,
            account: 0,
            change: 0,
            address_index: 0,
            passphrase: String::new(),
        }
    }
}

impl DerivationConfig {
    fn validate(&self) -> Result<(), WalletError> {
        if self.change > 1 {
            return Err(WalletError::InvalidArgument(format!(
                "change must be 0 or 1, got {}",
                self.change
            )));
        }
        if self.account >= HARDENED_OFFSET {
            return Err(WalletError::InvalidArgument(format!(
                "account {} exceeds 2^31 - 1",
                self.account
            )));
        }
        if self.address_index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidArgument(format!(
                "address index {} exceeds 2^31 - 1",
                self.address_index
            )));
        }
        Ok(())
    }
}

/// Everything produced by one pipeline run.
///
/// The entropy, mnemonic and seed are wiped when the record is
/// dropped; the extended keys wipe their own secret halves.
#[derive(Clone, Debug)]
pub struct Derivation {
    /// Entropy the mnemonic encodes.
    pub entropy: Vec<u8>,
    /// The mnemonic sentence.
    pub mnemonic: String,
    /// The 64-byte stretched seed.
    pub seed: [u8; 64],
    /// Master extended private key for the seed.
    pub master_key: ExtendedPrivateKey,
    /// Extended private key at the BIP-44 path.
    pub derived_key: ExtendedPrivateKey,
    /// The path walked from master to derived key.
    pub path: DerivationPath,
    /// Address of the derived public key, in the coin's format.
    pub address: String,
}

impl Drop for Derivation {
    fn drop(&mut self) {
        self.entropy.zeroize();
        self.mnemonic.zeroize();
        self.seed.zeroize();
    }
}

/// Runs the pipeline for a coin type with default settings.
///
/// # Arguments
///
/// * `entropy` - Entropy to derive from, or `None` to draw 128 bits
///   from the OS generator.
/// * `coin_type` - A BIP-44 coin type; 0 (Bitcoin) and 60 (Ethereum)
///   are supported.
///
/// # Returns
///
/// A `Result` containing the full [`Derivation`] record, or the first
/// `WalletError` raised by any stage.
pub fn derive(entropy: Option<&[u8]>, coin_type: u32) -> Result<Derivation, WalletError> {
    let config = DerivationConfig {
        coin_type,
        ..DerivationConfig::default()
    };
    derive_with_config(entropy, &config)
}

/// Runs the pipeline with explicit settings.
///
/// The path walked is `m/44'/coin_type'/account'/change/address_index`.
/// Supplied entropy overrides `entropy_bits`.
///
/// # Arguments
///
/// * `entropy` - Entropy to derive from, or `None` to generate it.
/// * `config` - Pipeline settings.
///
/// # Returns
///
/// A `Result` containing the full [`Derivation`] record, or the first
/// `WalletError` raised by any stage.
pub fn derive_with_config(
    entropy: Option<&[u8]>,
    config: &DerivationConfig,
) -> Result<Derivation, WalletError> {
    config.validate()?;

    let entropy = match entropy {
        Some(bytes) => bytes.to_vec(),
        None => bip39::generate_entropy(config.entropy_bits)?,
    };
    let mnemonic = bip39::entropy_to_mnemonic(&entropy)?;
    let seed = bip39::mnemonic_to_seed(&mnemonic, &config.passphrase);
    let master_key = ExtendedPrivateKey::new_master(&seed)?;

    let path = DerivationPath::bip44(
        config.coin_type,
        config.account,
        config.change,
        config.address_index,
    );
    let derived_key = master_key.derive_path(&path)?;
    let address = address::encode_address(&derived_key.private_key.pub_key(), config.coin_type)?;

    Ok(Derivation {
        entropy,
        mnemonic,
        seed,
        master_key,
        derived_key,
        path,
        address,
    })
}
