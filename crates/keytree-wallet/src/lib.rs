/// Keytree SDK - Hierarchical deterministic wallet derivation.
///
/// Implements BIP-39 mnemonic sentences and seed stretching, BIP-32
/// extended key trees, BIP-44 account paths, and coin address
/// encoding (Bitcoin P2PKH, Ethereum), chained together by the
/// derivation pipeline.

mod error;
pub use error::WalletError;

pub mod address;
pub mod bip32;
pub mod bip39;
pub mod pipeline;

pub use bip32::{ChildNumber, DerivationPath, ExtendedPrivateKey, ExtendedPublicKey};
pub use pipeline::{derive, derive_with_config, Derivation, DerivationConfig};
