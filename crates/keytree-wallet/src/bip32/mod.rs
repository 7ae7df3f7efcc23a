//! BIP-32 hierarchical deterministic key trees.
//!
//! A master key is generated from a seed, children are derived along
//! [`DerivationPath`]s, and keys serialize to the `xprv`/`xpub`
//! Base58Check forms. Public subtrees can be derived without private
//! material via [`ExtendedPublicKey`].

mod extended_key;
mod path;

pub use extended_key::{ExtendedPrivateKey, ExtendedPublicKey};
pub use path::{ChildNumber, DerivationPath};

/// Serialized index offset marking hardened children: 2^31.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;
