/// Elliptic curve cryptography on secp256k1.
///
/// Provides private and public keys together with the additive tweak
/// arithmetic used by hierarchical deterministic key derivation.

pub mod private_key;
pub mod public_key;

pub use private_key::PrivateKey;
pub use public_key::PublicKey;
