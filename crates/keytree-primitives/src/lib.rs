/// Keytree SDK - Cryptographic primitives, hashing, and encoding utilities.
///
/// This crate provides the foundational building blocks for the Keytree SDK:
/// - Hash functions (SHA-256, SHA-256d, RIPEMD-160, Hash160, Keccak-256,
///   HMAC-SHA512, PBKDF2-HMAC-SHA512)
/// - Elliptic curve cryptography (secp256k1 keys and tweak arithmetic)
/// - Base58 and Base58Check encoding/decoding

pub mod hash;
pub mod base58;
pub mod ec;

mod error;
pub use error::PrimitivesError;
