//! Coin address encoding.
//!
//! Turns a derived public key into the address format of its coin:
//! Base58Check P2PKH for Bitcoin, hex with a Keccak-256 tail for
//! Ethereum.

use keytree_primitives::base58;
use keytree_primitives::ec::PublicKey;
use keytree_primitives::hash::keccak256;

use crate::WalletError;

/// BIP-44 coin type for Bitcoin mainnet.
pub const COIN_TYPE_BITCOIN: u32 = 0;

/// BIP-44 coin type for Ethereum.
pub const COIN_TYPE_ETHEREUM: u32 = 60;

/// Version byte for mainnet pay-to-pubkey-hash addresses.
const P2PKH_VERSION: u8 = 0x00;

/// Encodes a public key as an address for the given coin type.
///
/// # Arguments
///
/// * `public_key` - The derived public key.
/// * `coin_type` - A BIP-44 coin type; 0 (Bitcoin) and 60 (Ethereum)
///   are supported.
///
/// # Returns
///
/// A `Result` containing the address string, or
/// `WalletError::UnsupportedCoin` for any other coin type.
pub fn encode_address(public_key: &PublicKey, coin_type: u32) -> Result<String, WalletError> {
    match coin_type {
        COIN_TYPE_BITCOIN => Ok(p2pkh_address(public_key)),
        COIN_TYPE_ETHEREUM => Ok(eth_address(public_key)),
        other => Err(WalletError::UnsupportedCoin(other)),
    }
}

/// Mainnet P2PKH address: Base58Check over a zero version byte and the
/// Hash160 of the compressed public key.
pub fn p2pkh_address(public_key: &PublicKey) -> String {
    let mut payload = Vec::with_capacity(21);
    payload.push(P2PKH_VERSION);
    payload.extend_from_slice(&public_key.hash160());
    base58::check_encode(&payload)
}

/// Ethereum address: `0x` plus the last 20 bytes of the Keccak-256
/// digest of the uncompressed point coordinates, in lowercase hex.
pub fn eth_address(public_key: &PublicKey) -> String {
    // Keccak-256 runs over the 64 coordinate bytes, without the 0x04
    // SEC1 prefix.
    let uncompressed = public_key.to_uncompressed();
    let digest = keccak256(&uncompressed[1..]);
    format!("0x{}", hex::encode(&digest[12..]))
}

/// Applies the EIP-55 checksum casing to a hex Ethereum address.
///
/// Each hex letter is uppercased when the matching nibble of the
/// Keccak-256 digest of the lowercase address is 8 or more.
///
/// # Arguments
///
/// * `address` - A `0x`-prefixed 40-digit hex address in any casing.
///
/// # Returns
///
/// A `Result` containing the checksummed address, or a `WalletError`
/// if the input is not a hex address.
pub fn to_eip55(address: &str) -> Result<String, WalletError> {
    let hex_part = address
        .strip_prefix("0x")
        .ok_or_else(|| WalletError::InvalidAddress("missing 0x prefix".to_string()))?;
    if hex_part.len() != 40 || !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidAddress(
            "expected 40 hex characters".to_string(),
        ));
    }

    let lower = hex_part.to_ascii_lowercase();
    let digest = keccak256(lower.as_bytes());

    let mut checksummed = String::with_capacity(42);
    checksummed.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            checksummed.push(c.to_ascii_uppercase());
        } else {
            checksummed.push(c);
        }
    }
    Ok(checksummed)
}
