//! Extended private and public keys.
//!
//! An extended key pairs a curve key with a 32-byte chain code so
//! whole subtrees of keys can be derived from it. Keys serialize to
//! the 78-byte mainnet `xprv`/`xpub` Base58Check encoding.

use std::fmt;
use std::str::FromStr;

use zeroize::Zeroize;

use keytree_primitives::base58;
use keytree_primitives::ec::{PrivateKey, PublicKey};
use keytree_primitives::hash::sha512_hmac;

use super::{ChildNumber, DerivationPath, HARDENED_OFFSET};
use crate::WalletError;

/// Version bytes for mainnet extended private keys ("xprv").
const XPRV_VERSION: [u8; 4] = [0x04, 0x88, 0xad, 0xe4];

/// Version bytes for mainnet extended public keys ("xpub").
const XPUB_VERSION: [u8; 4] = [0x04, 0x88, 0xb2, 0x1e];

/// Length of a serialized extended key before the Base58Check wrap.
const SERIALIZED_LEN: usize = 78;

/// HMAC key for turning a seed into the master key.
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Accepted seed lengths for master key generation, in bytes.
const SEED_LEN_RANGE: std::ops::RangeInclusive<usize> = 16..=64;

/// An extended private key: a private key plus the chain code and
/// position metadata needed to derive children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPrivateKey {
    /// Tree depth; 0 for a master key.
    pub depth: u8,
    /// First four bytes of the parent public key's Hash160, or zeros
    /// for a master key.
    pub parent_fingerprint: [u8; 4],
    /// Serialized index of this key under its parent; 0 for a master
    /// key.
    pub child_number: u32,
    /// Chain code extending the key for child derivation.
    pub chain_code: [u8; 32],
    /// The private key itself.
    pub private_key: PrivateKey,
}

/// An extended public key, able to derive non-hardened children
/// without any private material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedPublicKey {
    /// Tree depth; 0 for a master key.
    pub depth: u8,
    /// First four bytes of the parent public key's Hash160, or zeros
    /// for a master key.
    pub parent_fingerprint: [u8; 4],
    /// Serialized index of this key under its parent; 0 for a master
    /// key.
    pub child_number: u32,
    /// Chain code extending the key for child derivation.
    pub chain_code: [u8; 32],
    /// The public key itself.
    pub public_key: PublicKey,
}

impl ExtendedPrivateKey {
    /// Generates the master key for a seed.
    ///
    /// The seed is keyed through HMAC-SHA512 under `"Bitcoin seed"`;
    /// the left half becomes the private key and the right half the
    /// chain code.
    ///
    /// # Arguments
    ///
    /// * `seed` - Between 16 and 64 bytes of seed material.
    ///
    /// # Returns
    ///
    /// A `Result` containing the master key, or a `WalletError` if the
    /// seed length is out of range or the left half is not a usable
    /// scalar.
    pub fn new_master(seed: &[u8]) -> Result<Self, WalletError> {
        if !SEED_LEN_RANGE.contains(&seed.len()) {
            return Err(WalletError::InvalidSeedLength(seed.len()));
        }

        let digest = sha512_hmac(MASTER_HMAC_KEY, seed);
        let private_key = PrivateKey::from_bytes(&digest[..32])
            .map_err(|_| WalletError::InvalidMasterKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);

        Ok(ExtendedPrivateKey {
            depth: 0,
            parent_fingerprint: [0u8; 4],
            child_number: 0,
            chain_code,
            private_key,
        })
    }

    /// Drops the private half, keeping the public key and chain code.
    pub fn neuter(&self) -> ExtendedPublicKey {
        ExtendedPublicKey {
            depth: self.depth,
            parent_fingerprint: self.parent_fingerprint,
            child_number: self.child_number,
            chain_code: self.chain_code,
            public_key: self.private_key.pub_key(),
        }
    }

    /// Derives one child key.
    ///
    /// An index whose tweak falls outside the scalar field is skipped
    /// in favor of the next one, staying on the same side of the
    /// hardened boundary.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, WalletError> {
        let mut index = child.to_index()?;
        loop {
            match self.derive_child_index(index) {
                Err(WalletError::InvalidChildKey) => index = next_index(index)?,
                result => return result,
            }
        }
    }

    fn derive_child_index(&self, index: u32) -> Result<Self, WalletError> {
        let depth = self.depth.checked_add(1).ok_or(WalletError::DepthOverflow)?;
        let parent_public = self.private_key.pub_key();

        // Hardened: 0x00 || ser256(k_par) || ser32(i)
        // Normal:   ser_P(K_par) || ser32(i)
        let mut data = Vec::with_capacity(1 + 33 + 4);
        if index >= HARDENED_OFFSET {
            data.push(0u8);
            data.extend_from_slice(&self.private_key.to_bytes());
        } else {
            data.extend_from_slice(&parent_public.to_compressed());
        }
        data.extend_from_slice(&index.to_be_bytes());

        let digest = sha512_hmac(&self.chain_code, &data);
        data.zeroize();

        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&digest[..32]);
        let private_key = self
            .private_key
            .add_tweak(&tweak)
            .map_err(|_| WalletError::InvalidChildKey)?;
        tweak.zeroize();

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);

        Ok(ExtendedPrivateKey {
            depth,
            parent_fingerprint: parent_public.fingerprint(),
            child_number: index,
            chain_code,
            private_key,
        })
    }

    /// Walks a whole derivation path from this key.
    ///
    /// The empty path returns a clone of this key.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, WalletError> {
        let mut key = self.clone();
        for &child in path.iter() {
            key = key.derive_child(child)?;
        }
        Ok(key)
    }

    /// Hash160 of the public key, identifying this key in the tree.
    pub fn identifier(&self) -> [u8; 20] {
        self.private_key.pub_key().hash160()
    }

    /// First four bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        self.private_key.pub_key().fingerprint()
    }

    /// Serializes to the 78-byte `xprv` Base58Check form.
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(SERIALIZED_LEN);
        payload.extend_from_slice(&XPRV_VERSION);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.push(0u8);
        payload.extend_from_slice(&self.private_key.to_bytes());
        let encoded = base58::check_encode(&payload);
        payload.zeroize();
        encoded
    }

    /// Parses an `xprv` Base58Check string.
    ///
    /// # Arguments
    ///
    /// * `encoded` - The Base58Check string.
    ///
    /// # Returns
    ///
    /// A `Result` containing the key, or a `WalletError` if the
    /// checksum, version, structure or key data is invalid.
    pub fn from_base58(encoded: &str) -> Result<Self, WalletError> {
        let data = base58::check_decode(encoded)?;
        let fields = KeyFields::split(&data, XPRV_VERSION)?;

        if data[45] != 0 {
            return Err(WalletError::InvalidExtendedKey(
                "private key field must start with a zero byte".to_string(),
            ));
        }
        let private_key = PrivateKey::from_bytes(&data[46..78]).map_err(|_| {
            WalletError::InvalidExtendedKey("private key scalar out of range".to_string())
        })?;

        Ok(ExtendedPrivateKey {
            depth: fields.depth,
            parent_fingerprint: fields.parent_fingerprint,
            child_number: fields.child_number,
            chain_code: fields.chain_code,
            private_key,
        })
    }
}

impl fmt::Display for ExtendedPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ExtendedPrivateKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, WalletError> {
        ExtendedPrivateKey::from_base58(s)
    }
}

impl Drop for ExtendedPrivateKey {
    fn drop(&mut self) {
        // The private key clears itself; the chain code is the other
        // secret half.
        self.chain_code.zeroize();
    }
}

impl ExtendedPublicKey {
    /// Derives one non-hardened child key.
    ///
    /// Hardened steps need the private parent and are rejected. An
    /// index whose tweak falls outside the scalar field is skipped in
    /// favor of the next one.
    pub fn derive_child(&self, child: ChildNumber) -> Result<Self, WalletError> {
        if child.is_hardened() {
            return Err(WalletError::HardenedFromPublic);
        }
        let mut index = child.to_index()?;
        loop {
            match self.derive_child_index(index) {
                Err(WalletError::InvalidChildKey) => index = next_index(index)?,
                result => return result,
            }
        }
    }

    fn derive_child_index(&self, index: u32) -> Result<Self, WalletError> {
        let depth = self.depth.checked_add(1).ok_or(WalletError::DepthOverflow)?;

        let mut data = Vec::with_capacity(33 + 4);
        data.extend_from_slice(&self.public_key.to_compressed());
        data.extend_from_slice(&index.to_be_bytes());

        let digest = sha512_hmac(&self.chain_code, &data);

        let mut tweak = [0u8; 32];
        tweak.copy_from_slice(&digest[..32]);
        let public_key = self
            .public_key
            .add_tweak(&tweak)
            .map_err(|_| WalletError::InvalidChildKey)?;

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&digest[32..]);

        Ok(ExtendedPublicKey {
            depth,
            parent_fingerprint: self.public_key.fingerprint(),
            child_number: index,
            chain_code,
            public_key,
        })
    }

    /// Walks a whole derivation path from this key.
    ///
    /// The empty path returns a clone of this key; any hardened step
    /// fails.
    pub fn derive_path(&self, path: &DerivationPath) -> Result<Self, WalletError> {
        let mut key = self.clone();
        for &child in path.iter() {
            key = key.derive_child(child)?;
        }
        Ok(key)
    }

    /// Hash160 of the public key, identifying this key in the tree.
    pub fn identifier(&self) -> [u8; 20] {
        self.public_key.hash160()
    }

    /// First four bytes of the identifier.
    pub fn fingerprint(&self) -> [u8; 4] {
        self.public_key.fingerprint()
    }

    /// Serializes to the 78-byte `xpub` Base58Check form.
    pub fn to_base58(&self) -> String {
        let mut payload = Vec::with_capacity(SERIALIZED_LEN);
        payload.extend_from_slice(&XPUB_VERSION);
        payload.push(self.depth);
        payload.extend_from_slice(&self.parent_fingerprint);
        payload.extend_from_slice(&self.child_number.to_be_bytes());
        payload.extend_from_slice(&self.chain_code);
        payload.extend_from_slice(&self.public_key.to_compressed());
        base58::check_encode(&payload)
    }

    /// Parses an `xpub` Base58Check string.
    ///
    /// # Arguments
    ///
    /// * `encoded` - The Base58Check string.
    ///
    /// # Returns
    ///
    /// A `Result` containing the key, or a `WalletError` if the
    /// checksum, version, structure or key data is invalid.
    pub fn from_base58(encoded: &str) -> Result<Self, WalletError> {
        let data = base58::check_decode(encoded)?;
        let fields = KeyFields::split(&data, XPUB_VERSION)?;

        let public_key = PublicKey::from_bytes(&data[45..78]).map_err(|_| {
            WalletError::InvalidExtendedKey("invalid public key data".to_string())
        })?;

        Ok(ExtendedPublicKey {
            depth: fields.depth,
            parent_fingerprint: fields.parent_fingerprint,
            child_number: fields.child_number,
            chain_code: fields.chain_code,
            public_key,
        })
    }
}

impl fmt::Display for ExtendedPublicKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for ExtendedPublicKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, WalletError> {
        ExtendedPublicKey::from_base58(s)
    }
}

/// Fixed-position fields shared by both serialized key forms.
struct KeyFields {
    depth: u8,
    parent_fingerprint: [u8; 4],
    child_number: u32,
    chain_code: [u8; 32],
}

impl KeyFields {
    /// Validates length, version and master-key consistency, then
    /// splits out the common fields.
    fn split(data: &[u8], version: [u8; 4]) -> Result<Self, WalletError> {
        if data.len() != SERIALIZED_LEN {
            return Err(WalletError::InvalidExtendedKey(format!(
                "expected {} bytes, got {}",
                SERIALIZED_LEN,
                data.len()
            )));
        }
        if data[..4] != version {
            return Err(WalletError::InvalidExtendedKey(
                "unknown version prefix".to_string(),
            ));
        }

        let depth = data[4];
        let mut parent_fingerprint = [0u8; 4];
        parent_fingerprint.copy_from_slice(&data[5..9]);
        let mut index_bytes = [0u8; 4];
        index_bytes.copy_from_slice(&data[9..13]);
        let child_number = u32::from_be_bytes(index_bytes);

        if depth == 0 && (parent_fingerprint != [0u8; 4] || child_number != 0) {
            return Err(WalletError::InvalidExtendedKey(
                "master key with non-zero parent fingerprint or child number".to_string(),
            ));
        }

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&data[13..45]);

        Ok(KeyFields {
            depth,
            parent_fingerprint,
            child_number,
            chain_code,
        })
    }
}

/// Steps to the next candidate index after a rejected tweak, refusing
/// to cross the hardened boundary.
fn next_index(index: u32) -> Result<u32, WalletError> {
    let next = index.checked_add(1).ok_or(WalletError::InvalidChildKey)?;
    if (next ^ index) & HARDENED_OFFSET != 0 {
        return Err(WalletError::InvalidChildKey);
    }
    Ok(next)
}
