//! BIP-39 mnemonic sentences and seed derivation.
//!
//! Converts entropy to and from mnemonic sentences over the English
//! wordlist, and stretches a sentence into a 64-byte seed with
//! PBKDF2-HMAC-SHA512.

mod wordlist;

pub use wordlist::WORDLIST_LEN;

use rand::rngs::OsRng;
use rand::RngCore;
use unicode_normalization::UnicodeNormalization;

use keytree_primitives::hash::{pbkdf2_hmac_sha512, sha256};

use crate::WalletError;

/// Accepted entropy strengths in bits.
const VALID_ENTROPY_BITS: [usize; 5] = [128, 160, 192, 224, 256];

/// PBKDF2 iteration count for seed stretching.
pub const PBKDF2_ROUNDS: u32 = 2048;

/// Seed stretching salt prefix; the passphrase is appended to it.
const SALT_PREFIX: &str = "mnemonic";

/// Bits encoded by each mnemonic word.
const BITS_PER_WORD: usize = 11;

/// Draws fresh entropy of the given strength from the OS generator.
///
/// # Arguments
///
/// * `bits` - Entropy strength; one of 128, 160, 192, 224 or 256.
///
/// # Returns
///
/// A `Result` containing `bits / 8` random bytes, or a `WalletError`
/// if the strength is not an accepted value.
pub fn generate_entropy(bits: usize) -> Result<Vec<u8>, WalletError> {
    if !VALID_ENTROPY_BITS.contains(&bits) {
        return Err(WalletError::InvalidStrength(bits));
    }

    let mut entropy = vec![0u8; bits / 8];
    OsRng.fill_bytes(&mut entropy);
    Ok(entropy)
}

/// Encodes entropy as a mnemonic sentence.
///
/// A checksum of `len / 32` bits, taken from the front of the SHA-256
/// digest of the entropy, is appended before the bits are split into
/// 11-bit groups indexing the wordlist.
///
/// # Arguments
///
/// * `entropy` - 16, 20, 24, 28 or 32 bytes of entropy.
///
/// # Returns
///
/// A `Result` containing the space-separated sentence, or a
/// `WalletError` if the entropy length is not an accepted strength.
pub fn entropy_to_mnemonic(entropy: &[u8]) -> Result<String, WalletError> {
    let bits = entropy.len() * 8;
    if !VALID_ENTROPY_BITS.contains(&bits) {
        return Err(WalletError::InvalidStrength(bits));
    }

    let checksum_bits = bits / 32;
    let word_count = (bits + checksum_bits) / BITS_PER_WORD;

    // Entropy followed by the checksum byte; at most 8 checksum bits
    // are ever read, so one byte of the digest is enough.
    let mut stream = Vec::with_capacity(entropy.len() + 1);
    stream.extend_from_slice(entropy);
    stream.push(sha256(entropy)[0]);

    let mut words = Vec::with_capacity(word_count);
    for group in 0..word_count {
        words.push(wordlist::WORDS[index_at(&stream, group * BITS_PER_WORD)]);
    }
    Ok(words.join(" "))
}

/// Decodes a mnemonic sentence back into its entropy.
///
/// # Arguments
///
/// * `mnemonic` - A sentence of 12, 15, 18, 21 or 24 words separated
///   by whitespace.
///
/// # Returns
///
/// A `Result` containing the entropy bytes, or a `WalletError` if the
/// word count is wrong, a word is not in the wordlist, or the checksum
/// does not match.
pub fn mnemonic_to_entropy(mnemonic: &str) -> Result<Vec<u8>, WalletError> {
    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    if !matches!(words.len(), 12 | 15 | 18 | 21 | 24) {
        return Err(WalletError::BadWordCount(words.len()));
    }

    let total_bits = words.len() * BITS_PER_WORD;
    let checksum_bits = total_bits / 33;
    let entropy_bits = total_bits - checksum_bits;

    let mut stream = vec![0u8; (total_bits + 7) / 8];
    for (word_pos, word) in words.iter().enumerate() {
        let index =
            wordlist::index_of(word).ok_or(WalletError::UnknownWord(word_pos))?;
        for bit in 0..BITS_PER_WORD {
            if index & (1 << (BITS_PER_WORD - 1 - bit)) != 0 {
                let pos = word_pos * BITS_PER_WORD + bit;
                stream[pos / 8] |= 1 << (7 - (pos % 8));
            }
        }
    }

    let entropy = stream[..entropy_bits / 8].to_vec();

    // The entropy length is a whole number of bytes, so the checksum
    // bits sit at the top of the next byte.
    let actual = stream[entropy_bits / 8] >> (8 - checksum_bits);
    let expected = sha256(&entropy)[0] >> (8 - checksum_bits);
    if actual != expected {
        return Err(WalletError::BadChecksum);
    }

    Ok(entropy)
}

/// Reports whether a sentence decodes cleanly, checksum included.
pub fn validate_mnemonic(mnemonic: &str) -> bool {
    mnemonic_to_entropy(mnemonic).is_ok()
}

/// Stretches a mnemonic sentence into a 64-byte seed.
///
/// Both inputs are NFKD-normalized and the sentence's whitespace is
/// collapsed to single spaces before PBKDF2-HMAC-SHA512 runs for
/// [`PBKDF2_ROUNDS`] iterations over the salt `"mnemonic" +
/// passphrase`. The sentence is not validated; any string stretches
/// to a seed.
///
/// # Arguments
///
/// * `mnemonic` - The mnemonic sentence.
/// * `passphrase` - Optional extra secret; pass `""` for none.
///
/// # Returns
///
/// The 64-byte seed.
pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> [u8; 64] {
    let mnemonic_norm = normalize_mnemonic(mnemonic);
    let passphrase_norm: String = passphrase.nfkd().collect();
    let salt = format!("{}{}", SALT_PREFIX, passphrase_norm);
    pbkdf2_hmac_sha512(mnemonic_norm.as_bytes(), salt.as_bytes(), PBKDF2_ROUNDS)
}

/// NFKD-normalizes a sentence and collapses its whitespace.
fn normalize_mnemonic(mnemonic: &str) -> String {
    let decomposed: String = mnemonic.nfkd().collect();
    decomposed.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Reads the 11-bit group starting at `bit_offset`, MSB first.
fn index_at(stream: &[u8], bit_offset: usize) -> usize {
    let mut index = 0usize;
    for bit in bit_offset..bit_offset + BITS_PER_WORD {
        index <<= 1;
        if stream[bit / 8] & (1 << (7 - (bit % 8))) != 0 {
            index |= 1;
        }
    }
    index
}
