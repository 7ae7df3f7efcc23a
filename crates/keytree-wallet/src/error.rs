/// Unified error type for wallet derivation operations.
///
/// Covers errors from mnemonic encoding, seed stretching, extended key
/// derivation, and address encoding. Messages never contain key
/// material.
#[derive(Debug, thiserror::Error)]
pub enum WalletError {
    #[error("invalid entropy strength: {0} bits")]
    InvalidStrength(usize),

    #[error("invalid mnemonic word count: {0}")]
    BadWordCount(usize),

    #[error("mnemonic word at position {0} is not in the wordlist")]
    UnknownWord(usize),

    #[error("mnemonic checksum mismatch")]
    BadChecksum,

    #[error("invalid seed length: {0} bytes")]
    InvalidSeedLength(usize),

    #[error("seed produced an out-of-range master key")]
    InvalidMasterKey,

    #[error("child key derivation produced an invalid key")]
    InvalidChildKey,

    #[error("hardened derivation requires a private parent key")]
    HardenedFromPublic,

    #[error("derivation depth exceeds 255")]
    DepthOverflow,

    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("invalid extended key encoding: {0}")]
    InvalidExtendedKey(String),

    #[error("unsupported coin type: {0}")]
    UnsupportedCoin(u32),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("primitives error: {0}")]
    Primitives(#[from] keytree_primitives::PrimitivesError),
}
