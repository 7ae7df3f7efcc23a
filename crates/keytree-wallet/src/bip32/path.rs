//! Derivation path notation.
//!
//! A path such as `m/44'/0'/0'/0/0` is a list of child steps walked
//! from a root key. An apostrophe (or `h`/`H`) marks a hardened step.

use std::fmt;
use std::str::FromStr;

use super::HARDENED_OFFSET;
use crate::WalletError;

/// One step of a derivation path.
///
/// The wrapped index is the plain value shown in path notation, always
/// below 2^31; hardened steps add [`HARDENED_OFFSET`] when serialized.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ChildNumber {
    /// A non-hardened child, derivable from the public parent.
    Normal(u32),
    /// A hardened child, derivable only from the private parent.
    Hardened(u32),
}

impl ChildNumber {
    /// Whether this step requires the private parent key.
    pub fn is_hardened(&self) -> bool {
        matches!(self, ChildNumber::Hardened(_))
    }

    /// Serialized index: the plain index, plus 2^31 when hardened.
    ///
    /// Fails if the plain index is itself 2^31 or more, which would
    /// collide with the hardened range.
    pub fn to_index(self) -> Result<u32, WalletError> {
        match self {
            ChildNumber::Normal(index) if index < HARDENED_OFFSET => Ok(index),
            ChildNumber::Hardened(index) if index < HARDENED_OFFSET => {
                Ok(index + HARDENED_OFFSET)
            }
            ChildNumber::Normal(index) | ChildNumber::Hardened(index) => Err(
                WalletError::InvalidPath(format!("child index {} exceeds 2^31 - 1", index)),
            ),
        }
    }

    /// Classifies a serialized index back into a path step.
    pub fn from_index(index: u32) -> Self {
        if index >= HARDENED_OFFSET {
            ChildNumber::Hardened(index - HARDENED_OFFSET)
        } else {
            ChildNumber::Normal(index)
        }
    }
}

impl fmt::Display for ChildNumber {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChildNumber::Normal(index) => write!(f, "{}", index),
            ChildNumber::Hardened(index) => write!(f, "{}'", index),
        }
    }
}

impl FromStr for ChildNumber {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, WalletError> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(prefix) => (prefix, true),
            None => (s, false),
        };
        let index: u32 = digits.parse().map_err(|_| {
            WalletError::InvalidPath(format!("invalid path component {:?}", s))
        })?;
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "child index {} exceeds 2^31 - 1",
                index
            )));
        }
        Ok(if hardened {
            ChildNumber::Hardened(index)
        } else {
            ChildNumber::Normal(index)
        })
    }
}

/// An ordered list of child steps from a root key.
///
/// The empty path (`m`) denotes the root itself.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(Vec<ChildNumber>);

impl DerivationPath {
    /// The standard five-level BIP-44 path
    /// `m/44'/coin_type'/account'/change/address_index`.
    pub fn bip44(coin_type: u32, account: u32, change: u32, address_index: u32) -> Self {
        DerivationPath(vec![
            ChildNumber::Hardened(44),
            ChildNumber::Hardened(coin_type),
            ChildNumber::Hardened(account),
            ChildNumber::Normal(change),
            ChildNumber::Normal(address_index),
        ])
    }

    /// Iterates over the steps in derivation order.
    pub fn iter(&self) -> std::slice::Iter<'_, ChildNumber> {
        self.0.iter()
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the empty path `m`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<ChildNumber>> for DerivationPath {
    fn from(steps: Vec<ChildNumber>) -> Self {
        DerivationPath(steps)
    }
}

impl AsRef<[ChildNumber]> for DerivationPath {
    fn as_ref(&self) -> &[ChildNumber] {
        &self.0
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "m")?;
        for child in &self.0 {
            write!(f, "/{}", child)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, WalletError> {
        let mut parts = s.split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(WalletError::InvalidPath(
                    "path must begin with 'm'".to_string(),
                ))
            }
        }

        let mut steps = Vec::new();
        for part in parts {
            steps.push(part.parse::<ChildNumber>()?);
        }
        Ok(DerivationPath(steps))
    }
}
