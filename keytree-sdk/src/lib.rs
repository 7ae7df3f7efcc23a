#![deny(missing_docs)]

//! Keytree SDK - Complete SDK.
//!
//! Re-exports all Keytree SDK components for convenient single-crate
//! usage.

pub use keytree_primitives as primitives;
pub use keytree_wallet as wallet;
