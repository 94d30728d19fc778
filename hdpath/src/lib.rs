//! BIP-32 / BIP-44 hierarchical deterministic private key derivation.
//!
//! A seed yields a master [`ExtendedKey`]; a [`DerivationPath`] (or a
//! [`Bip44Params`]) is then folded over it one child at a time. Curve
//! arithmetic comes from a [`Curve`] backend, secp256k1 by default.

pub mod bip44;
pub mod config;
pub mod curve;
pub mod derivation;
pub mod error;
pub mod extended_key;
pub mod keychain;

pub use bip44::{BIP44_PREFIX, Bip44Params, FULL_FUNDRAISER_PATH};
pub use config::{DerivationConfig, IndexPolicy};
pub use curve::{Curve, Secp256k1Curve};
pub use derivation::{
    DerivationPath, DerivationSegment, HARDENED_OFFSET, derive_private_key_for_path,
};
pub use error::Bip32Error;
pub use extended_key::{ChainCode, ExtendedKey, PrivateKey, compute_masters_from_seed};
pub use keychain::Keychain;
