//! Derivation settings, loadable from TOML.
//!
//! ```toml
//! index_policy = "permissive"
//! ```

use crate::{Bip32Error, derivation::HARDENED_OFFSET, error::Result};
use serde::{Deserialize, Serialize};

/// How the path parser treats indices at or above 2³¹.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexPolicy {
    /// Reject them, so the hardening bit never aliases an index.
    #[default]
    Strict,
    /// Accept anything that fits in a u32. The hardening bit is OR-ed in, so
    /// `2147483653'` and `5'` name the same child.
    Permissive,
}

impl IndexPolicy {
    /// Whether `index` may name a child under this policy.
    pub fn allows(self, index: u64) -> bool {
        match self {
            IndexPolicy::Strict => index < u64::from(HARDENED_OFFSET),
            IndexPolicy::Permissive => index <= u64::from(u32::MAX),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivationConfig {
    pub index_policy: IndexPolicy,
}

impl DerivationConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| Bip32Error::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| Bip32Error::Config(e.to_string()))
    }
}
