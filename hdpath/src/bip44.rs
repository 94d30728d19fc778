use crate::{
    Bip32Error,
    derivation::{DerivationPath, DerivationSegment},
    error::Result,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub const FUNDRAISER_PURPOSE: u32 = 44;
pub const FUNDRAISER_COIN_TYPE: u32 = 996;

/// Parts of the path fixed by the fundraiser.
pub const BIP44_PREFIX: &str = "44'/996'/";
pub const FULL_FUNDRAISER_PATH: &str = "44'/996'/0'/0/0";

/// BIP-44 parameters, a 5-level BIP-32 path:
/// `purpose' / coin_type' / account' / change / address_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bip44Params {
    pub purpose: u32,
    pub coin_type: u32,
    pub account: u32,
    pub change: bool,
    pub address_index: u32,
}

impl Bip44Params {
    pub fn new(
        purpose: u32,
        coin_type: u32,
        account: u32,
        change: bool,
        address_index: u32,
    ) -> Self {
        Bip44Params {
            purpose,
            coin_type,
            account,
            change,
            address_index,
        }
    }

    /// `44' / 996' / account' / 0 / address_index`
    pub fn fundraiser(account: u32, address_index: u32) -> Self {
        Self::new(
            FUNDRAISER_PURPOSE,
            FUNDRAISER_COIN_TYPE,
            account,
            false,
            address_index,
        )
    }

    /// Raw field values, change as 0 or 1, without hardening bits.
    pub fn derivation_path(&self) -> [u32; 5] {
        [
            self.purpose,
            self.coin_type,
            self.account,
            self.change as u32,
            self.address_index,
        ]
    }

    /// Segments for this account, unchecked. Fields at or above 2³¹ only
    /// derive under [`IndexPolicy::Permissive`].
    ///
    /// [`IndexPolicy::Permissive`]: crate::config::IndexPolicy::Permissive
    pub fn to_segments(&self) -> DerivationPath {
        DerivationPath(vec![
            DerivationSegment::hardened(self.purpose),
            DerivationSegment::hardened(self.coin_type),
            DerivationSegment::hardened(self.account),
            DerivationSegment::normal(self.change as u32),
            DerivationSegment::normal(self.address_index),
        ])
    }
}

impl fmt::Display for Bip44Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}'/{}'/{}'/{}/{}",
            self.purpose, self.coin_type, self.account, self.change as u8, self.address_index
        )
    }
}

impl FromStr for Bip44Params {
    type Err = Bip32Error;

    fn from_str(s: &str) -> Result<Self> {
        let path: DerivationPath = s.parse()?;
        let [purpose, coin_type, account, change, address_index] = path.segments() else {
            return Err(Bip32Error::InvalidBip44Path(format!(
                "expected 5 levels, got {}",
                path.len()
            )));
        };

        if !(purpose.hardened && coin_type.hardened && account.hardened) {
            return Err(Bip32Error::InvalidBip44Path(
                "purpose, coin type and account must be hardened".into(),
            ));
        }
        if change.hardened || address_index.hardened {
            return Err(Bip32Error::InvalidBip44Path(
                "change and address index must not be hardened".into(),
            ));
        }
        let change = match change.index {
            0 => false,
            1 => true,
            other => {
                return Err(Bip32Error::InvalidBip44Path(format!(
                    "change must be 0 or 1, got {}",
                    other
                )));
            }
        };

        Ok(Bip44Params::new(
            purpose.index,
            coin_type.index,
            account.index,
            change,
            address_index.index,
        ))
    }
}
