use crate::{
    Bip32Error,
    curve::Curve,
    derivation::DerivationSegment,
    error::Result,
};
use crypto_utils::{hmac::hmac_sha512_split, scalar::add_mod};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// HMAC key used to derive the master node from a seed.
pub const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// A 32-byte big-endian private scalar.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey([u8; 32]);

/// 32 bytes of chain entropy, used as the HMAC key for the next level.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct ChainCode([u8; 32]);

macro_rules! impl_key_bytes {
    ($ty:ident, $name:literal) => {
        impl $ty {
            pub const LEN: usize = 32;

            pub fn from_bytes(bytes: [u8; 32]) -> Self {
                $ty(bytes)
            }

            pub fn from_slice(bytes: &[u8]) -> Result<Self> {
                let arr: [u8; 32] = bytes.try_into().map_err(|_| Bip32Error::LengthMismatch {
                    expected: Self::LEN,
                    actual: bytes.len(),
                })?;
                Ok($ty(arr))
            }

            pub fn from_hex(s: &str) -> Result<Self> {
                let bytes = Zeroizing::new(
                    hex::decode(s).map_err(|_| Bip32Error::InvalidKeyData)?,
                );
                Self::from_slice(&bytes)
            }

            pub fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }

            pub fn to_hex(&self) -> String {
                hex::encode(self.0)
            }
        }

        impl fmt::Debug for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(concat!($name, "(<redacted>)"))
            }
        }
    };
}

impl_key_bytes!(PrivateKey, "PrivateKey");
impl_key_bytes!(ChainCode, "ChainCode");

/// A private key together with its chain code: one node of the key tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtendedKey {
    pub private_key: PrivateKey,
    pub chain_code: ChainCode,
}

impl ExtendedKey {
    pub fn new(private_key: PrivateKey, chain_code: ChainCode) -> Self {
        ExtendedKey {
            private_key,
            chain_code,
        }
    }

    /// Master node from a seed: `I = HMAC-SHA512("Bitcoin seed", seed)`,
    /// key = IL, chain code = IR.
    ///
    /// Any seed length is accepted.
    pub fn new_master(seed: &[u8]) -> Self {
        let (il, ir) = hmac_sha512_split(MASTER_HMAC_KEY, seed);
        ExtendedKey {
            private_key: PrivateKey(il),
            chain_code: ChainCode(ir),
        }
    }

    /// Child key derivation for private keys (CKDpriv).
    pub fn derive_child<C: Curve>(&self, curve: &C, segment: DerivationSegment) -> Result<Self> {
        let child_number = segment.child_number();

        // Hardened: 0x00 || ser256(k) || ser32(i)
        // Normal:   serP(point(k)) || ser32(i)
        let mut data = Zeroizing::new([0u8; 37]);
        if segment.hardened {
            data[1..33].copy_from_slice(self.private_key.as_bytes());
        } else {
            let parent_pub = curve.compressed_public_key(&self.private_key)?;
            data[..33].copy_from_slice(&parent_pub);
        }
        data[33..].copy_from_slice(&child_number.to_be_bytes());

        let (il, ir) = hmac_sha512_split(self.chain_code.as_bytes(), &data[..]);
        let il = Zeroizing::new(il);

        // IL >= N or a zero child key makes this index unusable
        let order = curve.order();
        if *il >= order {
            return Err(Bip32Error::CurveOverflow { child_number });
        }
        let child_key = add_mod(self.private_key.as_bytes(), &il, &order)?;
        if child_key == [0u8; 32] {
            return Err(Bip32Error::CurveOverflow { child_number });
        }

        log::trace!("derived child {}", segment);
        Ok(ExtendedKey {
            private_key: PrivateKey(child_key),
            chain_code: ChainCode(ir),
        })
    }
}

/// Returns the master private key and chain code for `seed`.
pub fn compute_masters_from_seed(seed: &[u8]) -> (PrivateKey, ChainCode) {
    let master = ExtendedKey::new_master(seed);
    (master.private_key.clone(), master.chain_code.clone())
}
