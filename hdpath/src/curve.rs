//! Elliptic-curve capability consumed by child derivation.
//!
//! Derivation only needs two things from the curve: its group order, for
//! reducing child scalars, and the compressed public point of a private key,
//! for non-hardened steps. Both sit behind [`Curve`] so the derivation logic
//! can be exercised against a stand-in.

use crate::{Bip32Error, error::Result, extended_key::PrivateKey};
use secp256k1::{PublicKey, Secp256k1, SecretKey, constants::CURVE_ORDER};

/// Length of a SEC1 compressed public key.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;

pub trait Curve {
    /// Group order `N`, big-endian.
    fn order(&self) -> [u8; 32];

    /// Maps a private scalar to its 33-byte compressed public point.
    fn compressed_public_key(
        &self,
        private_key: &PrivateKey,
    ) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN]>;
}

/// secp256k1 backed by libsecp256k1.
pub struct Secp256k1Curve {
    secp: Secp256k1<secp256k1::All>,
}

impl Secp256k1Curve {
    pub fn new() -> Self {
        Secp256k1Curve {
            secp: Secp256k1::new(),
        }
    }
}

impl Default for Secp256k1Curve {
    fn default() -> Self {
        Self::new()
    }
}

impl Curve for Secp256k1Curve {
    fn order(&self) -> [u8; 32] {
        CURVE_ORDER
    }

    fn compressed_public_key(
        &self,
        private_key: &PrivateKey,
    ) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN]> {
        let sk =
            SecretKey::from_slice(private_key.as_bytes()).map_err(|_| Bip32Error::InvalidKeyData)?;
        Ok(PublicKey::from_secret_key(&self.secp, &sk).serialize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn secp256k1_order() {
        assert_eq!(
            Secp256k1Curve::new().order(),
            hex!("fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141")
        );
    }

    #[test]
    fn generator_point() {
        let mut one = [0u8; 32];
        one[31] = 1;
        let pk = Secp256k1Curve::new()
            .compressed_public_key(&PrivateKey::from_bytes(one))
            .unwrap();
        assert_eq!(
            pk,
            hex!("0279be667ef9dcbbac55a06295ce870b07029bfcdb2dce28d959f2815b16f81798")
        );
    }

    #[test]
    fn master_public_key_vector1() {
        let sk = PrivateKey::from_bytes(hex!(
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        ));
        assert_eq!(
            Secp256k1Curve::new().compressed_public_key(&sk).unwrap(),
            hex!("0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2")
        );
    }

    #[test]
    fn rejects_zero_and_order() {
        let curve = Secp256k1Curve::new();
        assert_eq!(
            curve.compressed_public_key(&PrivateKey::from_bytes([0u8; 32])),
            Err(Bip32Error::InvalidKeyData)
        );
        assert_eq!(
            curve.compressed_public_key(&PrivateKey::from_bytes(CURVE_ORDER)),
            Err(Bip32Error::InvalidKeyData)
        );
    }
}
