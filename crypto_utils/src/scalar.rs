//! Modular arithmetic over 256-bit big-endian scalars.

use num_bigint::BigUint;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScalarError {
    #[error("modulus must be non-zero")]
    ZeroModulus,
}

/// Computes `(a + b) mod n`, all operands read as unsigned big-endian integers.
///
/// The result is left-zero-padded to 32 bytes. Since `n` itself is 32 bytes
/// wide, the reduced value always fits.
pub fn add_mod(a: &[u8; 32], b: &[u8; 32], n: &[u8; 32]) -> Result<[u8; 32], ScalarError> {
    if n.iter().all(|&byte| byte == 0) {
        return Err(ScalarError::ZeroModulus);
    }
    let n = BigUint::from_bytes_be(n);
    let sum = BigUint::from_bytes_be(a) + BigUint::from_bytes_be(b);
    Ok(to_be_bytes_32(&(sum % n)))
}

/// Left-pads the big-endian encoding of `x` to 32 bytes. `x` must be below 2^256.
fn to_be_bytes_32(x: &BigUint) -> [u8; 32] {
    let bytes = x.to_bytes_be();
    let mut out = [0u8; 32];
    out[32 - bytes.len()..].copy_from_slice(&bytes);
    out
}
