use crypto_utils::ScalarError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Bip32Error {
    #[error("invalid BIP 32 path: {0:?} is not a valid index")]
    InvalidToken(String),

    #[error("invalid BIP 32 path: index {0} is negative")]
    NegativeIndex(String),

    #[error("invalid BIP 32 path: index {0} is too large")]
    IndexOutOfRange(String),

    #[error("expected a key of length {expected}, got length: {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("child {child_number:#010x} yields an invalid scalar, use the next index")]
    CurveOverflow { child_number: u32 },

    #[error("private key is not a valid curve scalar")]
    InvalidKeyData,

    #[error("invalid BIP 44 path: {0}")]
    InvalidBip44Path(String),

    #[error("scalar arithmetic failed: {0}")]
    Scalar(#[from] ScalarError),

    #[error("invalid derivation config: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Bip32Error>;
