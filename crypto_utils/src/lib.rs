pub mod hmac;
pub mod scalar;

pub use scalar::{ScalarError, add_mod};
