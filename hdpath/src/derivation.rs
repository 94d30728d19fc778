use crate::{
    Bip32Error,
    config::IndexPolicy,
    curve::Curve,
    error::Result,
    extended_key::{ChainCode, ExtendedKey, PrivateKey},
};
use std::fmt;
use std::str::FromStr;

/// Index offset for hardened children, 2³¹.
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

// Normal child indices: 0 to 2³¹-1
// Hardened child indices: 2³¹ (0x8000_0000) to 2³²-1

/// One step of a derivation path.
///
/// `index` is kept apart from the hardening flag; [`child_number`] combines
/// them into the value serialized into the HMAC message.
///
/// [`child_number`]: DerivationSegment::child_number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DerivationSegment {
    pub index: u32,
    pub hardened: bool,
}

impl DerivationSegment {
    pub fn new(index: u32, hardened: bool) -> Self {
        DerivationSegment { index, hardened }
    }

    pub fn hardened(index: u32) -> Self {
        Self::new(index, true)
    }

    pub fn normal(index: u32) -> Self {
        Self::new(index, false)
    }

    /// Rejects an index the policy does not allow, as the parser would.
    pub fn check(self, policy: IndexPolicy) -> Result<Self> {
        if policy.allows(u64::from(self.index)) {
            Ok(self)
        } else {
            Err(Bip32Error::IndexOutOfRange(self.to_string()))
        }
    }

    pub fn child_number(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for DerivationSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

/// A BIP-32 derivation path, root to leaf (e.g., "44'/996'/0'/0/0").
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DerivationPath(pub Vec<DerivationSegment>);

impl DerivationPath {
    /// Parses a path such as "44'/996'/0'/0/0" or "m/0h/1".
    ///
    /// A token is a base-10 integer, optionally followed by `'`, `h` or `H`
    /// to mark hardened derivation. `policy` decides what happens to indices
    /// that reach into the hardened range.
    pub fn parse_with(s: &str, policy: IndexPolicy) -> Result<Self> {
        let body = if s == "m" || s == "M" {
            return Ok(DerivationPath::default());
        } else if let Some(stripped) = s.strip_prefix("m/").or_else(|| s.strip_prefix("M/")) {
            stripped
        } else {
            s
        };

        let segments = body
            .split('/')
            .map(|token| parse_segment(token, policy))
            .collect::<Result<Vec<_>>>()?;
        log::debug!("parsed BIP 32 path with {} segments", segments.len());
        Ok(DerivationPath(segments))
    }

    pub fn segments(&self) -> &[DerivationSegment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Child numbers as they enter the HMAC message, hardening bit included.
    pub fn child_numbers(&self) -> Vec<u32> {
        self.0.iter().map(DerivationSegment::child_number).collect()
    }

    /// Checks every segment against `policy`.
    pub fn validate(&self, policy: IndexPolicy) -> Result<()> {
        for segment in &self.0 {
            segment.check(policy)?;
        }
        Ok(())
    }

    /// Folds child derivation over the path starting at `root`, with
    /// [`IndexPolicy::Strict`].
    pub fn derive<C: Curve>(&self, curve: &C, root: &ExtendedKey) -> Result<ExtendedKey> {
        self.derive_with(curve, root, IndexPolicy::Strict)
    }

    /// Validates the whole path against `policy`, then folds child derivation
    /// over it. Stops at the first failing step; no partial result is returned.
    pub fn derive_with<C: Curve>(
        &self,
        curve: &C,
        root: &ExtendedKey,
        policy: IndexPolicy,
    ) -> Result<ExtendedKey> {
        self.validate(policy)?;
        self.0
            .iter()
            .try_fold(root.clone(), |key, &segment| key.derive_child(curve, segment))
    }
}

fn parse_segment(token: &str, policy: IndexPolicy) -> Result<DerivationSegment> {
    let (digits, hardened) = match token.strip_suffix(|c: char| matches!(c, '\'' | 'h' | 'H')) {
        Some(stripped) => (stripped, true),
        None => (token, false),
    };

    let value: i64 = digits
        .parse()
        .map_err(|_| Bip32Error::InvalidToken(token.to_string()))?;
    if value < 0 {
        return Err(Bip32Error::NegativeIndex(token.to_string()));
    }

    if !policy.allows(value as u64) {
        return Err(Bip32Error::IndexOutOfRange(token.to_string()));
    }

    Ok(DerivationSegment::new(value as u32, hardened))
}

impl FromStr for DerivationPath {
    type Err = Bip32Error;

    /// Parses with [`IndexPolicy::Strict`].
    fn from_str(s: &str) -> Result<Self> {
        Self::parse_with(s, IndexPolicy::Strict)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "m");
        }
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl From<Vec<DerivationSegment>> for DerivationPath {
    fn from(segments: Vec<DerivationSegment>) -> Self {
        DerivationPath(segments)
    }
}

/// Derives the private key at `path` below `(private_key, chain_code)`.
pub fn derive_private_key_for_path<C: Curve>(
    curve: &C,
    private_key: &PrivateKey,
    chain_code: &ChainCode,
    path: &str,
) -> Result<PrivateKey> {
    let path: DerivationPath = path.parse()?;
    let root = ExtendedKey::new(private_key.clone(), chain_code.clone());
    Ok(path.derive(curve, &root)?.private_key.clone())
}
