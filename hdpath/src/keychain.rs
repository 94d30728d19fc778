use crate::{
    bip44::Bip44Params,
    config::DerivationConfig,
    curve::{COMPRESSED_PUBLIC_KEY_LEN, Curve, Secp256k1Curve},
    derivation::{DerivationPath, DerivationSegment},
    error::Result,
    extended_key::{ChainCode, ExtendedKey, PrivateKey},
};

/// Derivation entry point binding a curve backend to a [`DerivationConfig`].
///
/// Holds no key material; every call takes its inputs and returns owned
/// outputs, so one keychain can serve concurrent callers.
pub struct Keychain<C: Curve = Secp256k1Curve> {
    curve: C,
    config: DerivationConfig,
}

impl Keychain<Secp256k1Curve> {
    pub fn secp256k1(config: DerivationConfig) -> Self {
        Keychain::new(Secp256k1Curve::new(), config)
    }
}

impl Default for Keychain<Secp256k1Curve> {
    fn default() -> Self {
        Keychain::secp256k1(DerivationConfig::default())
    }
}

impl<C: Curve> Keychain<C> {
    pub fn new(curve: C, config: DerivationConfig) -> Self {
        Keychain { curve, config }
    }

    pub fn curve(&self) -> &C {
        &self.curve
    }

    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    pub fn master(&self, seed: &[u8]) -> ExtendedKey {
        ExtendedKey::new_master(seed)
    }

    pub fn parse_path(&self, path: &str) -> Result<DerivationPath> {
        DerivationPath::parse_with(path, self.config.index_policy)
    }

    pub fn derive_child(
        &self,
        parent: &ExtendedKey,
        segment: DerivationSegment,
    ) -> Result<ExtendedKey> {
        parent.derive_child(&self.curve, segment.check(self.config.index_policy)?)
    }

    fn derive_from(&self, path: &DerivationPath, root: &ExtendedKey) -> Result<ExtendedKey> {
        path.derive_with(&self.curve, root, self.config.index_policy)
    }

    pub fn derive_private_key_for_path(
        &self,
        private_key: &PrivateKey,
        chain_code: &ChainCode,
        path: &str,
    ) -> Result<PrivateKey> {
        let path = self.parse_path(path)?;
        let root = ExtendedKey::new(private_key.clone(), chain_code.clone());
        Ok(self.derive_from(&path, &root)?.private_key.clone())
    }

    /// Seed to the node at `path` in one go.
    pub fn derive_path(&self, seed: &[u8], path: &str) -> Result<ExtendedKey> {
        let path = self.parse_path(path)?;
        self.derive_from(&path, &self.master(seed))
    }

    pub fn derive_bip44(&self, seed: &[u8], params: &Bip44Params) -> Result<ExtendedKey> {
        log::debug!(
            "deriving BIP 44 account {} index {}",
            params.account,
            params.address_index
        );
        self.derive_from(&params.to_segments(), &self.master(seed))
    }

    pub fn public_key(
        &self,
        private_key: &PrivateKey,
    ) -> Result<[u8; COMPRESSED_PUBLIC_KEY_LEN]> {
        self.curve.compressed_public_key(private_key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bip32Error, config::IndexPolicy, derivation::HARDENED_OFFSET};
    use hex_literal::hex;

    const SEED: [u8; 16] = hex!("000102030405060708090a0b0c0d0e0f");

    fn keychain() -> Keychain {
        Keychain::default()
    }

    #[test]
    fn path_and_bip44_agree() {
        let keychain = keychain();
        let params = Bip44Params::fundraiser(0, 3);
        let via_params = keychain.derive_bip44(&SEED, &params).unwrap();
        let via_string = keychain.derive_path(&SEED, &params.to_string()).unwrap();
        assert_eq!(via_params, via_string);
    }

    #[test]
    fn rederivation_is_idempotent() {
        let keychain = keychain();
        let a = keychain.derive_path(&SEED, "44'/996'/0'/0/0").unwrap();
        let b = keychain.derive_path(&SEED, "44'/996'/0'/0/0").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn policy_is_applied() {
        let strict = keychain();
        assert_eq!(
            strict.parse_path("2147483653").unwrap_err(),
            Bip32Error::IndexOutOfRange("2147483653".into())
        );

        let permissive = Keychain::secp256k1(DerivationConfig {
            index_policy: IndexPolicy::Permissive,
        });
        let aliased = permissive.derive_path(&SEED, "2147483653'").unwrap();
        let hardened = permissive.derive_path(&SEED, "5'").unwrap();
        assert_eq!(aliased, hardened);

        // Without the marker the step stays non-hardened, only the serialized
        // index carries the top bit
        let plain = permissive.derive_path(&SEED, "2147483653").unwrap();
        assert_ne!(plain, hardened);
        assert_eq!(
            permissive.parse_path("2147483653").unwrap().child_numbers(),
            vec![HARDENED_OFFSET + 5]
        );
    }

    #[test]
    fn bip44_respects_policy() {
        let wide = Bip44Params::new(44, 996, HARDENED_OFFSET + 5, false, 0);
        assert_eq!(
            keychain().derive_bip44(&SEED, &wide),
            Err(Bip32Error::IndexOutOfRange("2147483653'".into()))
        );
        assert_eq!(
            keychain().derive_path(&SEED, &wide.to_string()),
            Err(Bip32Error::IndexOutOfRange("2147483653'".into()))
        );

        let permissive = Keychain::secp256k1(DerivationConfig {
            index_policy: IndexPolicy::Permissive,
        });
        let aliased = permissive.derive_bip44(&SEED, &wide).unwrap();
        let small = permissive
            .derive_bip44(&SEED, &Bip44Params::new(44, 996, 5, false, 0))
            .unwrap();
        assert_eq!(aliased, small);
        assert_eq!(
            permissive.derive_path(&SEED, &wide.to_string()).unwrap(),
            aliased
        );
    }

    #[test]
    fn derive_child_respects_policy() {
        let m = keychain().master(&SEED);
        assert_eq!(
            keychain().derive_child(&m, DerivationSegment::normal(HARDENED_OFFSET)),
            Err(Bip32Error::IndexOutOfRange("2147483648".into()))
        );
        assert!(keychain().derive_child(&m, DerivationSegment::hardened(0)).is_ok());
    }

    #[test]
    fn private_key_for_path_matches_vector1() {
        let keychain = keychain();
        let m = keychain.master(&SEED);
        let key = keychain
            .derive_private_key_for_path(
                &m.private_key,
                &m.chain_code,
                "0'/1/2'/2/1000000000",
            )
            .unwrap();
        assert_eq!(
            key.as_bytes(),
            &hex!("471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8")
        );
        assert_eq!(
            keychain.public_key(&key).unwrap(),
            hex!("022a471424da5e657499d1ff51cb43c47481a03b1e77f951fe64cec9f5a48f7011")
        );
    }

    #[test]
    fn keychain_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Keychain>();
    }
}
