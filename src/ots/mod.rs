//! Everything related to LM-OTS

mod private;
mod public;
mod signature;

pub(crate) mod params;
pub(crate) mod util;

pub use params::{LmsOtsAlgorithm, LmsOtsParams};
pub use private::SigningKey;
pub use public::VerifyingKey;
pub use signature::Signature;

#[cfg(test)]
pub(crate) mod tests {
    use digest::Digest;
    use hex_literal::hex;
    use rand::thread_rng;
    use rand_core::{CryptoRng, Error as RngError, RngCore};
    use signature::{RandomizedSignerMut, Verifier};

    use crate::constants::ID_LEN;
    use crate::error::Error;
    use crate::ots::params::LmsOtsAlgorithm;
    use crate::ots::private::SigningKey;

    pub(crate) const ALL_ALGORITHMS: [LmsOtsAlgorithm; 8] = [
        LmsOtsAlgorithm::Sha256N32W1,
        LmsOtsAlgorithm::Sha256N32W2,
        LmsOtsAlgorithm::Sha256N32W4,
        LmsOtsAlgorithm::Sha256N32W8,
        LmsOtsAlgorithm::Sha256N24W1,
        LmsOtsAlgorithm::Sha256N24W2,
        LmsOtsAlgorithm::Sha256N24W4,
        LmsOtsAlgorithm::Sha256N24W8,
    ];

    /// Constant RNG for testing purposes only.
    pub(crate) struct ConstantRng<'a>(pub &'a [u8]);

    impl RngCore for ConstantRng<'_> {
        fn next_u32(&mut self) -> u32 {
            let (head, tail) = self.0.split_at(4);
            self.0 = tail;
            u32::from_be_bytes(head.try_into().unwrap())
        }

        fn next_u64(&mut self) -> u64 {
            let (head, tail) = self.0.split_at(8);
            self.0 = tail;
            u64::from_be_bytes(head.try_into().unwrap())
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let (head, tail) = self.0.split_at(dest.len());
            dest.copy_from_slice(head);
            self.0 = tail;
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), RngError> {
            if dest.len() > self.0.len() {
                return Err(RngError::new("not enough bytes"));
            }
            self.fill_bytes(dest);
            Ok(())
        }
    }

    /// WARNING: not a secure RNG; only used to inject known test vectors.
    impl CryptoRng for ConstantRng<'_> {}

    // a signature signed with a private key verifies under its public key,
    // for every registered parameter set
    #[test]
    fn test_sign_and_verify_all_modes() {
        let mut rng = thread_rng();
        let id = hex!("d08fabd4a2091ff0a8cb4ed834e74534");

        for typecode in ALL_ALGORITHMS {
            let mut sk = SigningKey::new(typecode, 0, id, &mut rng).unwrap();
            let pk = sk.public().unwrap();

            assert!(sk.is_valid());
            let sig = sk.try_sign_with_rng(&mut rng, b"example").unwrap();
            assert!(!sk.is_valid());

            assert!(pk.verify(b"example", &sig).is_ok());
            assert!(pk.verify(b"not the message", &sig).is_err());
        }
    }

    // the second signing attempt must fail, whatever the message
    #[test]
    fn test_double_sign() {
        let id = hex!("d08fabd4a2091ff0a8cb4ed834e74534");
        let mut rng = thread_rng();
        let mut sk = SigningKey::new(LmsOtsAlgorithm::Sha256N32W1, 0, id, &mut rng).unwrap();

        assert!(sk.sign(&mut rng, b"example").is_ok());
        assert_eq!(sk.sign(&mut rng, b"example2"), Err(Error::KeyConsumed));
        assert_eq!(sk.public().err(), Some(Error::KeyConsumed));
    }

    /// Test Case 2, Appendix F, LMS level 2 of
    /// <https://datatracker.ietf.org/doc/html/rfc8554#appendix-F>
    #[test]
    fn test_sign_kat() {
        let seed = hex!("a1c4696e2608035a886100d05cd99945eb3370731884a8235e2fb3d4d71f2547");
        let id = hex!("215f83b7ccb9acbcd08db97b0d04dc2b");
        let c = hex!("0eb1ed54a2460d512388cad533138d240534e97b1e82d33bd927d201dfc24ebb");
        let y0 = hex!("11b3649023696f85150b189e50c00e98850ac343a77b3638319c347d7310269d");

        let mut sk = SigningKey::new_from_seed(LmsOtsAlgorithm::Sha256N32W8, 4, id, &seed);
        let mut rng = ConstantRng(&c);
        let msg = "The enumeration in the Constitution, of certain rights, shall not be construed to deny or disparage others retained by the people.\n".as_bytes();
        let sig = sk.sign(&mut rng, msg).unwrap();

        assert_eq!(sig.c, c);
        assert_eq!(sig.y[0], y0);
    }

    /// The public key derived from the Appendix F seed hashes to the
    /// expected Merkle leaf (path[0] of the final signature in Test Case 2).
    #[test]
    fn test_keygen_kat() {
        let seed = hex!("a1c4696e2608035a886100d05cd99945eb3370731884a8235e2fb3d4d71f2547");
        let id = hex!("215f83b7ccb9acbcd08db97b0d04dc2b");
        let k = hex!("4de1f6965bdabc676c5a4dc7c35f97f82cb0e31c68d04f1dad96314ff09e6b3d");

        let sk = SigningKey::new_from_seed(LmsOtsAlgorithm::Sha256N32W8, 5, id, &seed);
        let pk = sk.public().unwrap();

        // H(I || u32str(r) || u16str(D_LEAF) || OTS_PUB_HASH[r - 2^h])
        let leaf = LmsOtsAlgorithm::Sha256N32W8
            .hasher()
            .chain_update(pk.id())
            .chain_update((pk.q() + (1 << 5)).to_be_bytes())
            .chain_update(crate::constants::D_LEAF)
            .chain_update(pk.k())
            .finalize();
        assert_eq!(&leaf[..], &k[..]);
    }

    #[test]
    fn test_pubkey_round_trip_all_modes() {
        let mut rng = thread_rng();
        for typecode in ALL_ALGORITHMS {
            let pk = SigningKey::new(typecode, 7, [0xee; ID_LEN], &mut rng)
                .unwrap()
                .public()
                .unwrap();
            let parsed = crate::ots::VerifyingKey::from_bytes(&pk.to_bytes()).unwrap();
            assert_eq!(parsed, pk);
            assert_eq!(parsed.to_bytes().len(), 24 + typecode.params().n);
        }
    }
}
