//! Contains the LM-OTS [`SigningKey`] type

use digest::Digest;
use rand_core::CryptoRngCore;
use signature::{Error as SignatureError, RandomizedSignerMut};
use zeroize::Zeroize;

use crate::constants::{D_MESG, D_PBLC};
use crate::error::Error;
use crate::ots::params::LmsOtsAlgorithm;
use crate::ots::public::VerifyingKey;
use crate::ots::signature::Signature;
use crate::ots::util::chain;
use crate::types::Identifier;

/// Opaque struct representing a LM-OTS private key.
///
/// The key signs exactly one message: [`SigningKey::sign`] erases the
/// chain starts and invalidates the key before the signature is returned,
/// and every later signing attempt fails with [`Error::KeyConsumed`].
pub struct SigningKey {
    pub(crate) typecode: LmsOtsAlgorithm,
    pub(crate) q: u32,
    pub(crate) id: Identifier,
    pub(crate) x: Vec<Vec<u8>>,
    pub(crate) valid: bool,
}

impl SigningKey {
    /// Generates a signing key for leaf number `q` of the tree identified
    /// by `id`, with an `n`-byte seed drawn from `rng`.
    pub fn new(
        typecode: LmsOtsAlgorithm,
        q: u32,
        id: Identifier,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self, Error> {
        let mut seed = vec![0u8; typecode.params().n];
        rng.try_fill_bytes(&mut seed)
            .map_err(|_| Error::RngFailure)?;

        let sk = Self::new_from_seed(typecode, q, id, &seed);
        seed.zeroize();
        Ok(sk)
    }

    /// Derives a signing key deterministically from a seed, using the
    /// algorithm from appendix A of
    /// <https://datatracker.ietf.org/doc/html/rfc8554#appendix-A>.
    ///
    /// Each chain start is `H(I || u32str(q) || u16str(i) || 0xff || seed)`
    /// truncated to `n` bytes; the `0xff` tag keeps the derivation disjoint
    /// from chain iteration.
    pub fn new_from_seed(
        typecode: LmsOtsAlgorithm,
        q: u32,
        id: Identifier,
        seed: &[u8],
    ) -> Self {
        let params = typecode.params();

        let x = (0..params.p)
            .map(|i| {
                let digest = typecode
                    .hasher()
                    .chain_update(id)
                    .chain_update(q.to_be_bytes())
                    .chain_update((i as u16).to_be_bytes())
                    .chain_update([0xff])
                    .chain_update(seed)
                    .finalize();
                digest[..params.n].to_vec()
            })
            .collect();

        Self {
            typecode,
            q,
            id,
            x,
            valid: true,
        }
    }

    /// Computes the verifying key for this signing key by walking every
    /// chain to its end, per RFC 8554 section 4.3.
    ///
    /// Fails with [`Error::KeyConsumed`] once the key has signed.
    pub fn public(&self) -> Result<VerifyingKey, Error> {
        if !self.valid {
            return Err(Error::KeyConsumed);
        }

        let params = self.typecode.params();
        let top = (1u16 << params.w) - 1;

        let mut hasher = self
            .typecode
            .hasher()
            .chain_update(self.id)
            .chain_update(self.q.to_be_bytes())
            .chain_update(D_PBLC);

        for (i, x) in self.x.iter().enumerate() {
            let y = chain(self.typecode, &self.id, self.q, i, 0, top, x);
            hasher.update(&y);
        }

        let digest = hasher.finalize();
        Ok(VerifyingKey {
            typecode: self.typecode,
            q: self.q,
            id: self.id,
            k: digest[..params.n].to_vec(),
        })
    }

    /// Signs `msg`, consuming the signing capability of this key.
    ///
    /// Implements algorithm 3 of RFC 8554 section 4.5: an `n`-byte
    /// randomizer `c` is drawn from `rng`, the randomized digest is
    /// expanded into Winternitz digits, and chain `i` is advanced by digit
    /// `a[i]` steps. The chain starts are zeroized before the signature is
    /// returned; a failed randomizer read leaves the key signable.
    pub fn sign(&mut self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Signature, Error> {
        if !self.valid {
            return Err(Error::KeyConsumed);
        }

        let params = self.typecode.params();
        let mut c = vec![0u8; params.n];
        rng.try_fill_bytes(&mut c).map_err(|_| Error::RngFailure)?;

        let digest = self
            .typecode
            .hasher()
            .chain_update(self.id)
            .chain_update(self.q.to_be_bytes())
            .chain_update(D_MESG)
            .chain_update(&c)
            .chain_update(msg)
            .finalize();
        let a = self.typecode.expand(&digest[..params.n]);

        let y = self
            .x
            .iter()
            .enumerate()
            .map(|(i, x)| chain(self.typecode, &self.id, self.q, i, 0, u16::from(a[i]), x))
            .collect();

        self.wipe();

        Ok(Signature {
            typecode: self.typecode,
            c,
            y,
        })
    }

    /// Returns whether this key can still sign.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    fn wipe(&mut self) {
        for x in &mut self.x {
            x.zeroize();
        }
        self.x.clear();
        self.valid = false;
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.wipe();
    }
}

impl RandomizedSignerMut<Signature> for SigningKey {
    fn try_sign_with_rng(
        &mut self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
    ) -> Result<Signature, SignatureError> {
        self.sign(rng, msg).map_err(SignatureError::from_source)
    }
}

#[cfg(test)]
mod tests {
    use rand::thread_rng;
    use rand_core::{CryptoRng, Error as RngError, RngCore};

    use crate::constants::ID_LEN;
    use crate::error::Error;
    use crate::ots::params::LmsOtsAlgorithm;
    use crate::ots::private::SigningKey;

    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            unimplemented!()
        }

        fn next_u64(&mut self) -> u64 {
            unimplemented!()
        }

        fn fill_bytes(&mut self, _dest: &mut [u8]) {
            panic!("fill_bytes on FailingRng")
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> Result<(), RngError> {
            Err(RngError::new("entropy source offline"))
        }
    }

    impl CryptoRng for FailingRng {}

    #[test]
    fn test_seed_derivation_is_deterministic() {
        let seed = [0x42; 32];
        let a = SigningKey::new_from_seed(LmsOtsAlgorithm::Sha256N32W4, 3, [0xaa; ID_LEN], &seed);
        let b = SigningKey::new_from_seed(LmsOtsAlgorithm::Sha256N32W4, 3, [0xaa; ID_LEN], &seed);
        assert_eq!(a.public().unwrap(), b.public().unwrap());

        // a different leaf number yields a different key
        let c = SigningKey::new_from_seed(LmsOtsAlgorithm::Sha256N32W4, 4, [0xaa; ID_LEN], &seed);
        assert_ne!(a.public().unwrap(), c.public().unwrap());
    }

    #[test]
    fn test_rng_failure_leaves_key_signable() {
        let mut sk =
            SigningKey::new(LmsOtsAlgorithm::Sha256N32W8, 0, [0xcc; ID_LEN], &mut thread_rng())
                .unwrap();

        assert_eq!(
            sk.sign(&mut FailingRng, b"example"),
            Err(Error::RngFailure)
        );
        assert!(sk.is_valid());

        let sig = sk.sign(&mut thread_rng(), b"example");
        assert!(sig.is_ok());
        assert!(!sk.is_valid());
    }

    #[test]
    fn test_rng_failure_at_keygen() {
        let result = SigningKey::new(LmsOtsAlgorithm::Sha256N32W1, 0, [0; ID_LEN], &mut FailingRng);
        assert_eq!(result.err(), Some(Error::RngFailure));
    }
}
