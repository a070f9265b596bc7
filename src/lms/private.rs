//! Contains the LMS [`SigningKey`] type, including Merkle tree
//! construction and the single-use counter discipline

use std::cmp::Ordering;
use std::fmt;

use digest::Digest;
use rand_core::CryptoRngCore;
use signature::{Error as SignatureError, RandomizedSignerMut};
use zeroize::Zeroize;

use crate::constants::{D_INTR, D_LEAF, ID_LEN};
use crate::error::{CheckpointError, Error};
use crate::lms::params::LmsAlgorithm;
use crate::lms::public::VerifyingKey;
use crate::lms::signature::Signature;
use crate::ots;
use crate::ots::LmsOtsAlgorithm;
use crate::types::Identifier;

/// Opaque struct representing a LMS private key.
///
/// The key signs up to `2^h` messages; every signature consumes one leaf
/// and advances the internal counter `q` before it is returned, after
/// which the key is permanently past that leaf. Callers who persist the
/// key must write the post-sign state before releasing the signature;
/// loading the same serialized state twice produces colliding one-time
/// signatures, which forges signatures. See
/// [`SigningKey::sign_and_checkpoint`].
///
/// The full authentication tree is kept in memory: `2^(h+1) - 1` nodes of
/// `m` bytes, i.e. about 2 MiB at `h = 15` and about 2 GiB at `h = 25`
/// with `m = 32`. Key generation visits every leaf and is by far the most
/// expensive operation.
pub struct SigningKey {
    typecode: LmsAlgorithm,
    otstype: LmsOtsAlgorithm,
    q: u32,
    id: Identifier,
    seed: Vec<u8>,
    authtree: Vec<Vec<u8>>,
}

impl SigningKey {
    /// Generates a signing key with a random identifier and seed drawn
    /// from `rng`.
    pub fn new(
        typecode: LmsAlgorithm,
        otstype: LmsOtsAlgorithm,
        rng: &mut impl CryptoRngCore,
    ) -> Result<Self, Error> {
        let mut seed = vec![0u8; typecode.params().m];
        rng.try_fill_bytes(&mut seed)
            .map_err(|_| Error::RngFailure)?;

        let mut id = [0u8; ID_LEN];
        rng.try_fill_bytes(&mut id).map_err(|_| Error::RngFailure)?;

        let sk = Self::new_from_seed(typecode, otstype, id, &seed);
        seed.zeroize();
        sk
    }

    /// Derives a signing key deterministically from an identifier and
    /// seed, using the algorithm from appendix A of
    /// <https://datatracker.ietf.org/doc/html/rfc8554#appendix-A>.
    ///
    /// This builds the complete authentication tree and therefore costs
    /// `2^h` one-time key generations.
    pub fn new_from_seed(
        typecode: LmsAlgorithm,
        otstype: LmsOtsAlgorithm,
        id: Identifier,
        seed: &[u8],
    ) -> Result<Self, Error> {
        let authtree = generate_pk_tree(typecode, otstype, &id, seed)?;

        Ok(Self {
            typecode,
            otstype,
            q: 0,
            id,
            seed: seed.to_vec(),
            authtree,
        })
    }

    /// Returns the verifying key: the root of the authentication tree.
    pub fn public(&self) -> VerifyingKey {
        VerifyingKey {
            typecode: self.typecode,
            otstype: self.otstype,
            id: self.id,
            k: self.authtree[0].clone(),
        }
    }

    /// Returns the current value of the internal counter `q`: the number
    /// of signatures this key state has produced.
    pub fn q(&self) -> u32 {
        self.q
    }

    /// Returns the 16-byte identifier of the key pair.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Signs `msg` with the one-time key of leaf `q`, then advances `q`.
    ///
    /// Fails with [`Error::KeyExhausted`] once all `2^h` leaves are spent
    /// and with [`Error::RngFailure`] if the randomizer cannot be drawn;
    /// neither failure advances the counter. On success the counter has
    /// advanced before the signature is observable, so a later
    /// serialization failure cannot roll it back.
    pub fn sign(&mut self, rng: &mut impl CryptoRngCore, msg: &[u8]) -> Result<Signature, Error> {
        let params = self.typecode.params();
        let leaves = self.typecode.leaves();
        if self.q >= leaves {
            return Err(Error::KeyExhausted);
        }

        let mut ots_priv = ots::SigningKey::new_from_seed(self.otstype, self.q, self.id, &self.seed);
        let ots_sig = ots_priv.sign(rng, msg)?;

        let r = leaves + self.q;
        let path = (0..params.h)
            // T[x] is indexed from 1 in the RFC, so x-1 lands in storage
            .map(|i| self.authtree[(((r >> i) ^ 1) - 1) as usize].clone())
            .collect();

        let q_used = self.q;
        self.q += 1;

        Ok(Signature {
            typecode: self.typecode,
            q: q_used,
            ots_sig,
            path,
        })
    }

    /// Signs `msg` and withholds the signature until `persist` has
    /// acknowledged the post-sign key state.
    ///
    /// `persist` receives the serialized key with the advanced counter;
    /// returning `Err` reports [`CheckpointError::Persist`] and the
    /// signature is dropped. The counter stays advanced either way: it
    /// must never regress, and a leaf whose signature was never released
    /// is merely wasted.
    pub fn sign_and_checkpoint<E>(
        &mut self,
        rng: &mut impl CryptoRngCore,
        msg: &[u8],
        persist: impl FnOnce(&[u8]) -> Result<(), E>,
    ) -> Result<Signature, CheckpointError<E>> {
        let sig = self.sign(rng, msg).map_err(CheckpointError::Sign)?;
        persist(&self.to_bytes()).map_err(CheckpointError::Persist)?;
        Ok(sig)
    }

    /// Serializes the key for checkpointing as `u32str(type) ||
    /// u32str(otstype) || u32str(q) || I || seed`.
    ///
    /// The current counter is included; the authentication tree is not,
    /// and is regenerated on load.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serialized = Vec::with_capacity(12 + ID_LEN + self.seed.len());
        serialized.extend_from_slice(&self.typecode.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.otstype.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.q.to_be_bytes());
        serialized.extend_from_slice(&self.id);
        serialized.extend_from_slice(&self.seed);
        serialized
    }

    /// Parses a key from an exact slice, regenerating the authentication
    /// tree and restoring the stored counter.
    ///
    /// Loading the same bytes twice yields two keys that will reuse
    /// one-time leaves; the caller's persistence discipline is the only
    /// protection.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 8 {
            return Err(Error::TooShort);
        }

        let typecode = LmsAlgorithm::try_from(u32::from_be_bytes(
            bytes[0..4].try_into().expect("4-byte slice"),
        ))?;
        let otstype = LmsOtsAlgorithm::try_from(u32::from_be_bytes(
            bytes[4..8].try_into().expect("4-byte slice"),
        ))?;

        let expected = 12 + ID_LEN + typecode.params().m;
        match bytes.len().cmp(&expected) {
            Ordering::Less => return Err(Error::TooShort),
            Ordering::Greater => return Err(Error::TooLong),
            Ordering::Equal => (),
        }

        let q = u32::from_be_bytes(bytes[8..12].try_into().expect("4-byte slice"));
        let id: Identifier = bytes[12..12 + ID_LEN].try_into().expect("16-byte slice");
        let seed = &bytes[12 + ID_LEN..];

        let mut key = Self::new_from_seed(typecode, otstype, id, seed)?;
        key.q = q;
        Ok(key)
    }
}

impl Drop for SigningKey {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

// the seed must not leak through debug output
impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningKey")
            .field("typecode", &self.typecode)
            .field("otstype", &self.otstype)
            .field("q", &self.q)
            .field("id", &self.id)
            .finish_non_exhaustive()
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

/// Builds the Merkle tree over the `2^h` one-time public keys, per RFC
/// 8554 section 5.3.
///
/// Nodes are stored with the RFC's 1-based index `r` at slot `r - 1`:
/// leaf `i` lands at `r = 2^h + i` with value
/// `H(I || u32str(r) || D_LEAF || K_i)`, and each interior node `r` is
/// `H(I || u32str(r) || D_INTR || T[2r] || T[2r+1])`, all truncated to `m`
/// bytes. Leaves are visited left to right and siblings are folded as soon
/// as both exist, so a single pass fills the whole tree.
fn generate_pk_tree(
    typecode: LmsAlgorithm,
    otstype: LmsOtsAlgorithm,
    id: &Identifier,
    seed: &[u8],
) -> Result<Vec<Vec<u8>>, Error> {
    let params = typecode.params();
    let leaves = typecode.leaves();
    let tree_nodes = (2 * leaves - 1) as usize;
    let mut authtree = vec![Vec::new(); tree_nodes];

    for i in 0..leaves {
        let ots_priv = ots::SigningKey::new_from_seed(otstype, i, *id, seed);
        let ots_pub = ots_priv.public()?;

        let mut r = leaves + i;
        let digest = typecode
            .hasher()
            .chain_update(id)
            .chain_update(r.to_be_bytes())
            .chain_update(D_LEAF)
            .chain_update(ots_pub.k())
            .finalize();
        authtree[(r - 1) as usize] = digest[..params.m].to_vec();

        // fold completed sibling pairs up towards the root
        let mut j = i;
        while j % 2 == 1 {
            r >>= 1;
            j >>= 1;

            let digest = typecode
                .hasher()
                .chain_update(id)
                .chain_update(r.to_be_bytes())
                .chain_update(D_INTR)
                .chain_update(&authtree[(2 * r - 1) as usize])
                .chain_update(&authtree[(2 * r) as usize])
                .finalize();
            authtree[(r - 1) as usize] = digest[..params.m].to_vec();
        }
    }

    Ok(authtree)
}
