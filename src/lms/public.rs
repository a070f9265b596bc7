//! Contains the LMS [`VerifyingKey`] type

use std::cmp::Ordering;

use digest::Digest;
use signature::{Error as SignatureError, Verifier};
use subtle::ConstantTimeEq;

use crate::constants::{D_INTR, D_LEAF, ID_LEN};
use crate::error::Error;
use crate::lms::params::LmsAlgorithm;
use crate::lms::signature::Signature;
use crate::ots::LmsOtsAlgorithm;
use crate::types::Identifier;

/// Opaque struct representing a LMS public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    pub(crate) typecode: LmsAlgorithm,
    pub(crate) otstype: LmsOtsAlgorithm,
    pub(crate) id: Identifier,
    pub(crate) k: Vec<u8>,
}

impl VerifyingKey {
    /// Assembles a verifying key from its parts; `k` must be the `m`-byte
    /// root of the authentication tree.
    pub fn new(
        typecode: LmsAlgorithm,
        otstype: LmsOtsAlgorithm,
        id: Identifier,
        k: Vec<u8>,
    ) -> Result<Self, Error> {
        match k.len().cmp(&typecode.params().m) {
            Ordering::Less => Err(Error::TooShort),
            Ordering::Greater => Err(Error::TooLong),
            Ordering::Equal => Ok(Self {
                typecode,
                otstype,
                id,
                k,
            }),
        }
    }

    /// Returns the parameter set of this key.
    pub fn algorithm(&self) -> LmsAlgorithm {
        self.typecode
    }

    /// Returns the LM-OTS parameter set of the underlying one-time keys.
    pub fn ots_algorithm(&self) -> LmsOtsAlgorithm {
        self.otstype
    }

    /// Returns the 16-byte identifier of the key pair.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Returns the `m`-byte root of the authentication tree.
    pub fn k(&self) -> &[u8] {
        &self.k
    }

    /// Serializes the key as `u32str(type) || u32str(otstype) || I || K`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serialized = Vec::with_capacity(8 + ID_LEN + self.k.len());
        serialized.extend_from_slice(&self.typecode.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.otstype.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.id);
        serialized.extend_from_slice(&self.k);
        serialized
    }

    /// Parses a key from an exact slice.
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

        let expected = 8 + ID_LEN + typecode.params().m;
        match bytes.len().cmp(&expected) {
            Ordering::Less => Err(Error::TooShort),
            Ordering::Greater => Err(Error::TooLong),
            Ordering::Equal => Ok(Self {
                typecode,
                otstype,
                id: bytes[8..8 + ID_LEN].try_into().expect("16-byte slice"),
                k: bytes[8 + ID_LEN..].to_vec(),
            }),
        }
    }
}

impl Verifier<Signature> for VerifyingKey {
    /// Implements algorithm 6a of
    /// <https://datatracker.ietf.org/doc/html/rfc8554#section-5.4.2>:
    /// recover the one-time key candidate, rebuild the root through the
    /// authentication path, and compare it against `K` in constant time.
    ///
    /// Every internal failure collapses into the opaque error so no
    /// distinction between failure causes is observable.
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        let params = self.typecode.params();
        let leaves = self.typecode.leaves();

        if signature.typecode != self.typecode
            || signature.q >= leaves
            || signature.path.len() != params.h
        {
            return Err(SignatureError::new());
        }

        let candidate = signature
            .ots_sig
            .recover_pubkey(msg, self.otstype, self.id, signature.q)
            .map_err(|_| SignatureError::new())?;

        let mut node_num = leaves + signature.q;
        let digest = self
            .typecode
            .hasher()
            .chain_update(self.id)
            .chain_update(node_num.to_be_bytes())
            .chain_update(D_LEAF)
            .chain_update(candidate.k())
            .finalize();
        let mut tmp = digest[..params.m].to_vec();

        for sibling in &signature.path {
            let mut hasher = self
                .typecode
                .hasher()
                .chain_update(self.id)
                .chain_update((node_num >> 1).to_be_bytes())
                .chain_update(D_INTR);
            if node_num % 2 == 1 {
                hasher.update(sibling);
                hasher.update(&tmp);
            } else {
                hasher.update(&tmp);
                hasher.update(sibling);
            }
            let digest = hasher.finalize();
            tmp.clear();
            tmp.extend_from_slice(&digest[..params.m]);
            node_num >>= 1;
        }

        if bool::from(tmp.ct_eq(&self.k)) {
            Ok(())
        } else {
            Err(SignatureError::new())
        }
    }
}

impl From<&VerifyingKey> for Vec<u8> {
    fn from(pk: &VerifyingKey) -> Self {
        pk.to_bytes()
    }
}

impl TryFrom<&[u8]> for VerifyingKey {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
