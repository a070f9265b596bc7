//! Contains the LM-OTS [`VerifyingKey`] type

use std::cmp::Ordering;

use signature::{Error as SignatureError, Verifier};
use subtle::ConstantTimeEq;

use crate::constants::ID_LEN;
use crate::error::Error;
use crate::ots::params::LmsOtsAlgorithm;
use crate::ots::signature::Signature;
use crate::types::Identifier;

/// Opaque struct representing a LM-OTS public key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifyingKey {
    pub(crate) typecode: LmsOtsAlgorithm,
    pub(crate) q: u32,
    pub(crate) id: Identifier,
    pub(crate) k: Vec<u8>,
}

impl VerifyingKey {
    /// Returns the parameter set of this key.
    pub fn algorithm(&self) -> LmsOtsAlgorithm {
        self.typecode
    }

    /// Returns the leaf number this key is bound to.
    pub fn q(&self) -> u32 {
        self.q
    }

    /// Returns the 16-byte identifier of the key pair.
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Returns the `n`-byte public key value `K`.
    pub fn k(&self) -> &[u8] {
        &self.k
    }

    /// Serializes the key as `u32str(type) || I || u32str(q) || K`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serialized = Vec::with_capacity(4 + ID_LEN + 4 + self.k.len());
        serialized.extend_from_slice(&self.typecode.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.id);
        serialized.extend_from_slice(&self.q.to_be_bytes());
        serialized.extend_from_slice(&self.k);
        serialized
    }

    /// Parses a key from an exact slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 4 {
            return Err(Error::TooShort);
        }

        let (alg, rest) = bytes.split_at(4);
        let typecode =
            LmsOtsAlgorithm::try_from(u32::from_be_bytes(alg.try_into().expect("4-byte slice")))?;
        let expected = ID_LEN + 4 + typecode.params().n;

        match rest.len().cmp(&expected) {
            Ordering::Less => Err(Error::TooShort),
            Ordering::Greater => Err(Error::TooLong),
            Ordering::Equal => {
                // rest is now guaranteed to be of the form I || q || K
                let (id, qk) = rest.split_at(ID_LEN);
                let (q, k) = qk.split_at(4);

                Ok(Self {
                    typecode,
                    q: u32::from_be_bytes(q.try_into().expect("4-byte slice")),
                    id: id.try_into().expect("16-byte slice"),
                    k: k.to_vec(),
                })
            }
        }
    }
}

impl Verifier<Signature> for VerifyingKey {
    /// Implements algorithm 4a of
    /// <https://datatracker.ietf.org/doc/html/rfc8554#section-4.6>.
    ///
    /// Every internal failure collapses into the opaque error so no
    /// distinction between failure causes is observable; the final key
    /// comparison is constant time.
    fn verify(&self, msg: &[u8], signature: &Signature) -> Result<(), SignatureError> {
        let kc = signature
            .recover_pubkey(msg, self.typecode, self.id, self.q)
            .map_err(|_| SignatureError::new())?;

        if bool::from(self.k.ct_eq(&kc.k)) {
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
