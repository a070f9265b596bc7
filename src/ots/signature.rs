//! Contains the LM-OTS [`Signature`] type, including serialization and
//! public-key recovery

use std::cmp::Ordering;

use digest::Digest;
use signature::SignatureEncoding;

use crate::constants::{D_MESG, D_PBLC};
use crate::error::Error;
use crate::ots::params::LmsOtsAlgorithm;
use crate::ots::public::VerifyingKey;
use crate::ots::util::chain;
use crate::types::Identifier;

/// Opaque struct representing a LM-OTS signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) typecode: LmsOtsAlgorithm,
    pub(crate) c: Vec<u8>,
    pub(crate) y: Vec<Vec<u8>>,
}

impl Signature {
    /// Assembles a signature from a nonce and chain ends, checking the
    /// structural invariants of the parameter set.
    pub fn new(typecode: LmsOtsAlgorithm, c: Vec<u8>, y: Vec<Vec<u8>>) -> Result<Self, Error> {
        let params = typecode.params();
        if c.len() != params.n || y.len() != params.p || y.iter().any(|y| y.len() != params.n) {
            return Err(Error::MalformedSignature);
        }
        Ok(Self { typecode, c, y })
    }

    /// Returns the parameter set of this signature.
    pub fn algorithm(&self) -> LmsOtsAlgorithm {
        self.typecode
    }

    /// Recovers the verifying key candidate this signature was produced
    /// under, per algorithm 4b of RFC 8554 section 4.6.
    ///
    /// Fails with [`Error::TypeMismatch`] if the signature does not carry
    /// the `expected` typecode, and [`Error::MalformedSignature`] if the
    /// nonce or any chain element has the wrong length. The returned key is
    /// structurally valid whether or not it matches a real key; the caller
    /// performs the comparison.
    pub fn recover_pubkey(
        &self,
        msg: &[u8],
        expected: LmsOtsAlgorithm,
        id: Identifier,
        q: u32,
    ) -> Result<VerifyingKey, Error> {
        if self.typecode != expected {
            return Err(Error::TypeMismatch);
        }

        let params = self.typecode.params();
        if self.c.len() != params.n
            || self.y.len() != params.p
            || self.y.iter().any(|y| y.len() != params.n)
        {
            return Err(Error::MalformedSignature);
        }

        let digest = self
            .typecode
            .hasher()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update(D_MESG)
            .chain_update(&self.c)
            .chain_update(msg)
            .finalize();
        let a = self.typecode.expand(&digest[..params.n]);

        // Continue every chain from the signer's stopping point to its end
        // and hash the ends the same way key generation does.
        let top = (1u16 << params.w) - 1;
        let mut hasher = self
            .typecode
            .hasher()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update(D_PBLC);

        for (i, y) in self.y.iter().enumerate() {
            let end = chain(self.typecode, &id, q, i, u16::from(a[i]), top, y);
            hasher.update(&end);
        }

        let digest = hasher.finalize();
        Ok(VerifyingKey {
            typecode: self.typecode,
            q,
            id,
            k: digest[..params.n].to_vec(),
        })
    }

    /// Serializes the signature as `u32str(type) || C || y[0] || ... ||
    /// y[p-1]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serialized = Vec::with_capacity(self.typecode.params().sig_len);
        serialized.extend_from_slice(&self.typecode.typecode().to_be_bytes());
        serialized.extend_from_slice(&self.c);
        for y in &self.y {
            serialized.extend_from_slice(y);
        }
        serialized
    }

    /// Parses a signature from an exact slice.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 4 {
            return Err(Error::TooShort);
        }

        let typecode = LmsOtsAlgorithm::try_from(u32::from_be_bytes(
            bytes[0..4].try_into().expect("4-byte slice"),
        ))?;
        let params = typecode.params();

        match bytes.len().cmp(&params.sig_len) {
            Ordering::Less => Err(Error::TooShort),
            Ordering::Greater => Err(Error::TooLong),
            Ordering::Equal => {
                let c = bytes[4..4 + params.n].to_vec();
                let y = bytes[4 + params.n..]
                    .chunks_exact(params.n)
                    .map(|y| y.to_vec())
                    .collect();

                Ok(Self { typecode, c, y })
            }
        }
    }
}

impl SignatureEncoding for Signature {
    type Repr = Vec<u8>;
}

impl From<Signature> for Vec<u8> {
    fn from(sig: Signature) -> Self {
        sig.to_bytes()
    }
}

impl TryFrom<&[u8]> for Signature {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}
