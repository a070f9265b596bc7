//! Contains the LMS [`Signature`] type

use signature::SignatureEncoding;

use crate::error::Error;
use crate::lms::params::LmsAlgorithm;
use crate::ots::Signature as OtsSignature;

/// Opaque struct representing a LMS signature
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) typecode: LmsAlgorithm,
    pub(crate) q: u32,
    pub(crate) ots_sig: OtsSignature,
    pub(crate) path: Vec<Vec<u8>>,
}

impl Signature {
    /// Assembles a signature from a leaf number, one-time signature, and
    /// authentication path, checking the structural invariants of the
    /// parameter set.
    pub fn new(
        typecode: LmsAlgorithm,
        q: u32,
        ots_sig: OtsSignature,
        path: Vec<Vec<u8>>,
    ) -> Result<Self, Error> {
        let params = typecode.params();
        if q >= typecode.leaves() {
            return Err(Error::MalformedSignature);
        }
        if path.len() != params.h || path.iter().any(|node| node.len() != params.m) {
            return Err(Error::MalformedSignature);
        }

        Ok(Self {
            typecode,
            q,
            ots_sig,
            path,
        })
    }

    /// Returns the parameter set of this signature.
    pub fn algorithm(&self) -> LmsAlgorithm {
        self.typecode
    }

    /// Returns the leaf number this signature consumed.
    pub fn q(&self) -> u32 {
        self.q
    }

    /// Serializes the signature as `u32str(q) || ots_signature ||
    /// u32str(type) || path[0] || ... || path[h-1]`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut serialized = Vec::with_capacity(self.typecode.sig_len(self.ots_sig.algorithm()));
        serialized.extend_from_slice(&self.q.to_be_bytes());
        serialized.extend_from_slice(&self.ots_sig.to_bytes());
        serialized.extend_from_slice(&self.typecode.typecode().to_be_bytes());
        for node in &self.path {
            serialized.extend_from_slice(node);
        }
        serialized
    }

    /// Parses a signature from an exact slice, following the validations
    /// of algorithm 6a in RFC 8554.
    ///
    /// Both typecodes must be registered before the expected total length
    /// can be computed; a total-length mismatch, an out-of-range leaf
    /// number, or a wrong path shape is a malformed signature.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() < 8 {
            return Err(Error::TooShort);
        }

        // 6a.2.a: the leaf number comes first
        let q = u32::from_be_bytes(bytes[0..4].try_into().expect("4-byte slice"));

        // 6a.2.b-d: the OTS typecode opens the embedded one-time signature
        // and fixes its length
        let otstype = crate::ots::LmsOtsAlgorithm::try_from(u32::from_be_bytes(
            bytes[4..8].try_into().expect("4-byte slice"),
        ))?;
        let ots_end = 4 + otstype.params().sig_len;

        // 6a.2.f: the LMS typecode follows the one-time signature
        if bytes.len() < ots_end + 4 {
            return Err(Error::TooShort);
        }
        let typecode = LmsAlgorithm::try_from(u32::from_be_bytes(
            bytes[ots_end..ots_end + 4].try_into().expect("4-byte slice"),
        ))?;

        // with both typecodes known the total length is fixed
        let params = typecode.params();
        if bytes.len() != typecode.sig_len(otstype) {
            return Err(Error::MalformedSignature);
        }

        // 6a.2.i: q must address a leaf
        if q >= typecode.leaves() {
            return Err(Error::MalformedSignature);
        }

        let ots_sig = OtsSignature::from_bytes(&bytes[4..ots_end])?;
        let path = bytes[ots_end + 4..]
            .chunks_exact(params.m)
            .map(|node| node.to_vec())
            .collect();

        Ok(Self {
            typecode,
            q,
            ots_sig,
            path,
        })
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
