//! LMS typecodes and their parameter sets

use sha2::{Digest, Sha256};
use static_assertions::const_assert_eq;

use crate::error::Error;
use crate::ots::LmsOtsAlgorithm;

/// An LMS parameter set, registered under the typecodes of
/// <https://www.iana.org/assignments/leighton-micali-signatures/>
/// plus the SHA-256/192 extensions of draft-fluhrer-lms-more-parm-sets.
///
/// The LMS typecode range `{0x05..0x0e}` is disjoint from the LM-OTS range
/// `{0x01..0x08}`; each is validated independently on every ingress.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u32)]
pub enum LmsAlgorithm {
    /// `LMS_SHA256_M32_H5`
    Sha256M32H5 = 0x05,
    /// `LMS_SHA256_M32_H10`
    Sha256M32H10 = 0x06,
    /// `LMS_SHA256_M32_H15`
    Sha256M32H15 = 0x07,
    /// `LMS_SHA256_M32_H20`
    Sha256M32H20 = 0x08,
    /// `LMS_SHA256_M32_H25`
    Sha256M32H25 = 0x09,
    /// `LMS_SHA256_M24_H5`
    Sha256M24H5 = 0x0a,
    /// `LMS_SHA256_M24_H10`
    Sha256M24H10 = 0x0b,
    /// `LMS_SHA256_M24_H15`
    Sha256M24H15 = 0x0c,
    /// `LMS_SHA256_M24_H20`
    Sha256M24H20 = 0x0d,
    /// `LMS_SHA256_M24_H25`
    Sha256M24H25 = 0x0e,
}

/// The parameters of one [`LmsAlgorithm`], per RFC 8554 section 5.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LmsParams {
    /// The number of bytes associated with each tree node
    pub m: usize,
    /// The height of the tree
    pub h: usize,
}

impl LmsAlgorithm {
    /// Returns the raw typecode as used in the wire format.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Returns the parameter set for this typecode.
    pub const fn params(self) -> LmsParams {
        match self {
            Self::Sha256M32H5 => LmsParams { m: 32, h: 5 },
            Self::Sha256M32H10 => LmsParams { m: 32, h: 10 },
            Self::Sha256M32H15 => LmsParams { m: 32, h: 15 },
            Self::Sha256M32H20 => LmsParams { m: 32, h: 20 },
            Self::Sha256M32H25 => LmsParams { m: 32, h: 25 },
            Self::Sha256M24H5 => LmsParams { m: 24, h: 5 },
            Self::Sha256M24H10 => LmsParams { m: 24, h: 10 },
            Self::Sha256M24H15 => LmsParams { m: 24, h: 15 },
            Self::Sha256M24H20 => LmsParams { m: 24, h: 20 },
            Self::Sha256M24H25 => LmsParams { m: 24, h: 25 },
        }
    }

    /// Returns the number of leaves, `2^h`.
    pub const fn leaves(self) -> u32 {
        1 << self.params().h
    }

    /// Returns the byte length of an LMS signature that pairs this
    /// parameter set with the given LM-OTS parameter set:
    /// `u32str(q) || ots_signature || u32str(type) || path`.
    pub const fn sig_len(self, otstype: LmsOtsAlgorithm) -> usize {
        8 + otstype.params().sig_len + self.params().h * self.params().m
    }

    /// Returns a fresh hash state for this parameter set. Node values are
    /// truncated to `m` bytes by the callers, at every step.
    pub(crate) fn hasher(self) -> Sha256 {
        Sha256::new()
    }
}

impl TryFrom<u32> for LmsAlgorithm {
    type Error = Error;

    fn try_from(typecode: u32) -> Result<Self, Self::Error> {
        match typecode {
            0x05 => Ok(Self::Sha256M32H5),
            0x06 => Ok(Self::Sha256M32H10),
            0x07 => Ok(Self::Sha256M32H15),
            0x08 => Ok(Self::Sha256M32H20),
            0x09 => Ok(Self::Sha256M32H25),
            0x0a => Ok(Self::Sha256M24H5),
            0x0b => Ok(Self::Sha256M24H10),
            0x0c => Ok(Self::Sha256M24H15),
            0x0d => Ok(Self::Sha256M24H20),
            0x0e => Ok(Self::Sha256M24H25),
            _ => Err(Error::UnknownTypecode),
        }
    }
}

// RFC 8554 section 5.4.1: the H10/W4 signature used in the test vectors is
// 2508 bytes.
const_assert_eq!(
    LmsAlgorithm::Sha256M32H10.sig_len(LmsOtsAlgorithm::Sha256N32W4),
    2508
);
const_assert_eq!(
    LmsAlgorithm::Sha256M32H5.sig_len(LmsOtsAlgorithm::Sha256N32W8),
    4 + 1124 + 4 + 5 * 32
);

#[cfg(test)]
mod tests {
    use super::LmsAlgorithm;
    use crate::error::Error;

    const ALL: [LmsAlgorithm; 10] = [
        LmsAlgorithm::Sha256M32H5,
        LmsAlgorithm::Sha256M32H10,
        LmsAlgorithm::Sha256M32H15,
        LmsAlgorithm::Sha256M32H20,
        LmsAlgorithm::Sha256M32H25,
        LmsAlgorithm::Sha256M24H5,
        LmsAlgorithm::Sha256M24H10,
        LmsAlgorithm::Sha256M24H15,
        LmsAlgorithm::Sha256M24H20,
        LmsAlgorithm::Sha256M24H25,
    ];

    #[test]
    fn test_typecode_round_trip() {
        for alg in ALL {
            assert_eq!(LmsAlgorithm::try_from(alg.typecode()), Ok(alg));
        }
    }

    #[test]
    fn test_unknown_typecodes_rejected() {
        for tc in [0u32, 0x01, 0x04, 0x0f, 0x10, 0xffff_ffff] {
            assert_eq!(LmsAlgorithm::try_from(tc), Err(Error::UnknownTypecode));
        }
    }

    #[test]
    fn test_heights() {
        for alg in ALL {
            let params = alg.params();
            assert_eq!(alg.leaves(), 1 << params.h);
            assert!(matches!(params.h, 5 | 10 | 15 | 20 | 25));
            assert!(matches!(params.m, 24 | 32));
        }
    }
}
