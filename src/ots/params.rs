//! LM-OTS typecodes and their parameter sets

use sha2::{Digest, Sha256};
use static_assertions::const_assert_eq;

use crate::error::Error;
use crate::ots::util::coefs;

/// An LM-OTS parameter set, registered under the typecodes of
/// <https://www.iana.org/assignments/leighton-micali-signatures/>
/// plus the SHA-256/192 extensions of draft-fluhrer-lms-more-parm-sets.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u32)]
pub enum LmsOtsAlgorithm {
    /// `LMOTS_SHA256_N32_W1`
    Sha256N32W1 = 0x01,
    /// `LMOTS_SHA256_N32_W2`
    Sha256N32W2 = 0x02,
    /// `LMOTS_SHA256_N32_W4`
    Sha256N32W4 = 0x03,
    /// `LMOTS_SHA256_N32_W8`
    Sha256N32W8 = 0x04,
    /// `LMOTS_SHA256_N24_W1`
    Sha256N24W1 = 0x05,
    /// `LMOTS_SHA256_N24_W2`
    Sha256N24W2 = 0x06,
    /// `LMOTS_SHA256_N24_W4`
    Sha256N24W4 = 0x07,
    /// `LMOTS_SHA256_N24_W8`
    Sha256N24W8 = 0x08,
}

/// The parameters of one [`LmsOtsAlgorithm`], per RFC 8554 section 4.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LmsOtsParams {
    /// The number of bytes of hash output used
    pub n: usize,
    /// The Winternitz window in bits; divides 8
    pub w: usize,
    /// The number of `n`-byte hash chains, covering the message digest and
    /// its checksum
    pub p: usize,
    /// The left shift that aligns the checksum to a byte boundary
    pub ls: usize,
    /// The byte length of a serialized signature
    pub sig_len: usize,
}

impl LmsOtsAlgorithm {
    /// Returns the raw typecode as used in the wire format.
    pub const fn typecode(self) -> u32 {
        self as u32
    }

    /// Returns the parameter set for this typecode.
    ///
    /// The table matches RFC 8554 section 4.1 and the N=24 rows of
    /// draft-fluhrer-lms-more-parm-sets; every row is pinned against the
    /// defining arithmetic by the asserts below.
    pub const fn params(self) -> LmsOtsParams {
        match self {
            Self::Sha256N32W1 => LmsOtsParams { n: 32, w: 1, p: 265, ls: 7, sig_len: 8516 },
            Self::Sha256N32W2 => LmsOtsParams { n: 32, w: 2, p: 133, ls: 6, sig_len: 4292 },
            Self::Sha256N32W4 => LmsOtsParams { n: 32, w: 4, p: 67, ls: 4, sig_len: 2180 },
            Self::Sha256N32W8 => LmsOtsParams { n: 32, w: 8, p: 34, ls: 0, sig_len: 1124 },
            Self::Sha256N24W1 => LmsOtsParams { n: 24, w: 1, p: 200, ls: 8, sig_len: 4828 },
            Self::Sha256N24W2 => LmsOtsParams { n: 24, w: 2, p: 101, ls: 6, sig_len: 2452 },
            Self::Sha256N24W4 => LmsOtsParams { n: 24, w: 4, p: 51, ls: 4, sig_len: 1252 },
            Self::Sha256N24W8 => LmsOtsParams { n: 24, w: 8, p: 26, ls: 0, sig_len: 652 },
        }
    }

    /// Returns a fresh hash state for this parameter set. Outputs are
    /// truncated to `n` bytes by the callers, at every step.
    pub(crate) fn hasher(self) -> Sha256 {
        Sha256::new()
    }

    /// Expands an `n`-byte message digest into its `p` Winternitz
    /// coefficients: the digits of the digest followed by the digits of its
    /// checksum.
    ///
    /// See RFC 8554 sections 3.1.3 and 4.4. `p` is chosen so that the final
    /// truncation only ever drops padding digits of the shifted checksum.
    pub fn expand(self, digest: &[u8]) -> Vec<u8> {
        let LmsOtsParams { w, p, ls, .. } = self.params();

        let mut res: Vec<u8> = coefs(digest, w).collect();

        // The checksum is the sum of all "negated" digits, so lowering any
        // digit of a forged message raises the checksum digits.
        let cksm = res
            .iter()
            .map(|&x| ((1u16 << w) - 1) - u16::from(x))
            .sum::<u16>()
            << ls;

        res.extend(coefs(&cksm.to_be_bytes(), w));
        res.truncate(p);
        res
    }
}

impl TryFrom<u32> for LmsOtsAlgorithm {
    type Error = Error;

    fn try_from(typecode: u32) -> Result<Self, Self::Error> {
        match typecode {
            0x01 => Ok(Self::Sha256N32W1),
            0x02 => Ok(Self::Sha256N32W2),
            0x03 => Ok(Self::Sha256N32W4),
            0x04 => Ok(Self::Sha256N32W8),
            0x05 => Ok(Self::Sha256N24W1),
            0x06 => Ok(Self::Sha256N24W2),
            0x07 => Ok(Self::Sha256N24W4),
            0x08 => Ok(Self::Sha256N24W8),
            _ => Err(Error::UnknownTypecode),
        }
    }
}

// Pin the registry rows to the formulas of RFC 8554 appendix B:
// u = ceil(8n/w) digits cover the digest, v digits cover the checksum,
// p = u + v, ls realigns the checksum, and a signature carries the nonce
// plus p chain ends.
const fn u(n: usize, w: usize) -> usize {
    (8 * n + w - 1) / w
}

const fn v(n: usize, w: usize) -> usize {
    ((((1 << w) - 1) * u(n, w)).ilog2() as usize) / w + 1
}

const fn p(n: usize, w: usize) -> usize {
    u(n, w) + v(n, w)
}

const fn ls(n: usize, w: usize) -> usize {
    16 - v(n, w) * w
}

const fn sig_len(n: usize, w: usize) -> usize {
    4 + n * (p(n, w) + 1)
}

macro_rules! assert_registry_row {
    ($alg:ident, $n:expr, $w:expr) => {
        const_assert_eq!(LmsOtsAlgorithm::$alg.params().p, p($n, $w));
        const_assert_eq!(LmsOtsAlgorithm::$alg.params().ls, ls($n, $w));
        const_assert_eq!(LmsOtsAlgorithm::$alg.params().sig_len, sig_len($n, $w));
    };
}

assert_registry_row!(Sha256N32W1, 32, 1);
assert_registry_row!(Sha256N32W2, 32, 2);
assert_registry_row!(Sha256N32W4, 32, 4);
assert_registry_row!(Sha256N32W8, 32, 8);
assert_registry_row!(Sha256N24W1, 24, 1);
assert_registry_row!(Sha256N24W2, 24, 2);
assert_registry_row!(Sha256N24W4, 24, 4);
assert_registry_row!(Sha256N24W8, 24, 8);

#[cfg(test)]
mod tests {
    use super::LmsOtsAlgorithm;
    use crate::error::Error;

    const ALL: [LmsOtsAlgorithm; 8] = [
        LmsOtsAlgorithm::Sha256N32W1,
        LmsOtsAlgorithm::Sha256N32W2,
        LmsOtsAlgorithm::Sha256N32W4,
        LmsOtsAlgorithm::Sha256N32W8,
        LmsOtsAlgorithm::Sha256N24W1,
        LmsOtsAlgorithm::Sha256N24W2,
        LmsOtsAlgorithm::Sha256N24W4,
        LmsOtsAlgorithm::Sha256N24W8,
    ];

    #[test]
    fn test_typecode_round_trip() {
        for alg in ALL {
            assert_eq!(LmsOtsAlgorithm::try_from(alg.typecode()), Ok(alg));
        }
    }

    #[test]
    fn test_unknown_typecodes_rejected() {
        for tc in [0u32, 0x09, 0x0a, 0x0e, 0xff, 0xffff_ffff] {
            assert_eq!(LmsOtsAlgorithm::try_from(tc), Err(Error::UnknownTypecode));
        }
    }

    #[test]
    fn test_checksum_zero_w1() {
        let alg = LmsOtsAlgorithm::Sha256N32W1;
        let arr = [0u8; 32];
        let expanded = alg.expand(&arr);
        assert_eq!(&expanded[256..], &[1, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_checksum_ones_w1() {
        let alg = LmsOtsAlgorithm::Sha256N32W1;
        let arr = [255u8; 32];
        let expanded = alg.expand(&arr);
        assert_eq!(&expanded[256..], &[0, 0, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_checksum_ten_w4() {
        let alg = LmsOtsAlgorithm::Sha256N32W4;
        let arr = [0xaa; 32];
        let expanded = alg.expand(&arr);
        assert_eq!(&expanded[64..], &[0x01, 0x04, 0x00]);
    }

    #[test]
    fn test_expand_zero_w8() {
        let alg = LmsOtsAlgorithm::Sha256N32W8;
        let arr = [0u8; 32];
        let expanded = alg.expand(&arr);
        let mut expected = vec![0u8; 34];
        expected[32] = 0x1f;
        expected[33] = 0xe0;
        assert_eq!(expanded, expected);
    }

    #[test]
    fn test_expand_length() {
        for alg in ALL {
            let params = alg.params();
            let digest = vec![0x5a; params.n];
            assert_eq!(alg.expand(&digest).len(), params.p);
        }
    }
}
