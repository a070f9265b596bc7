use digest::Digest;

use crate::ots::params::LmsOtsAlgorithm;
use crate::types::Identifier;

/// Returns an iterator over the w-bit Winternitz coefficients of the input
/// bytes, most significant first.
///
/// Implements the Coef function from section 3.1.3 of RFC 8554
/// <https://datatracker.ietf.org/doc/html/rfc8554#section-3.1.3>
pub(crate) fn coefs(bytes: &[u8], w: usize) -> impl Iterator<Item = u8> + '_ {
    debug_assert!(matches!(w, 1 | 2 | 4 | 8), "invalid bit width: {w}");

    let mask = ((1u16 << w) - 1) as u8;
    let entries_per_byte = 8 / w;
    bytes
        .iter()
        .flat_map(move |&byte| (0..entries_per_byte).map(move |i| (byte >> (8 - w - i * w)) & mask))
}

/// Walks the Winternitz hash chain `i` of a key with the given identifier
/// and leaf number, applying the steps `from..to` to `start`.
///
/// Step `j` computes `H(I || u32str(q) || u16str(i) || u8str(j) || prev)`
/// truncated to N bytes, per sections 4.3 and 4.6 of RFC 8554. The step
/// tags stay below `2^w - 1`, which keeps them disjoint from the `0xff`
/// tag used for chain-start derivation.
pub(crate) fn chain(
    alg: LmsOtsAlgorithm,
    id: &Identifier,
    q: u32,
    i: usize,
    from: u16,
    to: u16,
    start: &[u8],
) -> Vec<u8> {
    let n = alg.params().n;
    let mut tmp = start.to_vec();

    for j in from..to {
        let digest = alg
            .hasher()
            .chain_update(id)
            .chain_update(q.to_be_bytes())
            .chain_update((i as u16).to_be_bytes())
            .chain_update([j as u8])
            .chain_update(&tmp)
            .finalize();
        tmp.clear();
        tmp.extend_from_slice(&digest[..n]);
    }

    tmp
}

#[cfg(test)]
mod tests {
    use crate::ots::util::coefs;

    #[test]
    fn coef_test_w1() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 1).collect::<Vec<_>>();
        assert_eq!(cs, vec![0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1, 1, 0, 1, 0, 0]);
    }

    #[test]
    fn coef_test_w2() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 2).collect::<Vec<_>>();
        assert_eq!(cs, vec![0, 1, 0, 2, 0, 3, 1, 0]);
    }

    #[test]
    fn coef_test_w4() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 4).collect::<Vec<_>>();
        assert_eq!(cs, vec![1, 2, 3, 4]);
    }

    #[test]
    fn coef_test_w8() {
        let s = [0x12, 0x34];
        let cs = coefs(&s, 8).collect::<Vec<_>>();
        assert_eq!(cs, vec![0x12, 0x34]);
    }
}
