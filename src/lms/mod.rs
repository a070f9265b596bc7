//! Everything related to LMS (and not LM-OTS)

mod keypair;
mod private;
mod public;
mod signature;

pub(crate) mod params;

pub use params::{LmsAlgorithm, LmsParams};
pub use private::SigningKey;
pub use public::VerifyingKey;
pub use signature::Signature;

#[cfg(test)]
mod tests {
    use ::signature::{Keypair, RandomizedSignerMut, Verifier};
    use rand::thread_rng;

    use super::{LmsAlgorithm, SigningKey};
    use crate::ots::LmsOtsAlgorithm;

    fn test_sign_and_verify(typecode: LmsAlgorithm, otstype: LmsOtsAlgorithm) {
        let mut rng = thread_rng();

        // Generate a fresh keypair
        let mut sk = SigningKey::new(typecode, otstype, &mut rng).unwrap();
        let pk = sk.verifying_key();

        let msg = "this is a test message".as_bytes();

        // Sign the message
        let sig = sk.try_sign_with_rng(&mut rng, msg).unwrap();

        // Verify the signature
        assert!(pk.verify(msg, &sig).is_ok());

        // ...but not under a different message
        assert!(pk.verify(b"this is another message", &sig).is_err());
    }

    // H15 and above use too much memory and time for routine test runs;
    // the KATs pin the tall-tree arithmetic indirectly through H10.
    #[test]
    fn test_sign_and_verify_h5_w1() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H5, LmsOtsAlgorithm::Sha256N32W1);
    }

    #[test]
    fn test_sign_and_verify_h5_w2() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H5, LmsOtsAlgorithm::Sha256N32W2);
    }

    #[test]
    fn test_sign_and_verify_h5_w4() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H5, LmsOtsAlgorithm::Sha256N32W4);
    }

    #[test]
    fn test_sign_and_verify_h5_w8() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H5, LmsOtsAlgorithm::Sha256N32W8);
    }

    #[test]
    fn test_sign_and_verify_h10_w4() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H10, LmsOtsAlgorithm::Sha256N32W4);
    }

    #[test]
    fn test_sign_and_verify_h10_w8() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H10, LmsOtsAlgorithm::Sha256N32W8);
    }

    #[test]
    fn test_sign_and_verify_m24_h5_w4() {
        test_sign_and_verify(LmsAlgorithm::Sha256M24H5, LmsOtsAlgorithm::Sha256N24W4);
    }

    #[test]
    fn test_sign_and_verify_m24_h5_w8() {
        test_sign_and_verify(LmsAlgorithm::Sha256M24H5, LmsOtsAlgorithm::Sha256N24W8);
    }

    // mixing node widths between the tree and the one-time keys is legal
    // as far as the registry is concerned
    #[test]
    fn test_sign_and_verify_mixed_widths() {
        test_sign_and_verify(LmsAlgorithm::Sha256M32H5, LmsOtsAlgorithm::Sha256N24W8);
    }
}
