//! Error types

use std::fmt;

/// The error returned by fallible operations in this crate.
///
/// Verification never returns these: the [`signature::Verifier`] impls
/// collapse every internal failure into the opaque [`signature::Error`]
/// so that no distinction between failure causes is observable.
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The 32-bit typecode is not a registered LMS or LM-OTS parameter set.
    #[error("unknown typecode")]
    UnknownTypecode,

    /// The input did not contain enough data.
    #[error("input too short")]
    TooShort,

    /// The input contained too much data.
    #[error("input too long")]
    TooLong,

    /// A structural invariant of the signature (nonce length, chain count,
    /// chain element length, counter range, or authentication path shape)
    /// was violated.
    #[error("malformed signature")]
    MalformedSignature,

    /// The injected random number generator returned an error or a short
    /// read.
    #[error("random number generator failure")]
    RngFailure,

    /// The one-time signing key has already produced a signature.
    #[error("one-time key already consumed")]
    KeyConsumed,

    /// Every leaf of the tree has been used; the key can never sign again.
    #[error("private key exhausted")]
    KeyExhausted,

    /// A typecode does not agree with the one its container expects.
    #[error("typecode mismatch")]
    TypeMismatch,
}

/// The error returned by [`crate::lms::SigningKey::sign_and_checkpoint`].
#[derive(Debug)]
pub enum CheckpointError<E> {
    /// Signing failed before the persistence callback ran; the counter did
    /// not advance.
    Sign(Error),
    /// The persistence callback refused the post-sign key state. The
    /// counter has already advanced and the signature is withheld.
    Persist(E),
}

impl<E> fmt::Display for CheckpointError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sign(e) => write!(f, "signing failed: {e}"),
            Self::Persist(_) => write!(f, "checkpoint persistence failed"),
        }
    }
}

impl<E: fmt::Debug> std::error::Error for CheckpointError<E> {}
