//! LMS in Rust
//!
//! This is an implementation of Leighton-Micali hash-based signatures as
//! specified in [RFC 8554], including the draft-extended SHA-256/192
//! parameter sets. You can find the signing key, verifying key, and
//! signature types in their respective modules. See [`lms`] for anything
//! LMS related and [`ots`] for anything LM-OTS related.
//!
//! LMS is *stateful*: every signature consumes one leaf of the Merkle
//! tree, and signing twice from the same key state forges signatures.
//! Callers who persist an [`lms::SigningKey`] must write the post-sign
//! state to durable storage before releasing a signature, or use
//! [`lms::SigningKey::sign_and_checkpoint`] to enforce that ordering.
//!
//! [RFC 8554]: https://datatracker.ietf.org/doc/html/rfc8554

#![forbid(unsafe_code)]

pub mod constants;
pub mod error;
pub mod lms;
pub mod ots;

mod types;

pub use crate::error::{CheckpointError, Error};
pub use crate::types::Identifier;
