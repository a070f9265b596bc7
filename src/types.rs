//! Types shared between the LMS and LM-OTS layers

use crate::constants::ID_LEN;

/// The 16 byte identifier `I` that binds every hash invocation in a key
/// pair to one tree instance.
pub type Identifier = [u8; ID_LEN];
