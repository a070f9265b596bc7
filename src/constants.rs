//! Constants as defined in RFC 8554

/// The length of the identifier `I`
pub const ID_LEN: usize = 16;

/// `D_PBLC`, the domain separator for one-time public key hashing
pub const D_PBLC: [u8; 2] = [0x80, 0x80];
/// `D_MESG`, the domain separator for message hashing
pub const D_MESG: [u8; 2] = [0x81, 0x81];
/// `D_LEAF`, the domain separator for Merkle leaf nodes
pub const D_LEAF: [u8; 2] = [0x82, 0x82];
/// `D_INTR`, the domain separator for Merkle interior nodes
pub const D_INTR: [u8; 2] = [0x83, 0x83];
