//! Parameter blocks for parameterized initialization.
//!
//! The byte layout is an interop contract shared with every other BLAKE2
//! implementation and with the published test vectors; the serialized block
//! is XORed word-by-word into the IV to derive the initial chain value, so
//! the offsets below must be reproduced exactly.

use crate::error::Error;
use crate::{blake2b, blake2s};

/// BLAKE2b parameter block, exactly 64 bytes.
///
/// Layout: digest_length@0, key_length@1, fanout@2, depth@3,
/// leaf_length@4 (4B LE), node_offset@8 (8B LE), node_depth@16,
/// inner_length@17, reserved@18..32, salt@32..48, personal@48..64.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Blake2bParam {
    bytes: [u8; 64],
}

/// BLAKE2s parameter block, exactly 32 bytes.
///
/// Layout: digest_length@0, key_length@1, fanout@2, depth@3,
/// leaf_length@4 (4B LE), node_offset@8 (6B LE), node_depth@14,
/// inner_length@15, salt@16..24, personal@24..32.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct Blake2sParam {
    bytes: [u8; 32],
}

const _: () = assert!(core::mem::size_of::<Blake2bParam>() == 64);
const _: () = assert!(core::mem::size_of::<Blake2sParam>() == 32);

impl Blake2bParam {
    pub const LEN: usize = 64;

    /// An all-zero parameter block. Note that a zeroed block is not a valid
    /// hashing configuration by itself: digest_length and depth still have
    /// to be set.
    #[inline]
    pub const fn new() -> Self {
        Self { bytes: [0u8; 64] }
    }

    pub fn set_digest_length(&mut self, outlen: usize) -> Result<(), Error> {
        if outlen < 1 || outlen > blake2b::OUT_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[0] = outlen as u8;
        Ok(())
    }

    pub fn set_key_length(&mut self, keylen: usize) -> Result<(), Error> {
        if keylen > blake2b::KEY_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[1] = keylen as u8;
        Ok(())
    }

    #[inline]
    pub fn set_fanout(&mut self, fanout: u8) {
        self.bytes[2] = fanout;
    }

    pub fn set_depth(&mut self, depth: u8) -> Result<(), Error> {
        if depth < 1 {
            return Err(Error::InvalidArgument);
        }
        self.bytes[3] = depth;
        Ok(())
    }

    #[inline]
    pub fn set_leaf_length(&mut self, leaf_length: u32) {
        self.bytes[4..8].copy_from_slice(&leaf_length.to_le_bytes());
    }

    #[inline]
    pub fn set_node_offset(&mut self, node_offset: u64) {
        self.bytes[8..16].copy_from_slice(&node_offset.to_le_bytes());
    }

    #[inline]
    pub fn set_node_depth(&mut self, node_depth: u8) {
        self.bytes[16] = node_depth;
    }

    pub fn set_inner_length(&mut self, inner_length: usize) -> Result<(), Error> {
        if inner_length > blake2b::OUT_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[17] = inner_length as u8;
        Ok(())
    }

    #[inline]
    pub fn set_salt(&mut self, salt: &[u8; blake2b::SALT_LEN]) {
        self.bytes[32..48].copy_from_slice(salt);
    }

    #[inline]
    pub fn set_personal(&mut self, personal: &[u8; blake2b::PERSONAL_LEN]) {
        self.bytes[48..64].copy_from_slice(personal);
    }

    #[inline]
    pub fn digest_length(&self) -> usize {
        self.bytes[0] as usize
    }

    #[inline]
    pub fn key_length(&self) -> usize {
        self.bytes[1] as usize
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 64] {
        &self.bytes
    }

    /// The block decoded as the eight little-endian words XORed into the IV.
    #[inline]
    pub(crate) fn words(&self) -> [u64; 8] {
        let mut w = [0u64; 8];
        for (i, chunk) in self.bytes.chunks_exact(8).enumerate() {
            w[i] = u64::from_le_bytes(chunk.try_into().unwrap());
        }
        w
    }
}

impl Default for Blake2bParam {
    fn default() -> Self {
        Self::new()
    }
}

impl Blake2sParam {
    pub const LEN: usize = 32;

    /// An all-zero parameter block; digest_length and depth still have to be
    /// set before it describes a valid configuration.
    #[inline]
    pub const fn new() -> Self {
        Self { bytes: [0u8; 32] }
    }

    pub fn set_digest_length(&mut self, outlen: usize) -> Result<(), Error> {
        if outlen < 1 || outlen > blake2s::OUT_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[0] = outlen as u8;
        Ok(())
    }

    pub fn set_key_length(&mut self, keylen: usize) -> Result<(), Error> {
        if keylen > blake2s::KEY_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[1] = keylen as u8;
        Ok(())
    }

    #[inline]
    pub fn set_fanout(&mut self, fanout: u8) {
        self.bytes[2] = fanout;
    }

    pub fn set_depth(&mut self, depth: u8) -> Result<(), Error> {
        if depth < 1 {
            return Err(Error::InvalidArgument);
        }
        self.bytes[3] = depth;
        Ok(())
    }

    #[inline]
    pub fn set_leaf_length(&mut self, leaf_length: u32) {
        self.bytes[4..8].copy_from_slice(&leaf_length.to_le_bytes());
    }

    /// The BLAKE2s node offset field is only 48 bits wide.
    pub fn set_node_offset(&mut self, node_offset: u64) -> Result<(), Error> {
        if node_offset >= 1 << 48 {
            return Err(Error::InvalidArgument);
        }
        self.bytes[8..14].copy_from_slice(&node_offset.to_le_bytes()[..6]);
        Ok(())
    }

    #[inline]
    pub fn set_node_depth(&mut self, node_depth: u8) {
        self.bytes[14] = node_depth;
    }

    pub fn set_inner_length(&mut self, inner_length: usize) -> Result<(), Error> {
        if inner_length > blake2s::OUT_LEN {
            return Err(Error::InvalidArgument);
        }
        self.bytes[15] = inner_length as u8;
        Ok(())
    }

    #[inline]
    pub fn set_salt(&mut self, salt: &[u8; blake2s::SALT_LEN]) {
        self.bytes[16..24].copy_from_slice(salt);
    }

    #[inline]
    pub fn set_personal(&mut self, personal: &[u8; blake2s::PERSONAL_LEN]) {
        self.bytes[24..32].copy_from_slice(personal);
    }

    #[inline]
    pub fn digest_length(&self) -> usize {
        self.bytes[0] as usize
    }

    #[inline]
    pub fn key_length(&self) -> usize {
        self.bytes[1] as usize
    }

    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }

    #[inline]
    pub(crate) fn words(&self) -> [u32; 8] {
        let mut w = [0u32; 8];
        for (i, chunk) in self.bytes.chunks_exact(4).enumerate() {
            w[i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }
        w
    }
}

impl Default for Blake2sParam {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blake2b_layout() {
        let mut p = Blake2bParam::new();
        p.set_digest_length(64).unwrap();
        p.set_key_length(32).unwrap();
        p.set_fanout(2);
        p.set_depth(3).unwrap();
        p.set_leaf_length(0x11223344);
        p.set_node_offset(0x0102030405060708);
        p.set_node_depth(7);
        p.set_inner_length(64).unwrap();
        p.set_salt(b"saltsaltsaltsalt");
        p.set_personal(b"personapersonaXY");

        let b = p.as_bytes();
        assert_eq!(b[0], 64);
        assert_eq!(b[1], 32);
        assert_eq!(b[2], 2);
        assert_eq!(b[3], 3);
        assert_eq!(&b[4..8], &[0x44, 0x33, 0x22, 0x11]);
        assert_eq!(&b[8..16], &[8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(b[16], 7);
        assert_eq!(b[17], 64);
        assert_eq!(&b[18..32], &[0u8; 14]);
        assert_eq!(&b[32..48], b"saltsaltsaltsalt");
        assert_eq!(&b[48..64], b"personapersonaXY");
    }

    #[test]
    fn blake2s_layout() {
        let mut p = Blake2sParam::new();
        p.set_digest_length(32).unwrap();
        p.set_key_length(16).unwrap();
        p.set_fanout(1);
        p.set_depth(1).unwrap();
        p.set_leaf_length(0xAABBCCDD);
        p.set_node_offset(0x010203040506).unwrap();
        p.set_node_depth(9);
        p.set_inner_length(32).unwrap();
        p.set_salt(b"salt8byt");
        p.set_personal(b"personal");

        let b = p.as_bytes();
        assert_eq!(b[0], 32);
        assert_eq!(b[1], 16);
        assert_eq!(&b[4..8], &[0xDD, 0xCC, 0xBB, 0xAA]);
        assert_eq!(&b[8..14], &[6, 5, 4, 3, 2, 1]);
        assert_eq!(b[14], 9);
        assert_eq!(b[15], 32);
        assert_eq!(&b[16..24], b"salt8byt");
        assert_eq!(&b[24..32], b"personal");
    }

    #[test]
    fn field_validation() {
        let mut p = Blake2bParam::new();
        assert_eq!(p.set_digest_length(0), Err(Error::InvalidArgument));
        assert_eq!(p.set_digest_length(65), Err(Error::InvalidArgument));
        assert_eq!(p.set_key_length(65), Err(Error::InvalidArgument));
        assert_eq!(p.set_depth(0), Err(Error::InvalidArgument));
        assert_eq!(p.set_inner_length(65), Err(Error::InvalidArgument));
        // a failed setter leaves the block untouched
        assert_eq!(p.as_bytes(), &[0u8; 64]);

        let mut p = Blake2sParam::new();
        assert_eq!(p.set_digest_length(33), Err(Error::InvalidArgument));
        assert_eq!(p.set_key_length(33), Err(Error::InvalidArgument));
        assert_eq!(p.set_node_offset(1 << 48), Err(Error::InvalidArgument));
        assert!(p.set_node_offset((1 << 48) - 1).is_ok());
    }
}
