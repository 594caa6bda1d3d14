use super::soft;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use super::x86_avx2;

use crate::error::Error;
use crate::params::Blake2bParam;

#[derive(Clone, Copy)]
pub union Blake2b {
    soft: soft::Blake2b,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    avx2: x86_avx2::Blake2b,
}

// x86: 0 - soft, 1 - avx2
static mut IDX: u32 = u32::MAX;

unsafe fn init_idx() {
    if IDX == u32::MAX {
        if crate::is_hw_feature_detected!(
            "x86" => ("avx2"),
            "x86_64" => ("avx2"),
        ) {
            IDX = 1;
        } else {
            IDX = 0;
        }
    }
}

impl Blake2b {
    pub const BLOCK_LEN: usize = soft::Blake2b::BLOCK_LEN;
    pub const OUT_LEN: usize = soft::Blake2b::OUT_LEN;
    pub const KEY_LEN: usize = soft::Blake2b::KEY_LEN;

    /// Sequential hashing with the given digest length.
    #[inline]
    pub fn new(outlen: usize) -> Result<Self, Error> {
        unsafe {
            init_idx();
            match IDX {
                0 => Ok(Blake2b {
                    soft: soft::Blake2b::new(outlen)?,
                }),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Ok(Blake2b {
                    avx2: x86_avx2::Blake2b::new(outlen)?,
                }),
                _ => unreachable!(),
            }
        }
    }

    /// Keyed hashing.
    #[inline]
    pub fn with_key(outlen: usize, key: &[u8]) -> Result<Self, Error> {
        unsafe {
            init_idx();
            match IDX {
                0 => Ok(Blake2b {
                    soft: soft::Blake2b::with_key(outlen, key)?,
                }),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Ok(Blake2b {
                    avx2: x86_avx2::Blake2b::with_key(outlen, key)?,
                }),
                _ => unreachable!(),
            }
        }
    }

    /// Low-level initialization from an explicit parameter block.
    #[inline]
    pub fn from_param(param: &Blake2bParam) -> Self {
        unsafe {
            init_idx();
            match IDX {
                0 => Blake2b {
                    soft: soft::Blake2b::from_param(param),
                },
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Blake2b {
                    avx2: x86_avx2::Blake2b::from_param(param),
                },
                _ => unreachable!(),
            }
        }
    }

    #[inline]
    pub fn set_last_node(&mut self, last_node: bool) {
        unsafe {
            match IDX {
                0 => self.soft.set_last_node(last_node),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => self.avx2.set_last_node(last_node),
                _ => unreachable!(),
            }
        }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) -> Result<(), Error> {
        unsafe {
            match IDX {
                0 => self.soft.update(data),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => self.avx2.update(data),
                _ => unreachable!(),
            }
        }
    }

    #[inline]
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), Error> {
        unsafe {
            match IDX {
                0 => self.soft.finalize_into(out),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => self.avx2.finalize_into(out),
                _ => unreachable!(),
            }
        }
    }

    /// One-shot hash; an empty `key` selects unkeyed hashing.
    #[inline]
    pub fn hash(out: &mut [u8], data: &[u8], key: &[u8]) -> Result<(), Error> {
        unsafe {
            init_idx();
            match IDX {
                0 => soft::Blake2b::hash(out, data, key),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => x86_avx2::Blake2b::hash(out, data, key),
                _ => unreachable!(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::digest::Mac;
    use blake2::{Blake2b512, Blake2bMac512, Digest};

    #[test]
    fn kat_and_streaming() {
        blake2b_test_case!(Blake2b);
    }

    // block-boundary sweep against an independent implementation
    #[test]
    fn matches_reference_crate() {
        let data = (0..4096).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for len in [0usize, 1, 127, 128, 129, 255, 256, 257, 3 * 128 + 17] {
            let mut out = [0u8; 64];
            Blake2b::hash(&mut out, &data[..len], &[]).unwrap();
            let expected = Blake2b512::digest(&data[..len]);
            assert_eq!(out[..], expected[..], "length {}", len);
        }
    }

    #[test]
    fn keyed_matches_reference_crate() {
        let key = (0..64).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let data = (0..1000).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for _ in 0..100 {
            let length = (rand::random::<u32>() % 1000) as usize;
            let mut out = [0u8; 64];
            Blake2b::hash(&mut out, &data[..length], &key).unwrap();
            let expected = Blake2bMac512::new_from_slice(&key)
                .unwrap()
                .chain_update(&data[..length])
                .finalize()
                .into_bytes();
            assert_eq!(out[..], expected[..], "length {}", length);
        }
    }

    // the dispatched backend and the portable one must agree
    #[test]
    fn agrees_with_soft_backend() {
        let data = (0..4096).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for len in [0usize, 1, 127, 128, 129, 3 * 128 + 17] {
            let (mut df, mut ds) = ([0u8; 64], [0u8; 64]);
            Blake2b::hash(&mut df, &data[..len], &[]).unwrap();
            soft::Blake2b::hash(&mut ds, &data[..len], &[]).unwrap();
            assert_eq!(df, ds, "length {}", len);
        }

        let mut fast = Blake2b::new(64).unwrap();
        let mut portable = soft::Blake2b::new(64).unwrap();

        let mut offset = 0;
        while offset < data.len() {
            let step = 1 + (rand::random::<u32>() as usize % 200).min(data.len() - offset - 1);
            fast.update(&data[offset..offset + step]).unwrap();
            portable.update(&data[offset..offset + step]).unwrap();
            offset += step;
        }

        let (mut df, mut ds) = ([0u8; 64], [0u8; 64]);
        fast.finalize_into(&mut df).unwrap();
        portable.finalize_into(&mut ds).unwrap();
        assert_eq!(df, ds);
    }
}
