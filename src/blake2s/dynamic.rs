use super::soft;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
use super::x86_ssse3;

use crate::error::Error;
use crate::params::Blake2sParam;

#[derive(Clone, Copy)]
pub union Blake2s {
    soft: soft::Blake2s,
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    ssse3: x86_ssse3::Blake2s,
}

// x86: 0 - soft, 1 - ssse3
static mut IDX: u32 = u32::MAX;

unsafe fn init_idx() {
    if IDX == u32::MAX {
        if crate::is_hw_feature_detected!(
            "x86" => ("ssse3"),
            "x86_64" => ("ssse3"),
        ) {
            IDX = 1;
        } else {
            IDX = 0;
        }
    }
}

impl Blake2s {
    pub const BLOCK_LEN: usize = soft::Blake2s::BLOCK_LEN;
    pub const OUT_LEN: usize = soft::Blake2s::OUT_LEN;
    pub const KEY_LEN: usize = soft::Blake2s::KEY_LEN;

    /// Sequential hashing with the given digest length.
    #[inline]
    pub fn new(outlen: usize) -> Result<Self, Error> {
        unsafe {
            init_idx();
            match IDX {
                0 => Ok(Blake2s {
                    soft: soft::Blake2s::new(outlen)?,
                }),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Ok(Blake2s {
                    ssse3: x86_ssse3::Blake2s::new(outlen)?,
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
                0 => Ok(Blake2s {
                    soft: soft::Blake2s::with_key(outlen, key)?,
                }),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Ok(Blake2s {
                    ssse3: x86_ssse3::Blake2s::with_key(outlen, key)?,
                }),
                _ => unreachable!(),
            }
        }
    }

    /// Low-level initialization from an explicit parameter block.
    #[inline]
    pub fn from_param(param: &Blake2sParam) -> Self {
        unsafe {
            init_idx();
            match IDX {
                0 => Blake2s {
                    soft: soft::Blake2s::from_param(param),
                },
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => Blake2s {
                    ssse3: x86_ssse3::Blake2s::from_param(param),
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
                1 => self.ssse3.set_last_node(last_node),
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
                1 => self.ssse3.update(data),
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
                1 => self.ssse3.finalize_into(out),
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
                0 => soft::Blake2s::hash(out, data, key),
                #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
                1 => x86_ssse3::Blake2s::hash(out, data, key),
                _ => unreachable!(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blake2::digest::Mac;
    use blake2::{Blake2s256, Blake2sMac256, Digest};

    #[test]
    fn kat_and_streaming() {
        blake2s_test_case!(Blake2s);
    }

    // block-boundary sweep against an independent implementation
    #[test]
    fn matches_reference_crate() {
        let data = (0..4096).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for len in [0usize, 1, 63, 64, 65, 127, 128, 129, 3 * 64 + 9] {
            let mut out = [0u8; 32];
            Blake2s::hash(&mut out, &data[..len], &[]).unwrap();
            let expected = Blake2s256::digest(&data[..len]);
            assert_eq!(out[..], expected[..], "length {}", len);
        }
    }

    #[test]
    fn keyed_matches_reference_crate() {
        let key = (0..32).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        let data = (0..1000).map(|_| rand::random::<u8>()).collect::<Vec<u8>>();
        for _ in 0..100 {
            let length = (rand::random::<u32>() % 1000) as usize;
            let mut out = [0u8; 32];
            Blake2s::hash(&mut out, &data[..length], &key).unwrap();
            let expected = Blake2sMac256::new_from_slice(&key)
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
        for len in [0usize, 1, 63, 64, 65, 3 * 64 + 9] {
            let (mut df, mut ds) = ([0u8; 32], [0u8; 32]);
            Blake2s::hash(&mut df, &data[..len], &[]).unwrap();
            soft::Blake2s::hash(&mut ds, &data[..len], &[]).unwrap();
            assert_eq!(df, ds, "length {}", len);
        }

        let mut fast = Blake2s::new(32).unwrap();
        let mut portable = soft::Blake2s::new(32).unwrap();

        let mut offset = 0;
        while offset < data.len() {
            let step = 1 + (rand::random::<u32>() as usize % 200).min(data.len() - offset - 1);
            fast.update(&data[offset..offset + step]).unwrap();
            portable.update(&data[offset..offset + step]).unwrap();
            offset += step;
        }

        let (mut df, mut ds) = ([0u8; 32], [0u8; 32]);
        fast.finalize_into(&mut df).unwrap();
        portable.finalize_into(&mut ds).unwrap();
        assert_eq!(df, ds);
    }
}
