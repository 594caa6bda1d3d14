#[cfg(target_arch = "x86")]
use core::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;
use unsafe_target_feature::unsafe_target_feature;
use zeroize::Zeroize;

use super::{BLOCK_LEN, IV, KEY_LEN, OUT_LEN, SIGMA};
use crate::error::Error;
use crate::params::Blake2sParam;
use crate::_MM_SHUFFLE;

#[derive(Clone, Copy)]
pub struct Blake2s {
    h: [u32; 8],
    t: [u32; 2],
    f: [u32; 2],
    buf: [u8; BLOCK_LEN],
    buflen: usize,
    outlen: usize,
    last_node: bool,
}

impl Blake2s {
    blake2s_define_const!();

    /// Sequential hashing with the given digest length.
    pub fn new(outlen: usize) -> Result<Self, Error> {
        Ok(Self::from_param(&super::sequential_param(outlen, 0)?))
    }

    /// Low-level initialization from an explicit parameter block.
    pub fn from_param(param: &Blake2sParam) -> Self {
        let words = param.words();
        let mut h = IV;
        for i in 0..8 {
            h[i] ^= words[i];
        }
        Self {
            h,
            t: [0; 2],
            f: [0; 2],
            buf: [0u8; BLOCK_LEN],
            buflen: 0,
            outlen: param.digest_length(),
            last_node: false,
        }
    }

    #[inline]
    pub fn set_last_node(&mut self, last_node: bool) {
        self.last_node = last_node;
    }

    #[inline]
    fn increment_counter(&mut self, inc: u32) {
        self.t[0] = self.t[0].wrapping_add(inc);
        self.t[1] = self.t[1].wrapping_add((self.t[0] < inc) as u32);
    }

    pub(crate) fn wipe(&mut self) {
        self.h.zeroize();
        self.t.zeroize();
        self.buf.zeroize();
        self.buflen = 0;
        self.last_node = false;
        self.f = [!0, 0];
    }
}

#[unsafe_target_feature("ssse3")]
impl Blake2s {
    /// Keyed hashing. The key is absorbed as one zero-padded full block
    /// before any message data.
    pub fn with_key(outlen: usize, key: &[u8]) -> Result<Self, Error>
    where
        Self: Sized,
    {
        if key.is_empty() || key.len() > KEY_LEN {
            return Err(Error::InvalidArgument);
        }
        let mut state = Self::from_param(&super::sequential_param(outlen, key.len())?);
        let mut block = [0u8; BLOCK_LEN];
        block[..key.len()].copy_from_slice(key);
        // cannot fail: the state is fresh and the block is non-empty
        let _ = state.update(&block);
        block.zeroize();
        Ok(state)
    }

    pub fn update(&mut self, data: &[u8]) -> Result<(), Error> {
        if data.is_empty() {
            return Ok(());
        }
        if self.f[0] != 0 {
            return Err(Error::InvalidState);
        }
        let mut input = data;
        if self.buflen + input.len() > BLOCK_LEN {
            let fill = BLOCK_LEN - self.buflen;
            self.buf[self.buflen..].copy_from_slice(&input[..fill]);
            self.increment_counter(BLOCK_LEN as u32);
            Self::compress(&mut self.h, &self.t, &self.f, &self.buf);
            self.buflen = 0;
            input = &input[fill..];
            while input.len() > BLOCK_LEN {
                self.increment_counter(BLOCK_LEN as u32);
                let block = unsafe { crate::utils::slice_to_array(input) };
                Self::compress(&mut self.h, &self.t, &self.f, block);
                input = &input[BLOCK_LEN..];
            }
        }
        // the trailing block (possibly a full one) stays buffered for finalize
        self.buf[self.buflen..self.buflen + input.len()].copy_from_slice(input);
        self.buflen += input.len();
        Ok(())
    }

    /// Finalizes into `out`, wiping the chain value and block buffer; the
    /// state becomes permanently unusable.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), Error> {
        if out.len() < self.outlen {
            return Err(Error::InvalidArgument);
        }
        if self.f[0] != 0 {
            return Err(Error::InvalidState);
        }
        self.increment_counter(self.buflen as u32);
        if self.last_node {
            self.f[1] = !0;
        }
        self.f[0] = !0;
        self.buf[self.buflen..].fill(0);
        Self::compress(&mut self.h, &self.t, &self.f, &self.buf);

        let mut buffer = [0u8; OUT_LEN];
        for (chunk, word) in buffer.chunks_exact_mut(4).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out[..self.outlen].copy_from_slice(&buffer[..self.outlen]);
        buffer.zeroize();
        self.buf.zeroize();
        self.h.zeroize();
        Ok(())
    }

    /// One-shot hash; an empty `key` selects unkeyed hashing.
    pub fn hash(out: &mut [u8], data: &[u8], key: &[u8]) -> Result<(), Error> {
        if out.is_empty() || out.len() > OUT_LEN || key.len() > KEY_LEN {
            return Err(Error::InvalidArgument);
        }
        let mut state = if key.is_empty() {
            Self::new(out.len())?
        } else {
            Self::with_key(out.len(), key)?
        };
        let ret = state
            .update(data)
            .and_then(|()| state.finalize_into(out));
        state.wipe();
        ret
    }

    // One 128-bit register per row of the 4x4 state; rotations by 16 and 8
    // are byte shuffles, the odd ones fall back to shift-and-or.
    fn compress(h: &mut [u32; 8], t: &[u32; 2], f: &[u32; 2], block: &[u8; BLOCK_LEN]) {
        let mut m = [0u32; 16];
        for (i, chunk) in block.chunks_exact(4).enumerate() {
            m[i] = u32::from_le_bytes(chunk.try_into().unwrap());
        }

        let rot16 = _mm_setr_epi8(2, 3, 0, 1, 6, 7, 4, 5, 10, 11, 8, 9, 14, 15, 12, 13);
        let rot8 = _mm_setr_epi8(1, 2, 3, 0, 5, 6, 7, 4, 9, 10, 11, 8, 13, 14, 15, 12);

        let mut a = unsafe { _mm_loadu_si128(h.as_ptr() as *const __m128i) };
        let mut b = unsafe { _mm_loadu_si128(h.as_ptr().add(4) as *const __m128i) };
        let mut c = unsafe { _mm_loadu_si128(IV.as_ptr() as *const __m128i) };
        let mut d = _mm_set_epi32(
            (IV[7] ^ f[1]) as i32,
            (IV[6] ^ f[0]) as i32,
            (IV[5] ^ t[1]) as i32,
            (IV[4] ^ t[0]) as i32,
        );

        macro_rules! msg {
            ($s:expr, $k0:expr, $k1:expr, $k2:expr, $k3:expr) => {
                _mm_set_epi32(
                    m[$s[$k3]] as i32,
                    m[$s[$k2]] as i32,
                    m[$s[$k1]] as i32,
                    m[$s[$k0]] as i32,
                )
            };
        }
        macro_rules! quarter {
            ($b0:expr, $b1:expr) => {
                a = _mm_add_epi32(_mm_add_epi32(a, b), $b0);
                d = _mm_shuffle_epi8(_mm_xor_si128(d, a), rot16);
                c = _mm_add_epi32(c, d);
                let x = _mm_xor_si128(b, c);
                b = _mm_or_si128(_mm_srli_epi32::<12>(x), _mm_slli_epi32::<20>(x));
                a = _mm_add_epi32(_mm_add_epi32(a, b), $b1);
                d = _mm_shuffle_epi8(_mm_xor_si128(d, a), rot8);
                c = _mm_add_epi32(c, d);
                let x = _mm_xor_si128(b, c);
                b = _mm_or_si128(_mm_srli_epi32::<7>(x), _mm_slli_epi32::<25>(x));
            };
        }
        macro_rules! round {
            ($s:expr) => {
                quarter!(msg!($s, 0, 2, 4, 6), msg!($s, 1, 3, 5, 7));
                b = _mm_shuffle_epi32::<{ _MM_SHUFFLE(0, 3, 2, 1) }>(b);
                c = _mm_shuffle_epi32::<{ _MM_SHUFFLE(1, 0, 3, 2) }>(c);
                d = _mm_shuffle_epi32::<{ _MM_SHUFFLE(2, 1, 0, 3) }>(d);
                quarter!(msg!($s, 8, 10, 12, 14), msg!($s, 9, 11, 13, 15));
                b = _mm_shuffle_epi32::<{ _MM_SHUFFLE(2, 1, 0, 3) }>(b);
                c = _mm_shuffle_epi32::<{ _MM_SHUFFLE(1, 0, 3, 2) }>(c);
                d = _mm_shuffle_epi32::<{ _MM_SHUFFLE(0, 3, 2, 1) }>(d);
            };
        }

        for s in SIGMA.iter() {
            round!(s);
        }

        unsafe {
            let h0 = _mm_loadu_si128(h.as_ptr() as *const __m128i);
            let h1 = _mm_loadu_si128(h.as_ptr().add(4) as *const __m128i);
            let h0 = _mm_xor_si128(h0, _mm_xor_si128(a, c));
            let h1 = _mm_xor_si128(h1, _mm_xor_si128(b, d));
            _mm_storeu_si128(h.as_mut_ptr() as *mut __m128i, h0);
            _mm_storeu_si128(h.as_mut_ptr().add(4) as *mut __m128i, h1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kat_and_streaming() {
        if !std::arch::is_x86_feature_detected!("ssse3") {
            return;
        }
        blake2s_test_case!(Blake2s);
    }
}
