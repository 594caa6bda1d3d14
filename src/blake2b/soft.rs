use zeroize::Zeroize;

use super::{BLOCK_LEN, IV, KEY_LEN, OUT_LEN, SIGMA};
use crate::error::Error;
use crate::params::Blake2bParam;

#[derive(Clone, Copy)]
pub struct Blake2b {
    h: [u64; 8],
    t: [u64; 2],
    f: [u64; 2],
    buf: [u8; BLOCK_LEN],
    buflen: usize,
    outlen: usize,
    last_node: bool,
}

macro_rules! blake2b_define_const {
    () => {
        pub const BLOCK_LEN: usize = super::BLOCK_LEN;
        pub const OUT_LEN: usize = super::OUT_LEN;
        pub const KEY_LEN: usize = super::KEY_LEN;
    };
}

impl Blake2b {
    blake2b_define_const!();

    /// Sequential hashing with the given digest length.
    pub fn new(outlen: usize) -> Result<Self, Error> {
        Ok(Self::from_param(&super::sequential_param(outlen, 0)?))
    }

    /// Keyed hashing. The key is absorbed as one zero-padded full block
    /// before any message data, even for an empty message.
    pub fn with_key(outlen: usize, key: &[u8]) -> Result<Self, Error> {
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

    /// Low-level initialization from an explicit parameter block. The
    /// digest length is taken from the block without re-validation; this is
    /// the entry point tree-mode composition builds on.
    pub fn from_param(param: &Blake2bParam) -> Self {
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

    /// Marks this state as the last node of its tree level; affects the
    /// finalization flags of the final block.
    #[inline]
    pub fn set_last_node(&mut self, last_node: bool) {
        self.last_node = last_node;
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
            // complete the current block
            let fill = BLOCK_LEN - self.buflen;
            self.buf[self.buflen..].copy_from_slice(&input[..fill]);
            self.increment_counter(BLOCK_LEN as u64);
            compress(&mut self.h, &self.t, &self.f, &self.buf);
            self.buflen = 0;
            input = &input[fill..];
            // interior blocks straight from the input, no buffer copy
            while input.len() > BLOCK_LEN {
                self.increment_counter(BLOCK_LEN as u64);
                let block = unsafe { crate::utils::slice_to_array(input) };
                compress(&mut self.h, &self.t, &self.f, block);
                input = &input[BLOCK_LEN..];
            }
        }
        // the trailing block (possibly a full one) stays buffered so that
        // finalize always has the last block to flag and compress
        self.buf[self.buflen..self.buflen + input.len()].copy_from_slice(input);
        self.buflen += input.len();
        Ok(())
    }

    /// Finalizes into `out`, which must be at least the configured digest
    /// length; an undersized buffer is rejected untouched. The chain value
    /// and block buffer are wiped before returning and the state becomes
    /// permanently unusable.
    pub fn finalize_into(&mut self, out: &mut [u8]) -> Result<(), Error> {
        if out.len() < self.outlen {
            return Err(Error::InvalidArgument);
        }
        if self.f[0] != 0 {
            return Err(Error::InvalidState);
        }
        self.increment_counter(self.buflen as u64);
        if self.last_node {
            self.f[1] = !0;
        }
        self.f[0] = !0;
        self.buf[self.buflen..].fill(0);
        compress(&mut self.h, &self.t, &self.f, &self.buf);

        let mut buffer = [0u8; OUT_LEN];
        for (chunk, word) in buffer.chunks_exact_mut(8).zip(self.h.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out[..self.outlen].copy_from_slice(&buffer[..self.outlen]);
        buffer.zeroize();
        self.buf.zeroize();
        self.h.zeroize();
        Ok(())
    }

    /// One-shot hash. An empty `key` selects unkeyed hashing; the working
    /// state is wiped on every exit path.
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

    #[inline]
    fn increment_counter(&mut self, inc: u64) {
        self.t[0] = self.t[0].wrapping_add(inc);
        self.t[1] = self.t[1].wrapping_add((self.t[0] < inc) as u64);
    }

    /// Wipes all sensitive material and invalidates the state.
    pub(crate) fn wipe(&mut self) {
        self.h.zeroize();
        self.t.zeroize();
        self.buf.zeroize();
        self.buflen = 0;
        self.last_node = false;
        self.f = [!0, 0];
    }
}

fn compress(h: &mut [u64; 8], t: &[u64; 2], f: &[u64; 2], block: &[u8; BLOCK_LEN]) {
    let mut m = [0u64; 16];
    for (i, chunk) in block.chunks_exact(8).enumerate() {
        m[i] = u64::from_le_bytes(chunk.try_into().unwrap());
    }

    let mut v = [0u64; 16];
    v[..8].copy_from_slice(h);
    v[8..12].copy_from_slice(&IV[..4]);
    v[12] = IV[4] ^ t[0];
    v[13] = IV[5] ^ t[1];
    v[14] = IV[6] ^ f[0];
    v[15] = IV[7] ^ f[1];

    macro_rules! g {
        ($r:expr, $i:expr, $a:expr, $b:expr, $c:expr, $d:expr) => {
            v[$a] = v[$a].wrapping_add(v[$b]).wrapping_add(m[SIGMA[$r][2 * $i]]);
            v[$d] = (v[$d] ^ v[$a]).rotate_right(32);
            v[$c] = v[$c].wrapping_add(v[$d]);
            v[$b] = (v[$b] ^ v[$c]).rotate_right(24);
            v[$a] = v[$a].wrapping_add(v[$b]).wrapping_add(m[SIGMA[$r][2 * $i + 1]]);
            v[$d] = (v[$d] ^ v[$a]).rotate_right(16);
            v[$c] = v[$c].wrapping_add(v[$d]);
            v[$b] = (v[$b] ^ v[$c]).rotate_right(63);
        };
    }
    macro_rules! round {
        ($r:expr) => {
            g!($r, 0, 0, 4, 8, 12);
            g!($r, 1, 1, 5, 9, 13);
            g!($r, 2, 2, 6, 10, 14);
            g!($r, 3, 3, 7, 11, 15);
            g!($r, 4, 0, 5, 10, 15);
            g!($r, 5, 1, 6, 11, 12);
            g!($r, 6, 2, 7, 8, 13);
            g!($r, 7, 3, 4, 9, 14);
        };
    }

    for r in 0..12 {
        round!(r % 10);
    }

    for i in 0..8 {
        h[i] ^= v[i] ^ v[i + 8];
    }
}

#[cfg(test)]
macro_rules! blake2b_test_case {
    ($name:ty) => {{
        use hex_literal::hex;

        let mut out = [0u8; 64];
        <$name>::hash(&mut out, b"abc", &[]).unwrap();
        assert_eq!(
            out,
            hex!(
                "ba80a53f981c4d0d6a2797b69f12f6e9"
                "4c212f14685ac4b74b12bb6fdbffa2d1"
                "7d87c5392aab792dc252d5de4533cc95"
                "18d38aa8dbf1925ab92386edd4009923"
            )
        );

        // official keyed KAT, entries 0 and 1: ascending max-length key
        let key: [u8; 64] = core::array::from_fn(|i| i as u8);
        <$name>::hash(&mut out, &[], &key).unwrap();
        assert_eq!(
            out,
            hex!(
                "10ebb67700b1868efb4417987acf4690"
                "ae9d972fb7a590c2f02871799aaa4786"
                "b5e996e8f0f4eb981fc214b005f42d2f"
                "f4233499391653df7aefcbc13fc51568"
            )
        );
        <$name>::hash(&mut out, &[0u8], &key).unwrap();
        assert_eq!(
            out,
            hex!(
                "961f6dd1e4dd30f63901690c512e78e4"
                "b45e4742ed197c3c5e45c549fd25f2e4"
                "187b0bc9fe30492b16b0d0bc4ef9b0f3"
                "4c7003fac09a5ef1532e69430234cebd"
            )
        );

        // every chunking of the same message must match the one-shot digest
        let msg: [u8; 256] = core::array::from_fn(|i| i as u8);
        let mut expect = [0u8; 64];
        <$name>::hash(&mut expect, &msg, &key).unwrap();
        for step in 1..<$name>::BLOCK_LEN {
            let mut state = <$name>::with_key(64, &key).unwrap();
            for chunk in msg.chunks(step) {
                state.update(chunk).unwrap();
            }
            let mut got = [0u8; 64];
            state.finalize_into(&mut got).unwrap();
            assert_eq!(got, expect, "chunk size {}", step);
        }
    }};
    () => {
        blake2b_test_case!(Blake2b);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kat_and_streaming() {
        blake2b_test_case!();
    }

    #[test]
    fn rejects_bad_lengths() {
        assert!(Blake2b::new(0).is_err());
        assert!(Blake2b::new(OUT_LEN + 1).is_err());
        assert!(Blake2b::with_key(64, &[]).is_err());
        assert!(Blake2b::with_key(64, &[0u8; KEY_LEN + 1]).is_err());

        let mut empty: [u8; 0] = [];
        let mut out = [0u8; 64];
        assert!(Blake2b::hash(&mut empty, b"abc", &[]).is_err());
        assert!(Blake2b::hash(&mut out, b"abc", &[0u8; KEY_LEN + 1]).is_err());
    }

    #[test]
    fn empty_update_is_a_noop() {
        let mut a = Blake2b::new(64).unwrap();
        let mut b = Blake2b::new(64).unwrap();
        a.update(b"hello").unwrap();
        b.update(b"hello").unwrap();
        b.update(&[]).unwrap();
        let (mut da, mut db) = ([0u8; 64], [0u8; 64]);
        a.finalize_into(&mut da).unwrap();
        b.finalize_into(&mut db).unwrap();
        assert_eq!(da, db);
    }

    #[test]
    fn terminal_state_rejects_reuse() {
        let mut state = Blake2b::new(64).unwrap();
        state.update(b"abc").unwrap();
        let mut out = [0u8; 64];
        state.finalize_into(&mut out).unwrap();
        assert_eq!(state.update(b"more"), Err(Error::InvalidState));
        assert_eq!(state.finalize_into(&mut out), Err(Error::InvalidState));
    }

    #[test]
    fn undersized_output_rejected_untouched() {
        let mut state = Blake2b::new(64).unwrap();
        state.update(b"abc").unwrap();
        let mut small = [0xAAu8; 32];
        assert_eq!(
            state.finalize_into(&mut small),
            Err(Error::InvalidArgument)
        );
        assert_eq!(small, [0xAAu8; 32]);
        // the rejection is not terminal
        let mut out = [0u8; 64];
        state.finalize_into(&mut out).unwrap();
        let mut expect = [0u8; 64];
        Blake2b::hash(&mut expect, b"abc", &[]).unwrap();
        assert_eq!(out, expect);
    }

    #[test]
    fn finalize_wipes_state() {
        let key: [u8; 64] = core::array::from_fn(|i| i as u8);
        let mut state = Blake2b::with_key(64, &key).unwrap();
        state.update(b"secret message").unwrap();
        let mut out = [0u8; 64];
        state.finalize_into(&mut out).unwrap();
        assert_eq!(state.h, [0u64; 8]);
        assert_eq!(state.buf, [0u8; BLOCK_LEN]);
        assert_ne!(state.f[0], 0);
    }

    #[test]
    fn from_param_matches_sequential_init() {
        let param = super::super::sequential_param(64, 0).unwrap();
        let mut a = Blake2b::from_param(&param);
        let mut b = Blake2b::new(64).unwrap();
        a.update(b"tree or not").unwrap();
        b.update(b"tree or not").unwrap();
        let (mut da, mut db) = ([0u8; 64], [0u8; 64]);
        a.finalize_into(&mut da).unwrap();
        b.finalize_into(&mut db).unwrap();
        assert_eq!(da, db);
    }

    #[test]
    fn last_node_changes_the_digest() {
        let param = super::super::sequential_param(64, 0).unwrap();
        let mut plain = Blake2b::from_param(&param);
        let mut last = Blake2b::from_param(&param);
        last.set_last_node(true);
        plain.update(b"leaf").unwrap();
        last.update(b"leaf").unwrap();
        let (mut dp, mut dl) = ([0u8; 64], [0u8; 64]);
        plain.finalize_into(&mut dp).unwrap();
        last.finalize_into(&mut dl).unwrap();
        assert_ne!(dp, dl);
    }

    #[test]
    fn digest_length_is_domain_separating() {
        let mut long = [0u8; 64];
        let mut short = [0u8; 32];
        Blake2b::hash(&mut long, b"abc", &[]).unwrap();
        Blake2b::hash(&mut short, b"abc", &[]).unwrap();
        assert_ne!(&long[..32], &short[..]);
    }
}
