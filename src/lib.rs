//! BLAKE2b and BLAKE2s with runtime-dispatched SIMD backends.
//!
//! Both variants expose the full streaming API (`new` / `with_key` /
//! `from_param` / `update` / `finalize_into`) plus a one-shot `hash`. The
//! exported state types transparently select the fastest implementation the
//! host CPU supports; every backend produces byte-identical output.

pub mod blake2b;
pub mod blake2s;
pub mod error;
pub mod params;
pub mod utils;

pub use error::Error;
pub use params::{Blake2bParam, Blake2sParam};

/// A utility function for creating masks to use with Intel shuffle and
/// permute intrinsics.
#[inline(always)]
#[allow(non_snake_case)]
#[cfg(any(target_arch = "x86_64", target_arch = "x86"))]
pub const fn _MM_SHUFFLE(z: u32, y: u32, x: u32, w: u32) -> i32 {
    ((z << 6) | (y << 4) | (x << 2) | w) as i32
}
