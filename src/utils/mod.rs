mod bench;
mod cpu_name;

pub use cpu_name::cpu_name;

#[inline(always)]
pub(crate) const unsafe fn slice_to_array<T, const N: usize>(slice: &[T]) -> &[T; N] {
    &*(slice.as_ptr() as *const [T; N])
}

/// detect hardware features every time
#[macro_export]
macro_rules! is_hw_feature_detected {
    ($($arch:tt => ($($arch_feat:tt),+)),+$(,)?) => {
        {
            let mut available = false;
            $(
                if cfg!(target_arch = $arch) {
                    if cfg!(all($(target_feature = $arch_feat),+)) {
                        available = true;
                    }
                }
            )+
            if !available {
                #[allow(unused_mut)]
                #[allow(unused_assignments)]
                let mut available = false;
                $(
                    #[cfg(target_arch = $arch)]
                    {
                        available = true;
                        $(
                            #[cfg(any(target_arch = "x86"))]
                            if !is_x86_feature_detected!($arch_feat) {
                                available = false;
                            }
                            #[cfg(any(target_arch = "x86_64"))]
                            if !is_x86_feature_detected!($arch_feat) {
                                available = false;
                            }
                            #[cfg(all(target_arch = "aarch64"))]
                            {
                                use std::arch::is_aarch64_feature_detected;
                                if !is_aarch64_feature_detected!($arch_feat) {
                                    available = false;
                                }
                            }
                        )+
                    }
                )+
                available
            } else {
                true
            }
        }
    };
}

/// Converts a size in bytes to a human-readable string. For benchmarking
pub fn human_readable_size(size: usize) -> String {
    let mut cal_size = size;
    let mut unit = 0;
    while cal_size >= 1024 {
        cal_size >>= 10;
        unit += 1;
    }
    let unit = match unit {
        0 => "B",
        1 => "KiB",
        2 => "MiB",
        3 => "GiB",
        4 => "TiB",
        _ => {
            cal_size = size;
            "B"
        }
    };
    format!("{} {}", cal_size, unit)
}
