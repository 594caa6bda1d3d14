use std::sync::OnceLock;

cfg_if::cfg_if! {
    if #[cfg(any(target_arch = "x86_64", target_arch = "x86"))] {
        /// Get the CPU name from CPUID on x86 and x86_64.
        pub fn cpu_name() -> &'static str {
            static NAME: OnceLock<String> = OnceLock::new();
            NAME.get_or_init(|| {
                #[cfg(target_arch = "x86_64")]
                use std::arch::x86_64::__cpuid;
                #[cfg(target_arch = "x86")]
                use std::arch::x86::__cpuid;

                let mut brand_string = [0u8; 48];
                unsafe {
                    for i in 0..3 {
                        let cpuid_result = __cpuid(0x80000002 + i);
                        let i = i as usize;
                        brand_string[i * 16..i * 16 + 4].copy_from_slice(&cpuid_result.eax.to_ne_bytes());
                        brand_string[i * 16 + 4..i * 16 + 8].copy_from_slice(&cpuid_result.ebx.to_ne_bytes());
                        brand_string[i * 16 + 8..i * 16 + 12].copy_from_slice(&cpuid_result.ecx.to_ne_bytes());
                        brand_string[i * 16 + 12..i * 16 + 16].copy_from_slice(&cpuid_result.edx.to_ne_bytes());
                    }
                }
                String::from_utf8_lossy(&brand_string).trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string()
            }).as_str()
        }
    } else if #[cfg(target_os = "linux")] {
        /// Get the CPU name from /proc/cpuinfo or /proc/device-tree/model on Linux.
        pub fn cpu_name() -> &'static str {
            static NAME: OnceLock<String> = OnceLock::new();
            NAME.get_or_init(|| {
                use std::path::Path;
                use std::fs;
                use std::io::BufReader;
                use std::io::BufRead;
                let path = Path::new("/proc/device-tree/model");

                if let Ok(content) = fs::read_to_string(&path) {
                    return content.trim_end_matches('\0').to_string();
                }
                let path = Path::new("/proc/cpuinfo");
                if let Ok(file) = fs::File::open(&path) {
                    for line in BufReader::new(file).lines() {
                        if let Ok(line) = line {
                            if line.starts_with("model name") || line.starts_with("Hardware") {
                                let parts: Vec<&str> = line.split(':').collect();
                                if parts.len() == 2 {
                                    return parts[1].trim_matches(|c: char| c.is_whitespace() || c == '\0').to_string();
                                }
                            }
                        }
                    }
                }
                "Unknown CPU".to_string()
            }).as_str()
        }
    } else {
        pub fn cpu_name() -> &'static str {
            "Unknown CPU"
        }
    }
}
