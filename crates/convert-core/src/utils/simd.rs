//! SIMD capability detection
//!
//! Probed once per process and cached. The kernels never consult this
//! themselves; only the dispatch registry does.

use std::sync::OnceLock;

/// SIMD support information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimdSupport {
    /// x86/x86_64 SSE2 support
    pub sse2: bool,
    /// AArch64 NEON support
    pub neon: bool,
}

impl SimdSupport {
    /// No vector capability at all (reference kernel only)
    pub const fn none() -> Self {
        Self {
            sse2: false,
            neon: false,
        }
    }
}

/// Global SIMD support detection
static SIMD_SUPPORT: OnceLock<SimdSupport> = OnceLock::new();

/// Initialize SIMD support detection
pub fn init_simd_support() {
    SIMD_SUPPORT.get_or_init(detect_simd_support);
}

fn detect_simd_support() -> SimdSupport {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    {
        SimdSupport {
            sse2: std::arch::is_x86_feature_detected!("sse2"),
            neon: false,
        }
    }
    #[cfg(target_arch = "aarch64")]
    {
        SimdSupport {
            sse2: false,
            neon: std::arch::is_aarch64_feature_detected!("neon"),
        }
    }
    #[cfg(not(any(target_arch = "x86", target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdSupport::none()
    }
}

/// Get SIMD support information
pub fn get_simd_support() -> SimdSupport {
    *SIMD_SUPPORT.get_or_init(detect_simd_support)
}

/// Check if any SIMD support is available
pub fn has_simd_support() -> bool {
    let support = get_simd_support();
    support.sse2 || support.neon
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simd_support_detection() {
        init_simd_support();
        let support = get_simd_support();

        // SSE2 is part of the x86_64 baseline
        #[cfg(target_arch = "x86_64")]
        assert!(support.sse2);

        #[cfg(target_arch = "aarch64")]
        assert!(support.neon);

        assert_eq!(has_simd_support(), support.sse2 || support.neon);
    }

    #[test]
    fn test_none_has_no_capabilities() {
        assert_eq!(SimdSupport::none(), SimdSupport::default());
    }
}
