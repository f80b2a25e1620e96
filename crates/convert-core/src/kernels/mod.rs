//! Conversion kernel implementations
//!
//! Every kernel converts `count` complex float samples to complex int8 with
//! the same numeric result; they differ only in how many lanes they process
//! at once and in what they require of the buffers. [`KERNELS`] lists each
//! compiled implementation together with the CPU capability it needs, so a
//! selection layer can pick one without the kernels knowing about hardware.

use std::fmt;

use crate::buffer::{AlignedSlice, AlignedSliceMut};
use crate::types::{Complex32, ComplexI8};
use crate::utils::SimdSupport;

pub mod reference;

#[cfg(all(
    feature = "simd",
    any(target_arch = "x86", target_arch = "x86_64"),
    target_feature = "sse2"
))]
pub mod sse2;

#[cfg(all(feature = "simd", target_arch = "aarch64", target_feature = "neon"))]
pub mod neon;

/// Kernel with no alignment precondition
pub type UnalignedKernel = fn(&mut [ComplexI8], &[Complex32], usize);

/// Kernel that requires vector-aligned input and output
pub type AlignedKernel = for<'o, 'i> fn(AlignedSliceMut<'o, ComplexI8>, AlignedSlice<'i, Complex32>, usize);

/// Function-shaped entry point of a kernel
#[derive(Clone, Copy)]
pub enum KernelFn {
    /// Works on any buffer address
    Unaligned(UnalignedKernel),
    /// Needs both buffers on the vector alignment boundary
    Aligned(AlignedKernel),
}

impl KernelFn {
    /// Whether this entry point needs aligned buffers
    pub fn requires_alignment(&self) -> bool {
        matches!(self, Self::Aligned(_))
    }
}

impl fmt::Debug for KernelFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unaligned(_) => write!(f, "Unaligned"),
            Self::Aligned(_) => write!(f, "Aligned"),
        }
    }
}

/// CPU capability a kernel depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Portable scalar code
    Generic,
    /// x86 SSE2
    Sse2,
    /// AArch64 NEON
    Neon,
}

impl Capability {
    /// Get the capability name
    pub fn name(&self) -> &'static str {
        match self {
            Self::Generic => "generic",
            Self::Sse2 => "sse2",
            Self::Neon => "neon",
        }
    }

    /// Check whether a host with `support` can run kernels needing this capability
    pub fn is_available(&self, support: &SimdSupport) -> bool {
        match self {
            Self::Generic => true,
            Self::Sse2 => support.sse2,
            Self::Neon => support.neon,
        }
    }

    /// Selection preference, higher wins
    pub fn rank(&self) -> u8 {
        match self {
            Self::Generic => 0,
            Self::Sse2 | Self::Neon => 1,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Capability-tagged kernel entry
#[derive(Debug, Clone, Copy)]
pub struct KernelDescriptor {
    /// Unique kernel name
    pub name: &'static str,
    /// Capability the kernel needs
    pub capability: Capability,
    /// Entry point
    pub kernel: KernelFn,
}

/// Every kernel compiled into this build
pub const KERNELS: &[KernelDescriptor] = &[
    KernelDescriptor {
        name: "generic",
        capability: Capability::Generic,
        kernel: KernelFn::Unaligned(reference::convert_scalar),
    },
    #[cfg(all(
        feature = "simd",
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2"
    ))]
    KernelDescriptor {
        name: "u_sse2",
        capability: Capability::Sse2,
        kernel: KernelFn::Unaligned(sse2::convert_sse2),
    },
    #[cfg(all(
        feature = "simd",
        any(target_arch = "x86", target_arch = "x86_64"),
        target_feature = "sse2"
    ))]
    KernelDescriptor {
        name: "a_sse2",
        capability: Capability::Sse2,
        kernel: KernelFn::Aligned(sse2::convert_sse2_aligned),
    },
    #[cfg(all(feature = "simd", target_arch = "aarch64", target_feature = "neon"))]
    KernelDescriptor {
        name: "u_neon",
        capability: Capability::Neon,
        kernel: KernelFn::Unaligned(neon::convert_neon),
    },
];

/// Look up a compiled kernel by name, regardless of host support
pub fn find_kernel(name: &str) -> Option<&'static KernelDescriptor> {
    KERNELS.iter().find(|k| k.name == name)
}
