//! Kernel selection and dispatch
//!
//! [`KernelRegistry`] holds the kernels the host can run and picks one per
//! call: the aligned kernel when both buffers sit on the vector boundary,
//! otherwise the best unaligned one. Selection is decided from cached CPU
//! detection at construction time; per-call work is two address checks.

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::buffer::{AlignedSlice, AlignedSliceMut};
use crate::error::{ConvertError, Result};
use crate::kernels::{
    find_kernel, reference, AlignedKernel, KernelDescriptor, KernelFn, UnalignedKernel, KERNELS,
};
use crate::types::{Complex32, ComplexI8, GROUP_SAMPLES};
use crate::utils::{get_simd_support, SimdSupport};

/// Default chunk size for [`KernelRegistry::convert_parallel`], in samples
pub const DEFAULT_PARALLEL_CHUNK: usize = 64 * 1024;

/// Set of kernels runnable on a given host
#[derive(Debug, Clone)]
pub struct KernelRegistry {
    support: SimdSupport,
    kernels: Vec<KernelDescriptor>,
    unaligned: KernelDescriptor,
    aligned: Option<KernelDescriptor>,
}

impl KernelRegistry {
    /// Build a registry from the detected CPU capabilities
    pub fn detect() -> Self {
        Self::with_support(get_simd_support())
    }

    /// Build a registry for an explicit capability set
    ///
    /// Kernels that are not compiled into this build are never listed, even
    /// if `support` claims the capability.
    pub fn with_support(support: SimdSupport) -> Self {
        let kernels: Vec<KernelDescriptor> = KERNELS
            .iter()
            .filter(|k| k.capability.is_available(&support))
            .copied()
            .collect();

        let unaligned = kernels
            .iter()
            .filter(|k| !k.kernel.requires_alignment())
            .max_by_key(|k| k.capability.rank())
            .copied()
            .unwrap_or(KERNELS[0]);
        let aligned = kernels
            .iter()
            .filter(|k| k.kernel.requires_alignment())
            .max_by_key(|k| k.capability.rank())
            .copied();

        debug!(
            "Kernel registry: {:?} available, unaligned={}, aligned={}",
            kernels.iter().map(|k| k.name).collect::<Vec<_>>(),
            unaligned.name,
            aligned.map_or("none", |k| k.name)
        );

        Self {
            support,
            kernels,
            unaligned,
            aligned,
        }
    }

    /// Capabilities this registry was built for
    pub fn support(&self) -> SimdSupport {
        self.support
    }

    /// Kernels runnable on this host
    pub fn kernels(&self) -> &[KernelDescriptor] {
        &self.kernels
    }

    /// Kernel used for buffers without an alignment guarantee
    pub fn selected_unaligned(&self) -> &KernelDescriptor {
        &self.unaligned
    }

    /// Kernel used when both buffers are aligned, if any
    pub fn selected_aligned(&self) -> Option<&KernelDescriptor> {
        self.aligned.as_ref()
    }

    /// Look up a runnable kernel by name
    ///
    /// # Errors
    ///
    /// [`ConvertError::UnsupportedCapability`] if the kernel is compiled in but
    /// the host lacks its capability, [`ConvertError::UnsupportedKernel`] if no
    /// kernel has that name.
    pub fn by_name(&self, name: &str) -> Result<&KernelDescriptor> {
        if let Some(kernel) = self.kernels.iter().find(|k| k.name == name) {
            return Ok(kernel);
        }
        match find_kernel(name) {
            Some(k) => Err(ConvertError::unsupported_capability(k.capability.name())),
            None => Err(ConvertError::unsupported_kernel(name)),
        }
    }

    /// Best unaligned entry point
    pub fn unaligned_fn(&self) -> UnalignedKernel {
        match self.unaligned.kernel {
            KernelFn::Unaligned(f) => f,
            KernelFn::Aligned(_) => reference::convert_scalar,
        }
    }

    /// Best aligned entry point, if the host has one
    pub fn aligned_fn(&self) -> Option<AlignedKernel> {
        match self.aligned?.kernel {
            KernelFn::Aligned(f) => Some(f),
            KernelFn::Unaligned(_) => None,
        }
    }

    /// Convert `count` samples with the best kernel for these buffers
    ///
    /// # Panics
    ///
    /// Panics if either buffer holds fewer than `count` samples.
    pub fn convert(&self, output: &mut [ComplexI8], input: &[Complex32], count: usize) {
        let output = &mut output[..count];
        let input = &input[..count];

        if let Some(kernel) = self.aligned_fn() {
            if let (Ok(out), Ok(inp)) = (AlignedSliceMut::new(&mut *output), AlignedSlice::new(input)) {
                return kernel(out, inp, count);
            }
        }

        (self.unaligned_fn())(output, input, count)
    }

    /// Checked variant of [`convert`](Self::convert)
    ///
    /// # Errors
    ///
    /// Returns [`ConvertError::BufferTooSmall`] if either buffer holds fewer
    /// than `count` samples. Nothing is written in that case.
    pub fn try_convert(
        &self,
        output: &mut [ComplexI8],
        input: &[Complex32],
        count: usize,
    ) -> Result<()> {
        let available = output.len().min(input.len());
        if available < count {
            return Err(ConvertError::BufferTooSmall {
                needed: count,
                actual: available,
            });
        }
        self.convert(output, input, count);
        Ok(())
    }

    /// Convert `count` samples on the rayon pool in disjoint chunks
    ///
    /// `chunk_samples` is capped at `count` and rounded up to a whole number of
    /// vector groups so an aligned buffer stays aligned at every chunk start.
    /// Passing `usize::MAX` converts everything as one chunk. Output is
    /// identical to a single [`convert`](Self::convert) call.
    ///
    /// # Panics
    ///
    /// Panics if either buffer holds fewer than `count` samples.
    pub fn convert_parallel(
        &self,
        output: &mut [ComplexI8],
        input: &[Complex32],
        count: usize,
        chunk_samples: usize,
    ) {
        // `count` is bounded by the slice length, so rounding it up cannot overflow
        let chunk = chunk_samples.clamp(1, count.max(1)).next_multiple_of(GROUP_SAMPLES);
        trace!("parallel convert of {} samples in chunks of {}", count, chunk);
        output[..count]
            .par_chunks_mut(chunk)
            .zip(input[..count].par_chunks(chunk))
            .for_each(|(out, inp)| self.convert(out, inp, inp.len()));
    }
}

impl Default for KernelRegistry {
    fn default() -> Self {
        Self::detect()
    }
}
