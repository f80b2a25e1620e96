//! # Convert-Core: Complex Float to Complex Int8 Conversion Kernels
//!
//! Converts interleaved I/Q buffers of `Complex<f32>` into `Complex<i8>` with
//! saturating clipping to `[-128, 127]` followed by round-half-to-even. This
//! is the narrowing step a streaming receiver runs on every scheduling tick
//! before 8-bit acquisition and tracking math.
//!
//! ## Implementations
//!
//! - **generic**: the scalar reference that defines the semantics
//! - **u_sse2** / **a_sse2**: x86 SSE2, unaligned and 16-byte aligned
//! - **u_neon**: AArch64 NEON
//!
//! All implementations produce byte-identical output for every input,
//! including `NaN` (mapped to `0`) and infinities (saturated).
//!
//! ## Usage
//!
//! ```rust
//! use sigconv_convert_core::{Complex32, ComplexI8, KernelRegistry};
//!
//! let registry = KernelRegistry::detect();
//!
//! let input = [Complex32::new(130.4, -200.0), Complex32::new(5.5, 127.6)];
//! let mut output = [ComplexI8::new(0, 0); 2];
//! registry.convert(&mut output, &input, input.len());
//!
//! assert_eq!(output, [ComplexI8::new(127, -128), ComplexI8::new(6, 127)]);
//! ```
//!
//! Aligned buffers come from [`AlignedVec`]; the registry picks the aligned
//! kernel automatically when both buffers qualify.
//!
//! ## Real-time use
//!
//! Kernels never allocate, lock, block or log. They are safe to call
//! concurrently on disjoint buffers.

#![deny(missing_docs)]

pub mod buffer;
pub mod dispatch;
pub mod error;
pub mod kernels;
pub mod types;
pub mod utils;

use std::sync::OnceLock;

pub use buffer::{AlignedSlice, AlignedSliceMut, AlignedVec};
pub use dispatch::{KernelRegistry, DEFAULT_PARALLEL_CHUNK};
pub use error::{ConvertError, ErrorCategory, Result};
pub use kernels::{Capability, KernelDescriptor, KernelFn};
pub use types::{Complex32, ComplexI8, VECTOR_ALIGNMENT};

/// Version information for the conversion library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

static DEFAULT_REGISTRY: OnceLock<KernelRegistry> = OnceLock::new();

/// Process-wide registry built from detected CPU capabilities
pub fn registry() -> &'static KernelRegistry {
    DEFAULT_REGISTRY.get_or_init(KernelRegistry::detect)
}

/// Convert `count` samples with the process-wide registry
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert(output: &mut [ComplexI8], input: &[Complex32], count: usize) {
    registry().convert(output, input, count);
}

/// Convert `count` samples on the rayon pool with the process-wide registry
///
/// Uses chunks of [`DEFAULT_PARALLEL_CHUNK`] samples. Meant for bulk work such
/// as offline file conversion, not for real-time threads.
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert_parallel(output: &mut [ComplexI8], input: &[Complex32], count: usize) {
    registry().convert_parallel(output, input, count, DEFAULT_PARALLEL_CHUNK);
}

/// Initialize the conversion library
///
/// Installs a default `tracing` subscriber if none is set, probes SIMD
/// support and builds the process-wide registry. Safe to call multiple
/// times.
///
/// # Errors
///
/// Currently always succeeds; the signature leaves room for probes that can fail.
pub fn init() -> Result<()> {
    // Initialize logging if not already done
    let _ = tracing_subscriber::fmt::try_init();

    utils::init_simd_support();
    let registry = registry();

    tracing::info!("Convert-Core v{} initialized", VERSION);
    tracing::info!(
        "Kernels: unaligned={}, aligned={}",
        registry.selected_unaligned().name,
        registry.selected_aligned().map_or("none", |k| k.name)
    );

    Ok(())
}

/// Get library information
pub fn info() -> LibraryInfo {
    let registry = registry();
    LibraryInfo {
        version: VERSION,
        kernels: registry.kernels().iter().map(|k| k.name).collect(),
        simd_support: registry.support(),
    }
}

/// Library information structure
#[derive(Debug, Clone)]
pub struct LibraryInfo {
    /// Library version
    pub version: &'static str,
    /// Kernels runnable on this host
    pub kernels: Vec<&'static str>,
    /// SIMD support information
    pub simd_support: utils::SimdSupport,
}
