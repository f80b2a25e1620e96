//! Utility functions for the conversion library

pub mod simd;

pub use simd::{get_simd_support, has_simd_support, init_simd_support, SimdSupport};
