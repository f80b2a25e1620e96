//! Sample types, range constants and scalar views
//!
//! Buffers are interleaved I/Q: a slice of `N` complex samples is laid out
//! in memory as `2 * N` scalars. The view functions here expose that flat
//! layout through `bytemuck` casts instead of raw pointer arithmetic.

use num_complex::Complex;

pub use num_complex::Complex32;

/// Complex sample with signed 8-bit components
pub type ComplexI8 = Complex<i8>;

/// Lower clipping bound, `i8::MIN` as a float
pub const CLIP_MIN: f32 = i8::MIN as f32;

/// Upper clipping bound, `i8::MAX` as a float
pub const CLIP_MAX: f32 = i8::MAX as f32;

/// Byte boundary required by the aligned kernels
pub const VECTOR_ALIGNMENT: usize = 16;

/// Scalars consumed per vector iteration (four 4-lane float registers)
pub const GROUP_SCALARS: usize = 16;

/// Complex samples consumed per vector iteration
pub const GROUP_SAMPLES: usize = GROUP_SCALARS / 2;

/// View a complex float buffer as its interleaved scalars
#[inline]
pub fn float_scalars(samples: &[Complex32]) -> &[f32] {
    bytemuck::cast_slice(samples)
}

/// View a complex int8 buffer as its interleaved scalars
#[inline]
pub fn int8_scalars(samples: &[ComplexI8]) -> &[i8] {
    bytemuck::cast_slice(samples)
}

/// Mutable interleaved view of a complex int8 buffer
#[inline]
pub fn int8_scalars_mut(samples: &mut [ComplexI8]) -> &mut [i8] {
    bytemuck::cast_slice_mut(samples)
}

/// Check whether `ptr` sits on the vector alignment boundary
#[inline]
pub fn is_vector_aligned<T>(ptr: *const T) -> bool {
    (ptr as usize) % VECTOR_ALIGNMENT == 0
}
