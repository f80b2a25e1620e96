//! SSE2 conversion kernels (x86 / x86_64)
//!
//! Each iteration loads 16 scalars (8 complex samples) into four `__m128`
//! registers and produces one 16-byte store:
//!
//! 1. zero NaN lanes (ordered compare mask)
//! 2. clip with `minps` / `maxps` against `[-128, 127]`
//! 3. `cvtps2dq` to nearest integer (ties to even under the default MXCSR mode)
//! 4. `packssdw` then `packsswb` down to 8 bits
//!
//! The saturating packs cannot change anything since every lane is already in
//! range after step 2. Scalars left after the last full group go through the
//! reference formula.
//!
//! This module is only compiled when SSE2 is statically enabled for the target,
//! which is always the case on x86_64.

#[cfg(target_arch = "x86")]
use std::arch::x86::*;
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::*;

use super::reference::convert_scalars;
use crate::buffer::{AlignedSlice, AlignedSliceMut};
use crate::types::{
    float_scalars, int8_scalars_mut, Complex32, ComplexI8, CLIP_MAX, CLIP_MIN, GROUP_SCALARS,
};

/// Unaligned SSE2 kernel
///
/// Same contract as [`convert_scalar`](super::reference::convert_scalar),
/// with no requirement on buffer addresses.
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert_sse2(output: &mut [ComplexI8], input: &[Complex32], count: usize) {
    let input = float_scalars(&input[..count]);
    let output = int8_scalars_mut(&mut output[..count]);
    convert_groups::<false>(output, input);
}

/// Aligned SSE2 kernel
///
/// Both views are 16-byte aligned by construction, which allows `movaps` loads
/// and `movdqa` stores. Every group advances the input by 64 bytes and the
/// output by 16 bytes, so alignment holds for every iteration.
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert_sse2_aligned(
    mut output: AlignedSliceMut<'_, ComplexI8>,
    input: AlignedSlice<'_, Complex32>,
    count: usize,
) {
    let input = float_scalars(&input[..count]);
    let output = int8_scalars_mut(&mut output[..count]);
    convert_groups::<true>(output, input);
}

/// `ALIGNED` must only be `true` when both slices start on a 16-byte boundary.
#[inline(always)]
fn convert_groups<const ALIGNED: bool>(output: &mut [i8], input: &[f32]) {
    debug_assert_eq!(output.len(), input.len());

    let groups = input.chunks_exact(GROUP_SCALARS);
    let tail_start = input.len() - groups.remainder().len();

    for (src, dst) in groups.zip(output.chunks_exact_mut(GROUP_SCALARS)) {
        let ptr = src.as_ptr();
        // SAFETY: `src` holds 16 floats and `dst` 16 bytes, so all four loads
        // and the store stay in bounds. The aligned forms are only chosen when
        // the caller holds aligned views, and group strides keep alignment.
        unsafe {
            let lanes = if ALIGNED {
                [
                    _mm_load_ps(ptr),
                    _mm_load_ps(ptr.add(4)),
                    _mm_load_ps(ptr.add(8)),
                    _mm_load_ps(ptr.add(12)),
                ]
            } else {
                [
                    _mm_loadu_ps(ptr),
                    _mm_loadu_ps(ptr.add(4)),
                    _mm_loadu_ps(ptr.add(8)),
                    _mm_loadu_ps(ptr.add(12)),
                ]
            };
            let packed = clip_round_pack(lanes);
            let out = dst.as_mut_ptr().cast::<__m128i>();
            if ALIGNED {
                _mm_store_si128(out, packed);
            } else {
                _mm_storeu_si128(out, packed);
            }
        }
    }

    convert_scalars(&mut output[tail_start..], &input[tail_start..]);
}

#[inline(always)]
fn clip_round_pack(lanes: [__m128; 4]) -> __m128i {
    // SAFETY: register-only SSE2 arithmetic, SSE2 is enabled for this target
    unsafe {
        let vmin = _mm_set1_ps(CLIP_MIN);
        let vmax = _mm_set1_ps(CLIP_MAX);
        let [a, b, c, d] = lanes.map(|v| {
            let v = _mm_and_ps(v, _mm_cmpord_ps(v, v));
            _mm_cvtps_epi32(_mm_max_ps(_mm_min_ps(v, vmax), vmin))
        });
        _mm_packs_epi16(_mm_packs_epi32(a, b), _mm_packs_epi32(c, d))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::AlignedVec;
    use crate::kernels::reference::convert_scalar;

    fn ramp(count: usize) -> Vec<Complex32> {
        (0..count)
            .map(|i| {
                let x = i as f32 * 3.75 - 160.0;
                Complex32::new(x, -x * 0.5 + 0.5)
            })
            .collect()
    }

    #[test]
    fn test_sse2_matches_reference_all_remainders() {
        for count in 0..40 {
            let input = ramp(count);
            let mut expected = vec![ComplexI8::new(0, 0); count];
            let mut actual = vec![ComplexI8::new(0, 0); count];
            convert_scalar(&mut expected, &input, count);
            convert_sse2(&mut actual, &input, count);
            assert_eq!(actual, expected, "count {}", count);
        }
    }

    #[test]
    fn test_sse2_aligned_matches_reference() {
        for count in [0usize, 1, 7, 8, 9, 16, 23, 64, 100] {
            let input = AlignedVec::from_slice(&ramp(count));
            let mut actual = AlignedVec::<ComplexI8>::zeroed(count);
            let mut expected = vec![ComplexI8::new(0, 0); count];
            convert_scalar(&mut expected, &input, count);
            convert_sse2_aligned(actual.aligned_mut(), input.aligned(), count);
            assert_eq!(actual.as_slice(), expected.as_slice(), "count {}", count);
        }
    }

    #[test]
    fn test_sse2_unaligned_offset_buffers() {
        // Start one sample into aligned storage to force misaligned addresses
        let count = 37;
        let storage = AlignedVec::from_slice(&ramp(count + 1));
        let input = &storage[1..];
        let mut out_storage = vec![ComplexI8::new(0, 0); count + 3];
        let mut expected = vec![ComplexI8::new(0, 0); count];
        convert_scalar(&mut expected, input, count);
        convert_sse2(&mut out_storage[3..], input, count);
        assert_eq!(&out_storage[3..], expected.as_slice());
    }

    #[test]
    fn test_sse2_special_values_in_vector_body() {
        let input = vec![
            Complex32::new(f32::NAN, f32::INFINITY),
            Complex32::new(f32::NEG_INFINITY, -0.0),
            Complex32::new(0.5, 1.5),
            Complex32::new(2.5, -2.5),
            Complex32::new(126.5, -127.5),
            Complex32::new(127.0, -128.0),
            Complex32::new(1.0e30, -1.0e30),
            Complex32::new(-f32::NAN, 3.0),
        ];
        let mut output = vec![ComplexI8::new(1, 1); 8];
        convert_sse2(&mut output, &input, 8);
        assert_eq!(
            output,
            vec![
                ComplexI8::new(0, 127),
                ComplexI8::new(-128, 0),
                ComplexI8::new(0, 2),
                ComplexI8::new(2, -2),
                ComplexI8::new(126, -128),
                ComplexI8::new(127, -128),
                ComplexI8::new(127, -128),
                ComplexI8::new(0, 3),
            ]
        );
    }
}
