//! NEON conversion kernel (AArch64)
//!
//! Same group shape as the SSE2 kernel: four `float32x4_t` loads per
//! iteration, one 16-byte store. `fcvtns` always rounds ties to even, so no
//! floating-point control state is involved. NEON loads have no separate
//! aligned form, so there is only one variant.

use std::arch::aarch64::*;

use super::reference::convert_scalars;
use crate::types::{
    float_scalars, int8_scalars_mut, Complex32, ComplexI8, CLIP_MAX, CLIP_MIN, GROUP_SCALARS,
};

/// NEON kernel, no alignment requirement
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert_neon(output: &mut [ComplexI8], input: &[Complex32], count: usize) {
    let input = float_scalars(&input[..count]);
    let output = int8_scalars_mut(&mut output[..count]);

    let groups = input.chunks_exact(GROUP_SCALARS);
    let tail_start = input.len() - groups.remainder().len();

    for (src, dst) in groups.zip(output.chunks_exact_mut(GROUP_SCALARS)) {
        let ptr = src.as_ptr();
        // SAFETY: `src` holds 16 floats and `dst` 16 bytes; NEON is part of
        // the AArch64 baseline this module is compiled for.
        unsafe {
            let a = clip_round(vld1q_f32(ptr));
            let b = clip_round(vld1q_f32(ptr.add(4)));
            let c = clip_round(vld1q_f32(ptr.add(8)));
            let d = clip_round(vld1q_f32(ptr.add(12)));

            let ab = vcombine_s16(vqmovn_s32(a), vqmovn_s32(b));
            let cd = vcombine_s16(vqmovn_s32(c), vqmovn_s32(d));
            vst1q_s8(dst.as_mut_ptr(), vcombine_s8(vqmovn_s16(ab), vqmovn_s16(cd)));
        }
    }

    convert_scalars(&mut output[tail_start..], &input[tail_start..]);
}

#[inline(always)]
unsafe fn clip_round(v: float32x4_t) -> int32x4_t {
    // SAFETY: register-only NEON arithmetic
    unsafe {
        // `v == v` is false only for NaN lanes
        let ordered = vceqq_f32(v, v);
        let v = vreinterpretq_f32_u32(vandq_u32(vreinterpretq_u32_f32(v), ordered));
        let clipped = vmaxq_f32(vminq_f32(v, vdupq_n_f32(CLIP_MAX)), vdupq_n_f32(CLIP_MIN));
        vcvtnq_s32_f32(clipped)
    }
}
