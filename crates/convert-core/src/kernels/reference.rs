//! Reference conversion kernel
//!
//! This is the ground truth every accelerated variant is checked against.
//!
//! ## Algorithm
//!
//! For every interleaved scalar `x`:
//!
//! ```text
//! clamped = max(min(x, 127), -128)
//! output  = round_half_to_even(clamped)
//! ```
//!
//! - Clipping comes before rounding, so `130.4` maps to `127` rather than
//!   wrapping.
//! - Ties round to even: `5.5 -> 6`, `-2.5 -> -2`, `126.5 -> 126`.
//! - `NaN` maps to `0`. Infinities saturate like any other out-of-range value.

use crate::types::{float_scalars, int8_scalars_mut, Complex32, ComplexI8, CLIP_MAX, CLIP_MIN};

/// Convert one scalar with saturation and round-half-to-even
///
/// # Examples
///
/// ```
/// use sigconv_convert_core::kernels::reference::convert_sample;
///
/// assert_eq!(convert_sample(130.4), 127);
/// assert_eq!(convert_sample(-200.0), -128);
/// assert_eq!(convert_sample(5.5), 6);
/// assert_eq!(convert_sample(-2.5), -2);
/// assert_eq!(convert_sample(f32::NAN), 0);
/// ```
#[inline]
pub fn convert_sample(x: f32) -> i8 {
    if x.is_nan() {
        return 0;
    }
    // The clamped value is integral-or-between in [-128, 127], so the cast is exact
    x.min(CLIP_MAX).max(CLIP_MIN).round_ties_even() as i8
}

/// Scalar loop over interleaved buffers of equal length
///
/// Also serves as the tail path of the vector kernels.
#[inline]
pub(crate) fn convert_scalars(output: &mut [i8], input: &[f32]) {
    debug_assert_eq!(output.len(), input.len());
    for (out, &x) in output.iter_mut().zip(input) {
        *out = convert_sample(x);
    }
}

/// Convert the first `count` complex samples of `input` into `output`
///
/// Samples of `output` past `count` are left untouched.
///
/// # Panics
///
/// Panics if either buffer holds fewer than `count` samples.
pub fn convert_scalar(output: &mut [ComplexI8], input: &[Complex32], count: usize) {
    let input = float_scalars(&input[..count]);
    let output = int8_scalars_mut(&mut output[..count]);
    convert_scalars(output, input);
}
