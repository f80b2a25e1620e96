//! Cross-implementation equivalence tests
//!
//! Every kernel runnable on the host must produce byte-identical output to
//! the scalar reference, for any length and any input, including NaN and
//! infinities.

use proptest::prelude::*;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use sigconv_convert_core::kernels::reference::{convert_sample, convert_scalar};
use sigconv_convert_core::types::{float_scalars, int8_scalars};
use sigconv_convert_core::{
    AlignedVec, Complex32, ComplexI8, KernelDescriptor, KernelFn, KernelRegistry,
};

/// Run one kernel on aligned copies of `input`, whatever its entry point
fn run_kernel(kernel: &KernelDescriptor, input: &[Complex32]) -> Vec<ComplexI8> {
    let count = input.len();
    let input = AlignedVec::from_slice(input);
    let mut output = AlignedVec::<ComplexI8>::zeroed(count);
    match kernel.kernel {
        KernelFn::Unaligned(f) => f(&mut output, &input, count),
        KernelFn::Aligned(f) => f(output.aligned_mut(), input.aligned(), count),
    }
    output.to_vec()
}

fn run_reference(input: &[Complex32]) -> Vec<ComplexI8> {
    let mut output = vec![ComplexI8::new(0, 0); input.len()];
    convert_scalar(&mut output, input, input.len());
    output
}

fn random_samples(rng: &mut SmallRng, count: usize, spread: f32) -> Vec<Complex32> {
    (0..count)
        .map(|_| Complex32::new(rng.gen_range(-spread..spread), rng.gen_range(-spread..spread)))
        .collect()
}

#[test]
fn test_documented_scenario_on_every_kernel() {
    let registry = KernelRegistry::detect();
    let input = [Complex32::new(130.4, -200.0), Complex32::new(5.5, 127.6)];
    for kernel in registry.kernels() {
        let output = run_kernel(kernel, &input);
        assert_eq!(int8_scalars(&output), &[127, -128, 6, 127], "kernel {}", kernel.name);
    }
}

#[test]
fn test_every_kernel_matches_reference_for_all_small_lengths() {
    let registry = KernelRegistry::detect();
    let mut rng = SmallRng::seed_from_u64(0x5eed);
    for count in 0..=70 {
        let input = random_samples(&mut rng, count, 300.0);
        let expected = run_reference(&input);
        for kernel in registry.kernels() {
            assert_eq!(
                run_kernel(kernel, &input),
                expected,
                "kernel {} count {}",
                kernel.name,
                count
            );
        }
    }
}

#[test]
fn test_exhaustive_half_steps_across_range() {
    // Every multiple of 0.25 from -140 to 140 covers all ties, both clip edges
    // and the values just outside them
    let scalars: Vec<f32> = (-560..=560).map(|i| i as f32 * 0.25).collect();
    let input: Vec<Complex32> = scalars
        .chunks_exact(2)
        .map(|pair| Complex32::new(pair[0], pair[1]))
        .collect();
    let expected = run_reference(&input);

    for (x, &y) in float_scalars(&input).iter().zip(int8_scalars(&expected)) {
        let clamped = x.clamp(-128.0, 127.0);
        assert_eq!(y as f32, clamped.round_ties_even(), "input {}", x);
    }

    let registry = KernelRegistry::detect();
    for kernel in registry.kernels() {
        assert_eq!(run_kernel(kernel, &input), expected, "kernel {}", kernel.name);
    }
}

#[test]
fn test_non_finite_values_in_body_and_tail() {
    let specials = [f32::NAN, f32::INFINITY, f32::NEG_INFINITY, -0.0, f32::MIN_POSITIVE];
    // 13 samples: one full group of 8 plus a 5-sample tail
    let input: Vec<Complex32> = (0..13)
        .map(|i| Complex32::new(specials[i % specials.len()], specials[(i + 2) % specials.len()]))
        .collect();
    let expected = run_reference(&input);
    for (x, &y) in float_scalars(&input).iter().zip(int8_scalars(&expected)) {
        let want = if x.is_nan() {
            0
        } else if *x == f32::INFINITY {
            127
        } else if *x == f32::NEG_INFINITY {
            -128
        } else {
            0
        };
        assert_eq!(y, want, "input {}", x);
    }

    let registry = KernelRegistry::detect();
    for kernel in registry.kernels() {
        assert_eq!(run_kernel(kernel, &input), expected, "kernel {}", kernel.name);
    }
}

#[test]
fn test_registry_dispatch_on_offset_buffers() {
    let registry = KernelRegistry::detect();
    let mut rng = SmallRng::seed_from_u64(42);
    let storage = AlignedVec::from_slice(&random_samples(&mut rng, 200, 1000.0));
    let mut out_storage = AlignedVec::<ComplexI8>::zeroed(200);

    for offset in 0..4 {
        let input = &storage[offset..offset + 150];
        let expected = run_reference(input);
        let output = &mut out_storage[offset..offset + 150];
        registry.convert(output, input, 150);
        assert_eq!(&*output, expected.as_slice(), "offset {}", offset);
    }
}

proptest! {
    #[test]
    fn prop_kernels_agree_on_arbitrary_floats(
        pairs in prop::collection::vec((any::<f32>(), any::<f32>()), 0..100)
    ) {
        let input: Vec<Complex32> = pairs.iter().map(|&(re, im)| Complex32::new(re, im)).collect();
        let expected = run_reference(&input);
        let registry = KernelRegistry::detect();
        for kernel in registry.kernels() {
            prop_assert_eq!(run_kernel(kernel, &input), expected.clone());
        }
    }

    #[test]
    fn prop_saturation(x in 127.5f32..1.0e30) {
        prop_assert_eq!(convert_sample(x), 127);
        prop_assert_eq!(convert_sample(-x - 1.0), -128);
    }

    #[test]
    fn prop_in_range_rounds_half_to_even(x in -128.0f32..=127.0) {
        prop_assert_eq!(convert_sample(x) as f32, x.round_ties_even());
    }

    #[test]
    fn prop_count_length_invariant(len in 0usize..64, extra in 0usize..16) {
        let input = vec![Complex32::new(1.0, -1.0); len];
        let mut output = vec![ComplexI8::new(42, 42); len + extra];
        KernelRegistry::detect().convert(&mut output, &input, len);
        prop_assert!(output[..len].iter().all(|s| *s == ComplexI8::new(1, -1)));
        prop_assert!(output[len..].iter().all(|s| *s == ComplexI8::new(42, 42)));
    }
}
