//! End-to-end properties of the transfer engine.
//!
//! Run with: `cargo test -p tinct-core`

use proptest::prelude::*;

use tinct_core::color_management::lab;
use tinct_core::grading::histogram::match_channel;
use tinct_core::image::Rgb;
use tinct_core::{ColorGradingEngine, RgbImage, TransferConfig, TransferMethod};

fn config(method: TransferMethod, preserve_luminance: bool, intensity: f32) -> TransferConfig {
    TransferConfig {
        method,
        preserve_luminance,
        intensity,
    }
}

/// Low-saturation target gradient; transfers onto muted references stay in gamut.
fn muted_target(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = 50 + (x * 150 / width) as u8;
        let tilt = (y * 20 / height) as u8;
        Rgb([base + tilt, base + 5, base + 10 - tilt / 2])
    })
}

/// Warm, muted reference.
fn muted_reference(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        let base = 70 + (x * 120 / width) as u8;
        Rgb([base + 18, base + 6 + (y % 3) as u8, base])
    })
}

fn assert_within(a: &RgbImage, b: &RgbImage, tol: i16) {
    assert_eq!(a.dimensions(), b.dimensions());
    for (pa, pb) in a.pixels().zip(b.pixels()) {
        for c in 0..3 {
            let diff = (pa.0[c] as i16 - pb.0[c] as i16).abs();
            assert!(diff <= tol, "{:?} vs {:?} (channel {c}, diff {diff})", pa.0, pb.0);
        }
    }
}

#[test]
fn test_flat_gray_onto_flat_red_is_exact() {
    let target = RgbImage::from_pixel(2, 2, Rgb([128, 128, 128]));
    let reference = RgbImage::from_pixel(2, 2, Rgb([200, 50, 50]));
    let out = ColorGradingEngine::new()
        .process(&target, &reference, config(TransferMethod::Histogram, false, 1.0))
        .unwrap();
    assert_eq!(out, RgbImage::from_pixel(2, 2, Rgb([200, 50, 50])));
}

#[test]
fn test_self_transfer_with_reinhard_is_near_identity() {
    let image = muted_target(20, 10);
    let out = ColorGradingEngine::new()
        .process(&image, &image, config(TransferMethod::Reinhard, false, 1.0))
        .unwrap();
    assert_within(&out, &image, 1);
}

#[test]
fn test_luminance_is_preserved_for_both_methods() {
    let target = muted_target(16, 8);
    let reference = muted_reference(12, 12);
    for &method in TransferMethod::all() {
        let out = ColorGradingEngine::new()
            .process(&target, &reference, config(method, true, 1.0))
            .unwrap();
        for (t, o) in target.pixels().zip(out.pixels()) {
            let lt = lab::rgb_to_lab_pixel(t.0)[lab::LIGHTNESS];
            let lo = lab::rgb_to_lab_pixel(o.0)[lab::LIGHTNESS];
            assert!((lt - lo).abs() < 1.0, "{method}: L* {lt} vs {lo}");
        }
    }
}

#[test]
fn test_intensity_endpoints_are_byte_exact() {
    let target = muted_target(9, 7);
    let reference = muted_reference(5, 5);
    let engine = ColorGradingEngine::new();
    for &method in TransferMethod::all() {
        for preserve in [false, true] {
            let zero = engine.process(&target, &reference, config(method, preserve, 0.0)).unwrap();
            assert_eq!(zero, target);

            let full = engine.process(&target, &reference, config(method, preserve, 1.0)).unwrap();
            let (direct, _) = tinct_core::grading::engine::full_strength(
                &target,
                &reference,
                config(method, preserve, 1.0),
            );
            assert_eq!(full, direct);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn test_partial_intensity_lies_on_the_blend_line(
        intensity in 0.0f32..=1.0,
        reinhard in any::<bool>(),
        preserve in any::<bool>(),
    ) {
        let method = if reinhard { TransferMethod::Reinhard } else { TransferMethod::Histogram };
        let target = muted_target(8, 6);
        let reference = muted_reference(6, 6);
        let engine = ColorGradingEngine::new();

        let lo = engine.process(&target, &reference, config(method, preserve, 0.0)).unwrap();
        let hi = engine.process(&target, &reference, config(method, preserve, 1.0)).unwrap();
        let mid = engine.process(&target, &reference, config(method, preserve, intensity)).unwrap();

        for ((a, b), m) in lo.pixels().zip(hi.pixels()).zip(mid.pixels()) {
            for c in 0..3 {
                let expected = a.0[c] as f32 * (1.0 - intensity) + b.0[c] as f32 * intensity;
                prop_assert!((m.0[c] as f32 - expected).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn test_histogram_matching_is_monotonic(
        reference in prop::collection::vec(-100.0f32..100.0, 1..64),
        len in 2usize..64,
    ) {
        let target: Vec<f32> = (0..len).map(|i| i as f32 * 0.5).collect();
        let matched = match_channel(&target, &reference);
        for pair in matched.windows(2) {
            prop_assert!(pair[0] <= pair[1], "{} > {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_histogram_matching_stays_in_reference_range(
        target in prop::collection::vec(0.0f32..255.0, 1..64),
        reference in prop::collection::vec(0.0f32..255.0, 1..64),
    ) {
        let lo = reference.iter().copied().fold(f32::INFINITY, f32::min);
        let hi = reference.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        for v in match_channel(&target, &reference) {
            prop_assert!(v >= lo - 1e-3 && v <= hi + 1e-3);
        }
    }
}
