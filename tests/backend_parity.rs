// tests/backend_parity.rs
//! Compiled engine vs the portable scalar engine.
//!
//! On x86_64 / aarch64 this compares SSE2 / NEON against the reference; with
//! `scalar-backend` it degenerates to a self-comparison.

use quadlane::conformance::{self, ConformanceConfig};
use quadlane::error::ConformanceError;
use quadlane::simd_abstraction::{ActiveEngine, LaneEngine, ScalarEngine};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn to_f32<E: LaneEngine>(v: E::F32x4) -> [u32; 4] {
    let mut out = [0.0f32; 4];
    unsafe { E::storeu_ps(out.as_mut_ptr(), v) };
    out.map(f32::to_bits)
}

fn to_i32<E: LaneEngine>(v: E::I32x4) -> [i32; 4] {
    let mut out = [0i32; 4];
    unsafe { E::storeu_epi32(out.as_mut_ptr(), v) };
    out
}

fn load_f32<E: LaneEngine>(lanes: &[f32; 4]) -> E::F32x4 {
    unsafe { E::loadu_ps(lanes.as_ptr()) }
}

fn load_i32<E: LaneEngine>(lanes: &[i32; 4]) -> E::I32x4 {
    unsafe { E::loadu_epi32(lanes.as_ptr()) }
}

/// Applies a float binary op on both engines and compares bits
macro_rules! assert_float_binop {
    ($op:ident, $a:expr, $b:expr) => {{
        let active = to_f32::<ActiveEngine>(ActiveEngine::$op(
            load_f32::<ActiveEngine>($a),
            load_f32::<ActiveEngine>($b),
        ));
        let reference = to_f32::<ScalarEngine>(ScalarEngine::$op(
            load_f32::<ScalarEngine>($a),
            load_f32::<ScalarEngine>($b),
        ));
        assert_eq!(active, reference, "{} on {:?} {:?}", stringify!($op), $a, $b);
    }};
}

macro_rules! assert_int_binop {
    ($op:ident, $a:expr, $b:expr) => {{
        let active = to_i32::<ActiveEngine>(ActiveEngine::$op(
            load_i32::<ActiveEngine>($a),
            load_i32::<ActiveEngine>($b),
        ));
        let reference = to_i32::<ScalarEngine>(ScalarEngine::$op(
            load_i32::<ScalarEngine>($a),
            load_i32::<ScalarEngine>($b),
        ));
        assert_eq!(active, reference, "{} on {:?} {:?}", stringify!($op), $a, $b);
    }};
}

fn random_float(rng: &mut StdRng) -> f32 {
    let magnitude = rng.gen_range(1.0e-3f32..1.0e4);
    if rng.r#gen::<bool>() { magnitude } else { -magnitude }
}

#[test]
fn test_exact_float_ops_match_reference() {
    let mut rng = StdRng::seed_from_u64(0xF10A7);
    for _ in 0..5000 {
        let a: [f32; 4] = std::array::from_fn(|_| random_float(&mut rng));
        let b: [f32; 4] = std::array::from_fn(|_| random_float(&mut rng));
        assert_float_binop!(add_ps, &a, &b);
        assert_float_binop!(sub_ps, &a, &b);
        assert_float_binop!(mul_ps, &a, &b);
        assert_float_binop!(div_ps, &a, &b);
        assert_float_binop!(min_ps, &a, &b);
        assert_float_binop!(max_ps, &a, &b);
        assert_float_binop!(and_ps, &a, &b);
        assert_float_binop!(or_ps, &a, &b);
        assert_float_binop!(xor_ps, &a, &b);
        assert_float_binop!(andnot_ps, &a, &b);
        assert_float_binop!(cmpgt_ps, &a, &b);
        assert_float_binop!(cmplt_ps, &a, &b);
    }
}

#[test]
fn test_exact_int_ops_match_reference() {
    let mut rng = StdRng::seed_from_u64(0x1A7);
    for _ in 0..5000 {
        let a: [i32; 4] = std::array::from_fn(|_| rng.r#gen());
        let b: [i32; 4] = std::array::from_fn(|_| rng.r#gen());
        assert_int_binop!(add_epi32, &a, &b);
        assert_int_binop!(sub_epi32, &a, &b);
        assert_int_binop!(mullo_epi32, &a, &b);
        assert_int_binop!(min_epi32, &a, &b);
        assert_int_binop!(max_epi32, &a, &b);
        assert_int_binop!(and_si, &a, &b);
        assert_int_binop!(or_si, &a, &b);
        assert_int_binop!(xor_si, &a, &b);
        assert_int_binop!(andnot_si, &a, &b);
        assert_int_binop!(cmpgt_epi32, &a, &b);
        assert_int_binop!(cmplt_epi32, &a, &b);
    }
}

#[test]
fn test_conversions_match_reference() {
    let mut rng = StdRng::seed_from_u64(0xC0417);
    for _ in 0..5000 {
        let n: [i32; 4] = std::array::from_fn(|_| rng.r#gen());
        assert_eq!(
            to_f32::<ActiveEngine>(ActiveEngine::cvtepi32_ps(load_i32::<ActiveEngine>(&n))),
            to_f32::<ScalarEngine>(ScalarEngine::cvtepi32_ps(load_i32::<ScalarEngine>(&n))),
            "cvtepi32_ps on {:?}",
            n
        );

        // Stay inside the i32 range; overflow handling is engine-specific
        let x: [f32; 4] = std::array::from_fn(|_| rng.gen_range(-2.0e9f32..2.0e9));
        assert_eq!(
            to_i32::<ActiveEngine>(ActiveEngine::cvttps_epi32(load_f32::<ActiveEngine>(&x))),
            to_i32::<ScalarEngine>(ScalarEngine::cvttps_epi32(load_f32::<ScalarEngine>(&x))),
            "cvttps_epi32 on {:?}",
            x
        );
    }
}

#[test]
fn test_conformance_run_small() {
    let config = ConformanceConfig::new()
        .with_samples(3000)
        .with_chunk_size(512)
        .with_threads(2);
    let report = conformance::run(&config).expect("conformance run failed");
    assert_eq!(report.backend, ActiveEngine::NAME);
    assert_eq!(report.samples, 3000);
    assert!(report.lane_checks > 0);
    assert!(report.max_rcp_error <= quadlane::RCP_REL_TOLERANCE);
    assert!(report.max_sqrt_error <= quadlane::SQRT_REL_TOLERANCE);
}

#[test]
fn test_conformance_is_reproducible() {
    let config = ConformanceConfig::new()
        .with_samples(1000)
        .with_seed(17)
        .with_chunk_size(100);
    let first = conformance::run(&config.clone().with_threads(1)).expect("single thread run");
    let second = conformance::run(&config.with_threads(4)).expect("four thread run");
    assert_eq!(first, second);
}

#[test]
fn test_conformance_rejects_empty_run() {
    let config = ConformanceConfig::new().with_samples(0);
    match conformance::run(&config) {
        Err(ConformanceError::InvalidConfig(_)) => {}
        other => panic!("expected InvalidConfig, got {:?}", other),
    }
}
