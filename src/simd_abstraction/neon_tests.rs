#![cfg(all(test, target_arch = "aarch64"))]

use super::LaneEngine;
use super::engine_neon::NeonEngine;
use super::types::simd_arch::*;

fn lanes_epi32(v: int32x4_t) -> [i32; 4] {
    let mut out = [0i32; 4];
    unsafe { NeonEngine::storeu_epi32(out.as_mut_ptr(), v) };
    out
}

fn lanes_ps(v: float32x4_t) -> [f32; 4] {
    let mut out = [0.0f32; 4];
    unsafe { NeonEngine::storeu_ps(out.as_mut_ptr(), v) };
    out
}

#[test]
fn test_neon_set_matches_native_lane_index() {
    let v = NeonEngine::set_ps(1.0, 2.0, 3.0, 4.0);
    unsafe {
        assert_eq!(vgetq_lane_f32::<0>(v), 1.0);
        assert_eq!(vgetq_lane_f32::<3>(v), 4.0);
    }
    let n = NeonEngine::set_epi32(10, 20, 30, 40);
    unsafe {
        assert_eq!(vgetq_lane_s32::<1>(n), 20);
        assert_eq!(vgetq_lane_s32::<2>(n), 30);
    }
}

#[test]
fn test_neon_andnot_clears_first_operand_bits() {
    // vbicq computes a & !b, so the engine must swap its operands
    let mask = NeonEngine::set_epi32(-1, 0, 0x0F0F, -1);
    let value = NeonEngine::set1_epi32(0x00FF);
    assert_eq!(
        lanes_epi32(NeonEngine::andnot_si(mask, value)),
        [0, 0x00FF, 0x00F0, 0]
    );
}

#[test]
fn test_neon_cvtt_saturates() {
    let v = NeonEngine::set_ps(3.0e9, -3.0e9, f32::NAN, f32::NEG_INFINITY);
    assert_eq!(
        lanes_epi32(NeonEngine::cvttps_epi32(v)),
        [i32::MAX, i32::MIN, 0, i32::MIN]
    );
}

#[test]
fn test_neon_div_is_exact() {
    let a = NeonEngine::set_ps(1.0, 10.0, -7.0, 3.0);
    let b = NeonEngine::set_ps(3.0, 4.0, 2.0, 7.0);
    assert_eq!(
        lanes_ps(NeonEngine::div_ps(a, b)),
        [1.0 / 3.0, 2.5, -3.5, 3.0 / 7.0]
    );
}

#[test]
fn test_neon_min_max_propagate_nan() {
    let a = NeonEngine::set1_ps(f32::NAN);
    let b = NeonEngine::set1_ps(1.0);
    assert!(lanes_ps(NeonEngine::min_ps(a, b)).iter().all(|x| x.is_nan()));
    assert!(lanes_ps(NeonEngine::max_ps(b, a)).iter().all(|x| x.is_nan()));
}

#[test]
fn test_neon_compare_masks_are_all_ones() {
    let a = NeonEngine::set_ps(2.0, 0.0, -1.0, 5.0);
    let b = NeonEngine::set1_ps(1.0);
    let m = NeonEngine::cast_ps_si(NeonEngine::cmpgt_ps(a, b));
    assert_eq!(lanes_epi32(m), [-1, 0, 0, -1]);
}
