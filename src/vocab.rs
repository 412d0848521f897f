//! Free-function vocabulary over `PackedFloat4` and `PackedInt4`.
//!
//! These are the names numeric kernels compile against. Functions shared by
//! both vector kinds are generic over `PackedLanes`; `set`, `load` and `store`
//! are generic over the scalar type so the argument picks the vector kind:
//!
//! ```
//! use quadlane::vocab::*;
//!
//! let x = set(2.0f32);              // PackedFloat4
//! let n = set4(1i32, 2, 3, 4);      // PackedInt4
//! let y = add3(x, x, mul_scalar(x, 0.5));
//! assert_eq!(to_lanes(y), [5.0; 4]);
//! assert_eq!(to_lanes(float_of_int(n)), [1.0, 2.0, 3.0, 4.0]);
//! ```
//!
//! # Memory transfer contract
//!
//! `load`, `store`, `inc_mem` and `dec_mem` require `p` aligned to
//! [`ALIGNMENT`](crate::simd_abstraction::ALIGNMENT) bytes. Violating this is
//! undefined behavior on SSE and is never checked. The `*u` variants accept
//! any address. All pointers must be valid for the accessed lanes and must not
//! be written concurrently by another thread.

use crate::lanes::{LaneScalar, PackedFloat4, PackedInt4, PackedLanes};
use crate::simd_abstraction::LANES;

// ===== Construction =====

/// Broadcast `x` into all four lanes.
#[inline]
pub fn set<S: LaneScalar>(x: S) -> S::Packed {
    S::Packed::splat(x)
}

/// Lane 0 = `a`, lane 1 = `b`, lane 2 = `c`, lane 3 = `d`. Storing the result
/// writes `[a, b, c, d]` on every backend.
#[inline]
pub fn set4<S: LaneScalar>(a: S, b: S, c: S, d: S) -> S::Packed {
    S::Packed::from_lanes(a, b, c, d)
}

/// Copy the lanes out into an array, lane 0 first.
#[inline]
pub fn to_lanes<V: PackedLanes>(v: V) -> [V::Scalar; LANES] {
    v.to_array()
}

// ===== Memory Transfer =====

/// Aligned load of 4 lanes.
///
/// # Safety
/// `p` must be valid for reading 4 lanes and aligned to 16 bytes.
#[inline]
pub unsafe fn load<S: LaneScalar>(p: *const S) -> S::Packed {
    unsafe { S::Packed::load(p) }
}

/// Load of 4 lanes from any address.
///
/// # Safety
/// `p` must be valid for reading 4 lanes.
#[inline]
pub unsafe fn loadu<S: LaneScalar>(p: *const S) -> S::Packed {
    unsafe { S::Packed::load_unaligned(p) }
}

/// Aligned store of all 4 lanes. Returns `v` for chaining.
///
/// # Safety
/// `p` must be valid for writing 4 lanes and aligned to 16 bytes.
#[inline]
pub unsafe fn store<S: LaneScalar>(p: *mut S, v: S::Packed) -> S::Packed {
    unsafe { v.store(p) };
    v
}

/// Store of all 4 lanes to any address. Returns `v`.
///
/// # Safety
/// `p` must be valid for writing 4 lanes.
#[inline]
pub unsafe fn storeu<S: LaneScalar>(p: *mut S, v: S::Packed) -> S::Packed {
    unsafe { v.store_unaligned(p) };
    v
}

/// Store lane 0 only. Returns `v`.
///
/// # Safety
/// `p` must be valid for writing one lane.
#[inline]
pub unsafe fn store1<S: LaneScalar>(p: *mut S, v: S::Packed) -> S::Packed {
    unsafe { v.store_first(p) };
    v
}

/// Aligned store of `set(x)`. Returns the broadcast vector.
///
/// # Safety
/// `p` must be valid for writing 4 lanes and aligned to 16 bytes.
#[inline]
pub unsafe fn store_splat<S: LaneScalar>(p: *mut S, x: S) -> S::Packed {
    unsafe { store(p, set(x)) }
}

/// `*x = x + delta`, returning the new value.
#[inline]
pub fn inc<V: PackedLanes>(x: &mut V, delta: V) -> V {
    *x = x.add(delta);
    *x
}

/// `*x = x - delta`, returning the new value.
#[inline]
pub fn dec<V: PackedLanes>(x: &mut V, delta: V) -> V {
    *x = x.sub(delta);
    *x
}

/// Aligned load, add `delta`, aligned store. Returns the stored value.
///
/// # Safety
/// `p` must be valid for reading and writing 4 lanes and aligned to 16 bytes.
#[inline]
pub unsafe fn inc_mem<S: LaneScalar>(p: *mut S, delta: S::Packed) -> S::Packed {
    unsafe { store(p, load(p as *const S).add(delta)) }
}

/// Aligned load, subtract `delta`, aligned store. Returns the stored value.
///
/// # Safety
/// `p` must be valid for reading and writing 4 lanes and aligned to 16 bytes.
#[inline]
pub unsafe fn dec_mem<S: LaneScalar>(p: *mut S, delta: S::Packed) -> S::Packed {
    unsafe { store(p, load(p as *const S).sub(delta)) }
}

// ===== Arithmetic =====

#[inline]
pub fn add<V: PackedLanes>(a: V, b: V) -> V {
    a.add(b)
}

/// `add(add(a, b), c)`. The fold order is fixed so float rounding is
/// reproducible across backends.
#[inline]
pub fn add3<V: PackedLanes>(a: V, b: V, c: V) -> V {
    add(add(a, b), c)
}

/// `add(add(add(a, b), c), d)`.
#[inline]
pub fn add4<V: PackedLanes>(a: V, b: V, c: V, d: V) -> V {
    add(add(add(a, b), c), d)
}

#[inline]
pub fn sub<V: PackedLanes>(a: V, b: V) -> V {
    a.sub(b)
}

/// Lane-wise product; wrapping for integers.
#[inline]
pub fn mul<V: PackedLanes>(a: V, b: V) -> V {
    a.mul(b)
}

/// `mul(v, set(s))`.
#[inline]
pub fn mul_scalar(v: PackedFloat4, s: f32) -> PackedFloat4 {
    mul(v, set(s))
}

/// `mul(set(s), v)`.
#[inline]
pub fn scalar_mul(s: f32, v: PackedFloat4) -> PackedFloat4 {
    mul(set(s), v)
}

/// Exact IEEE division per lane.
#[inline]
pub fn div(a: PackedFloat4, b: PackedFloat4) -> PackedFloat4 {
    a.div(b)
}

/// `div(v, set(s))`.
#[inline]
pub fn div_scalar(v: PackedFloat4, s: f32) -> PackedFloat4 {
    div(v, set(s))
}

/// `div(set(s), v)`.
#[inline]
pub fn scalar_div(s: f32, v: PackedFloat4) -> PackedFloat4 {
    div(set(s), v)
}

/// Reciprocal estimate. Relative error up to `RCP_REL_TOLERANCE`.
#[inline]
pub fn rcp(x: PackedFloat4) -> PackedFloat4 {
    x.rcp()
}

/// Reciprocal square root estimate. Relative error up to `SQRT_REL_TOLERANCE`.
#[inline]
pub fn rcp_sqrt(x: PackedFloat4) -> PackedFloat4 {
    x.rcp_sqrt()
}

/// `rcp(rcp_sqrt(x))`: an approximation of the square root, not IEEE `sqrt`.
/// Relative error up to `SQRT_REL_TOLERANCE`.
#[inline]
pub fn sqrt(x: PackedFloat4) -> PackedFloat4 {
    x.sqrt()
}

#[inline]
pub fn min<V: PackedLanes>(a: V, b: V) -> V {
    a.min(b)
}

#[inline]
pub fn max<V: PackedLanes>(a: V, b: V) -> V {
    a.max(b)
}

// ===== Logical =====
//
// On float vectors these act on the raw lane bits. The results are masks, not
// numbers; combine masks with masks or apply them to data with `select`.

#[inline]
pub fn and<V: PackedLanes>(a: V, b: V) -> V {
    a.and(b)
}

#[inline]
pub fn or<V: PackedLanes>(a: V, b: V) -> V {
    a.or(b)
}

#[inline]
pub fn xor<V: PackedLanes>(a: V, b: V) -> V {
    a.xor(b)
}

/// `!a & b`.
#[inline]
pub fn andnot<V: PackedLanes>(a: V, b: V) -> V {
    a.andnot(b)
}

/// Bits of `if_true` where `mask` is set, bits of `if_false` elsewhere.
#[inline]
pub fn select<V: PackedLanes>(mask: V, if_true: V, if_false: V) -> V {
    or(and(mask, if_true), andnot(mask, if_false))
}

// ===== Comparison =====

/// All-ones lanes where `a > b`, zero lanes elsewhere.
#[inline]
pub fn cmpgt<V: PackedLanes>(a: V, b: V) -> V {
    a.cmpgt(b)
}

/// All-ones lanes where `a < b`, zero lanes elsewhere.
#[inline]
pub fn cmplt<V: PackedLanes>(a: V, b: V) -> V {
    a.cmplt(b)
}

// ===== Conversion =====

/// Integer lanes to the nearest float (round-to-nearest-even above 2^24).
#[inline]
pub fn float_of_int(x: PackedInt4) -> PackedFloat4 {
    x.to_float()
}

/// Float lanes truncated toward zero. Out-of-range and NaN lanes are
/// backend-specific.
#[inline]
pub fn int_of_float(x: PackedFloat4) -> PackedInt4 {
    x.to_int()
}

/// Reinterpret float lane bits as integer lanes.
#[inline]
pub fn cast_to_int_bits(x: PackedFloat4) -> PackedInt4 {
    x.to_int_bits()
}

/// Reinterpret integer lane bits as float lanes.
#[inline]
pub fn cast_to_float_bits(x: PackedInt4) -> PackedFloat4 {
    x.to_float_bits()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lanes::Aligned4;

    #[test]
    fn test_set_picks_vector_kind() {
        let f: PackedFloat4 = set(1.25f32);
        let i: PackedInt4 = set(-7i32);
        assert_eq!(to_lanes(f), [1.25; 4]);
        assert_eq!(to_lanes(i), [-7; 4]);
    }

    #[test]
    fn test_store_returns_value() {
        let mut buf = Aligned4::splat(0.0f32);
        let v = set4(1.0f32, 2.0, 3.0, 4.0);
        let out = unsafe { store(buf.as_mut_ptr(), v) };
        assert_eq!(out.to_bits(), v.to_bits());
        assert_eq!(buf.0, [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_store1_writes_only_first_lane() {
        let mut buf = Aligned4::splat(-1.0f32);
        unsafe { store1(buf.as_mut_ptr(), set4(9.0f32, 8.0, 7.0, 6.0)) };
        assert_eq!(buf.0, [9.0, -1.0, -1.0, -1.0]);

        let mut ibuf = Aligned4::splat(-1i32);
        unsafe { store1(ibuf.as_mut_ptr(), set4(9i32, 8, 7, 6)) };
        assert_eq!(ibuf.0, [9, -1, -1, -1]);
    }

    #[test]
    fn test_store_splat() {
        let mut buf = Aligned4::splat(0i32);
        let v = unsafe { store_splat(buf.as_mut_ptr(), 42i32) };
        assert_eq!(buf.0, [42; 4]);
        assert_eq!(to_lanes(v), [42; 4]);
    }

    #[test]
    fn test_inc_dec_in_register() {
        let mut acc = set(1.0f32);
        let step = set4(0.5f32, 1.0, 1.5, 2.0);
        let after = inc(&mut acc, step);
        assert_eq!(to_lanes(after), [1.5, 2.0, 2.5, 3.0]);
        assert_eq!(to_lanes(acc), [1.5, 2.0, 2.5, 3.0]);

        let after = dec(&mut acc, step);
        assert_eq!(to_lanes(after), [1.0; 4]);

        let mut n = set(10i32);
        inc(&mut n, set(5i32));
        dec(&mut n, set4(1i32, 2, 3, 4));
        assert_eq!(to_lanes(n), [14, 13, 12, 11]);
    }

    #[test]
    fn test_inc_dec_in_memory() {
        let mut buf = Aligned4([1.0f32, 2.0, 3.0, 4.0]);
        let v = unsafe { inc_mem(buf.as_mut_ptr(), set(10.0f32)) };
        assert_eq!(buf.0, [11.0, 12.0, 13.0, 14.0]);
        assert_eq!(to_lanes(v), buf.0);

        let v = unsafe { dec_mem(buf.as_mut_ptr(), set4(1.0f32, 2.0, 3.0, 4.0)) };
        assert_eq!(buf.0, [10.0; 4]);
        assert_eq!(to_lanes(v), [10.0; 4]);
    }

    #[test]
    fn test_unaligned_transfer_at_odd_offset() {
        // Offset by one lane so the address is 4 mod 16.
        let mut backing = [Aligned4::splat(0.0f32); 2];
        let base = backing.as_mut_ptr() as *mut f32;
        unsafe {
            let p = base.add(1);
            storeu(p, set4(5.0f32, 6.0, 7.0, 8.0));
            let v = loadu(p as *const f32);
            assert_eq!(to_lanes(v), [5.0, 6.0, 7.0, 8.0]);
        }
        assert_eq!(backing[0].0, [0.0, 5.0, 6.0, 7.0]);
        assert_eq!(backing[1].0, [8.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_select() {
        let x = set4(1.0f32, 5.0, -2.0, 3.0);
        let y = set(2.0f32);
        let picked = select(cmpgt(x, y), set(1.0f32), set(-1.0f32));
        assert_eq!(to_lanes(picked), [-1.0, 1.0, -1.0, 1.0]);

        let a = set4(1i32, 2, 3, 4);
        let b = set4(4i32, 3, 2, 1);
        assert_eq!(to_lanes(select(cmplt(a, b), a, b)), [1, 2, 2, 1]);
    }

    #[test]
    fn test_min_max() {
        let a = set4(1.0f32, -5.0, 3.5, 0.0);
        let b = set4(2.0f32, -6.0, 3.0, 0.5);
        assert_eq!(to_lanes(min(a, b)), [1.0, -6.0, 3.0, 0.0]);
        assert_eq!(to_lanes(max(a, b)), [2.0, -5.0, 3.5, 0.5]);

        let a = set4(i32::MIN, 7, -1, 0);
        let b = set4(0, -7, 1, i32::MAX);
        assert_eq!(to_lanes(min(a, b)), [i32::MIN, -7, -1, 0]);
        assert_eq!(to_lanes(max(a, b)), [0, 7, 1, i32::MAX]);
    }

    #[test]
    fn test_logical_float_bits() {
        let a = set(f32::from_bits(0xF0F0_F0F0));
        let b = set(f32::from_bits(0xFF00_FF00));
        assert_eq!(and(a, b).to_bits(), [0xF000_F000; 4]);
        assert_eq!(or(a, b).to_bits(), [0xFFF0_FFF0; 4]);
        assert_eq!(xor(a, b).to_bits(), [0x0FF0_0FF0; 4]);
        assert_eq!(andnot(a, b).to_bits(), [0x0F00_0F00; 4]);
    }
}
