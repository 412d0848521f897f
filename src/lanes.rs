//! Opaque 4-lane value types over the compiled engine.
//!
//! `PackedFloat4` and `PackedInt4` wrap the native register type of
//! `ActiveEngine`. They are plain `Copy` values: no identity beyond their
//! bits, safe to send between threads, and only touch memory through the
//! explicit load/store functions.

use std::fmt;
use std::ops::{
    Add, AddAssign, BitAnd, BitOr, BitXor, Div, DivAssign, Mul, MulAssign, Sub, SubAssign,
};

use crate::simd_abstraction::{ActiveEngine, LANES, LaneEngine};

type NativeF32x4 = <ActiveEngine as LaneEngine>::F32x4;
type NativeI32x4 = <ActiveEngine as LaneEngine>::I32x4;

/// Four IEEE-754 single-precision lanes.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct PackedFloat4(pub(crate) NativeF32x4);

/// Four 32-bit two's-complement integer lanes.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct PackedInt4(pub(crate) NativeI32x4);

/// Four-element buffer aligned for the aligned load/store variants.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[repr(C, align(16))]
pub struct Aligned4<T>(pub [T; LANES]);

impl<T: Copy> Aligned4<T> {
    pub fn splat(value: T) -> Self {
        Self([value; LANES])
    }

    pub fn as_ptr(&self) -> *const T {
        self.0.as_ptr()
    }

    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.0.as_mut_ptr()
    }
}

/// Capability shared by both vector kinds: the part of the vocabulary that is
/// defined for floats and integers alike.
pub trait PackedLanes: Copy + Send + Sync + fmt::Debug {
    /// Element type of one lane.
    type Scalar: Copy + fmt::Debug;

    /// Broadcast `x` into all lanes.
    fn splat(x: Self::Scalar) -> Self;
    /// Lane 0 = `a` ... lane 3 = `d`.
    fn from_lanes(a: Self::Scalar, b: Self::Scalar, c: Self::Scalar, d: Self::Scalar) -> Self;
    fn from_array(lanes: [Self::Scalar; LANES]) -> Self;
    fn to_array(self) -> [Self::Scalar; LANES];
    /// Raw lane bits, for bit-exact comparisons.
    fn to_bits(self) -> [u32; LANES];

    /// # Safety
    /// `p` must be valid for reading 4 lanes and aligned to `ALIGNMENT` bytes.
    unsafe fn load(p: *const Self::Scalar) -> Self;
    /// # Safety
    /// `p` must be valid for reading 4 lanes.
    unsafe fn load_unaligned(p: *const Self::Scalar) -> Self;
    /// # Safety
    /// `p` must be valid for writing 4 lanes and aligned to `ALIGNMENT` bytes.
    unsafe fn store(self, p: *mut Self::Scalar);
    /// # Safety
    /// `p` must be valid for writing 4 lanes.
    unsafe fn store_unaligned(self, p: *mut Self::Scalar);
    /// # Safety
    /// `p` must be valid for writing one lane.
    unsafe fn store_first(self, p: *mut Self::Scalar);

    fn add(self, rhs: Self) -> Self;
    fn sub(self, rhs: Self) -> Self;
    fn mul(self, rhs: Self) -> Self;
    fn min(self, rhs: Self) -> Self;
    fn max(self, rhs: Self) -> Self;

    fn and(self, rhs: Self) -> Self;
    fn or(self, rhs: Self) -> Self;
    fn xor(self, rhs: Self) -> Self;
    /// `!self & rhs`.
    fn andnot(self, rhs: Self) -> Self;

    fn cmpgt(self, rhs: Self) -> Self;
    fn cmplt(self, rhs: Self) -> Self;
}

/// Scalar element types with a packed counterpart; lets `set(x)` pick the
/// vector kind from the argument type.
pub trait LaneScalar: Copy + Send + Sync + fmt::Debug + 'static {
    type Packed: PackedLanes<Scalar = Self>;
}

impl LaneScalar for f32 {
    type Packed = PackedFloat4;
}

impl LaneScalar for i32 {
    type Packed = PackedInt4;
}

impl PackedFloat4 {
    /// Reinterpret the lane bits as integers. Only meaningful as a mask.
    #[inline]
    pub fn to_int_bits(self) -> PackedInt4 {
        PackedInt4(ActiveEngine::cast_ps_si(self.0))
    }

    #[inline]
    pub fn div(self, rhs: Self) -> Self {
        Self(ActiveEngine::div_ps(self.0, rhs.0))
    }

    #[inline]
    pub fn rcp(self) -> Self {
        Self(ActiveEngine::rcp_ps(self.0))
    }

    #[inline]
    pub fn rcp_sqrt(self) -> Self {
        Self(ActiveEngine::rsqrt_ps(self.0))
    }

    #[inline]
    pub fn sqrt(self) -> Self {
        Self(ActiveEngine::sqrt_ps(self.0))
    }

    /// Truncate every lane toward zero.
    #[inline]
    pub fn to_int(self) -> PackedInt4 {
        PackedInt4(ActiveEngine::cvttps_epi32(self.0))
    }
}

impl PackedInt4 {
    /// Reinterpret the lane bits as floats. Only meaningful as a mask.
    #[inline]
    pub fn to_float_bits(self) -> PackedFloat4 {
        PackedFloat4(ActiveEngine::cast_si_ps(self.0))
    }

    /// Convert every lane to the nearest float.
    #[inline]
    pub fn to_float(self) -> PackedFloat4 {
        PackedFloat4(ActiveEngine::cvtepi32_ps(self.0))
    }
}

impl PackedLanes for PackedFloat4 {
    type Scalar = f32;

    #[inline]
    fn splat(x: f32) -> Self {
        Self(ActiveEngine::set1_ps(x))
    }

    #[inline]
    fn from_lanes(a: f32, b: f32, c: f32, d: f32) -> Self {
        Self(ActiveEngine::set_ps(a, b, c, d))
    }

    #[inline]
    fn from_array(lanes: [f32; LANES]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline]
    fn to_array(self) -> [f32; LANES] {
        let mut out = [0.0f32; LANES];
        unsafe { self.store_unaligned(out.as_mut_ptr()) };
        out
    }

    #[inline]
    fn to_bits(self) -> [u32; LANES] {
        self.to_array().map(f32::to_bits)
    }

    #[inline]
    unsafe fn load(p: *const f32) -> Self {
        Self(unsafe { ActiveEngine::load_ps(p) })
    }

    #[inline]
    unsafe fn load_unaligned(p: *const f32) -> Self {
        Self(unsafe { ActiveEngine::loadu_ps(p) })
    }

    #[inline]
    unsafe fn store(self, p: *mut f32) {
        unsafe { ActiveEngine::store_ps(p, self.0) }
    }

    #[inline]
    unsafe fn store_unaligned(self, p: *mut f32) {
        unsafe { ActiveEngine::storeu_ps(p, self.0) }
    }

    #[inline]
    unsafe fn store_first(self, p: *mut f32) {
        unsafe { ActiveEngine::store_ss(p, self.0) }
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(ActiveEngine::add_ps(self.0, rhs.0))
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(ActiveEngine::sub_ps(self.0, rhs.0))
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(ActiveEngine::mul_ps(self.0, rhs.0))
    }

    #[inline]
    fn min(self, rhs: Self) -> Self {
        Self(ActiveEngine::min_ps(self.0, rhs.0))
    }

    #[inline]
    fn max(self, rhs: Self) -> Self {
        Self(ActiveEngine::max_ps(self.0, rhs.0))
    }

    #[inline]
    fn and(self, rhs: Self) -> Self {
        Self(ActiveEngine::and_ps(self.0, rhs.0))
    }

    #[inline]
    fn or(self, rhs: Self) -> Self {
        Self(ActiveEngine::or_ps(self.0, rhs.0))
    }

    #[inline]
    fn xor(self, rhs: Self) -> Self {
        Self(ActiveEngine::xor_ps(self.0, rhs.0))
    }

    #[inline]
    fn andnot(self, rhs: Self) -> Self {
        Self(ActiveEngine::andnot_ps(self.0, rhs.0))
    }

    #[inline]
    fn cmpgt(self, rhs: Self) -> Self {
        Self(ActiveEngine::cmpgt_ps(self.0, rhs.0))
    }

    #[inline]
    fn cmplt(self, rhs: Self) -> Self {
        Self(ActiveEngine::cmplt_ps(self.0, rhs.0))
    }
}

impl PackedLanes for PackedInt4 {
    type Scalar = i32;

    #[inline]
    fn splat(x: i32) -> Self {
        Self(ActiveEngine::set1_epi32(x))
    }

    #[inline]
    fn from_lanes(a: i32, b: i32, c: i32, d: i32) -> Self {
        Self(ActiveEngine::set_epi32(a, b, c, d))
    }

    #[inline]
    fn from_array(lanes: [i32; LANES]) -> Self {
        unsafe { Self::load_unaligned(lanes.as_ptr()) }
    }

    #[inline]
    fn to_array(self) -> [i32; LANES] {
        let mut out = [0i32; LANES];
        unsafe { self.store_unaligned(out.as_mut_ptr()) };
        out
    }

    #[inline]
    fn to_bits(self) -> [u32; LANES] {
        self.to_array().map(|x| x as u32)
    }

    #[inline]
    unsafe fn load(p: *const i32) -> Self {
        Self(unsafe { ActiveEngine::load_epi32(p) })
    }

    #[inline]
    unsafe fn load_unaligned(p: *const i32) -> Self {
        Self(unsafe { ActiveEngine::loadu_epi32(p) })
    }

    #[inline]
    unsafe fn store(self, p: *mut i32) {
        unsafe { ActiveEngine::store_epi32(p, self.0) }
    }

    #[inline]
    unsafe fn store_unaligned(self, p: *mut i32) {
        unsafe { ActiveEngine::storeu_epi32(p, self.0) }
    }

    #[inline]
    unsafe fn store_first(self, p: *mut i32) {
        unsafe { ActiveEngine::store1_epi32(p, self.0) }
    }

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(ActiveEngine::add_epi32(self.0, rhs.0))
    }

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(ActiveEngine::sub_epi32(self.0, rhs.0))
    }

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self(ActiveEngine::mullo_epi32(self.0, rhs.0))
    }

    #[inline]
    fn min(self, rhs: Self) -> Self {
        Self(ActiveEngine::min_epi32(self.0, rhs.0))
    }

    #[inline]
    fn max(self, rhs: Self) -> Self {
        Self(ActiveEngine::max_epi32(self.0, rhs.0))
    }

    #[inline]
    fn and(self, rhs: Self) -> Self {
        Self(ActiveEngine::and_si(self.0, rhs.0))
    }

    #[inline]
    fn or(self, rhs: Self) -> Self {
        Self(ActiveEngine::or_si(self.0, rhs.0))
    }

    #[inline]
    fn xor(self, rhs: Self) -> Self {
        Self(ActiveEngine::xor_si(self.0, rhs.0))
    }

    #[inline]
    fn andnot(self, rhs: Self) -> Self {
        Self(ActiveEngine::andnot_si(self.0, rhs.0))
    }

    #[inline]
    fn cmpgt(self, rhs: Self) -> Self {
        Self(ActiveEngine::cmpgt_epi32(self.0, rhs.0))
    }

    #[inline]
    fn cmplt(self, rhs: Self) -> Self {
        Self(ActiveEngine::cmplt_epi32(self.0, rhs.0))
    }
}

impl fmt::Debug for PackedFloat4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedFloat4({:?})", self.to_array())
    }
}

impl fmt::Debug for PackedInt4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedInt4({:?})", self.to_array())
    }
}

impl PartialEq for PackedInt4 {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl Eq for PackedInt4 {}

impl Default for PackedFloat4 {
    fn default() -> Self {
        Self::splat(0.0)
    }
}

impl Default for PackedInt4 {
    fn default() -> Self {
        Self::splat(0)
    }
}

impl From<[f32; LANES]> for PackedFloat4 {
    fn from(lanes: [f32; LANES]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<PackedFloat4> for [f32; LANES] {
    fn from(v: PackedFloat4) -> Self {
        v.to_array()
    }
}

impl From<[i32; LANES]> for PackedInt4 {
    fn from(lanes: [i32; LANES]) -> Self {
        Self::from_array(lanes)
    }
}

impl From<PackedInt4> for [i32; LANES] {
    fn from(v: PackedInt4) -> Self {
        v.to_array()
    }
}

// Operator overloads. Each forwards to the vocabulary so `a + b` and
// `vocab::add(a, b)` are the same instruction.
macro_rules! impl_binary_ops {
    ($ty:ty, $($trait:ident, $method:ident, $assign_trait:ident, $assign_method:ident, $op:expr);* $(;)?) => {
        $(
            impl $trait for $ty {
                type Output = $ty;
                #[inline]
                fn $method(self, rhs: $ty) -> $ty {
                    $op(self, rhs)
                }
            }

            impl $assign_trait for $ty {
                #[inline]
                fn $assign_method(&mut self, rhs: $ty) {
                    *self = $op(*self, rhs);
                }
            }
        )*
    };
}

impl_binary_ops!(PackedFloat4,
    Add, add, AddAssign, add_assign, <PackedFloat4 as PackedLanes>::add;
    Sub, sub, SubAssign, sub_assign, <PackedFloat4 as PackedLanes>::sub;
    Mul, mul, MulAssign, mul_assign, <PackedFloat4 as PackedLanes>::mul;
    Div, div, DivAssign, div_assign, PackedFloat4::div;
);

impl_binary_ops!(PackedInt4,
    Add, add, AddAssign, add_assign, <PackedInt4 as PackedLanes>::add;
    Sub, sub, SubAssign, sub_assign, <PackedInt4 as PackedLanes>::sub;
    Mul, mul, MulAssign, mul_assign, <PackedInt4 as PackedLanes>::mul;
);

macro_rules! impl_bit_ops {
    ($($ty:ty),*) => {
        $(
            impl BitAnd for $ty {
                type Output = $ty;
                #[inline]
                fn bitand(self, rhs: $ty) -> $ty {
                    PackedLanes::and(self, rhs)
                }
            }

            impl BitOr for $ty {
                type Output = $ty;
                #[inline]
                fn bitor(self, rhs: $ty) -> $ty {
                    PackedLanes::or(self, rhs)
                }
            }

            impl BitXor for $ty {
                type Output = $ty;
                #[inline]
                fn bitxor(self, rhs: $ty) -> $ty {
                    PackedLanes::xor(self, rhs)
                }
            }
        )*
    };
}

impl_bit_ops!(PackedFloat4, PackedInt4);

impl Mul<f32> for PackedFloat4 {
    type Output = PackedFloat4;
    #[inline]
    fn mul(self, rhs: f32) -> PackedFloat4 {
        crate::vocab::mul_scalar(self, rhs)
    }
}

impl Mul<PackedFloat4> for f32 {
    type Output = PackedFloat4;
    #[inline]
    fn mul(self, rhs: PackedFloat4) -> PackedFloat4 {
        crate::vocab::scalar_mul(self, rhs)
    }
}

impl Div<f32> for PackedFloat4 {
    type Output = PackedFloat4;
    #[inline]
    fn div(self, rhs: f32) -> PackedFloat4 {
        crate::vocab::div_scalar(self, rhs)
    }
}

impl Div<PackedFloat4> for f32 {
    type Output = PackedFloat4;
    #[inline]
    fn div(self, rhs: PackedFloat4) -> PackedFloat4 {
        crate::vocab::scalar_div(self, rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_array_round_trip() {
        let v = PackedFloat4::from_array([1.5, -2.0, 0.0, 8.25]);
        assert_eq!(v.to_array(), [1.5, -2.0, 0.0, 8.25]);

        let n = PackedInt4::from([i32::MIN, -1, 0, i32::MAX]);
        assert_eq!(<[i32; 4]>::from(n), [i32::MIN, -1, 0, i32::MAX]);
    }

    #[test]
    fn test_operators_match_trait_methods() {
        let a = PackedFloat4::from_lanes(1.0, 2.0, 3.0, 4.0);
        let b = PackedFloat4::splat(0.5);
        assert_eq!((a + b).to_bits(), PackedLanes::add(a, b).to_bits());
        assert_eq!((a - b).to_bits(), PackedLanes::sub(a, b).to_bits());
        assert_eq!((a * b).to_bits(), PackedLanes::mul(a, b).to_bits());
        assert_eq!((a / b).to_array(), [2.0, 4.0, 6.0, 8.0]);

        let mut acc = a;
        acc += b;
        acc -= b;
        assert_eq!(acc.to_bits(), a.to_bits());
    }

    #[test]
    fn test_int_wrapping() {
        let a = PackedInt4::splat(i32::MAX);
        let one = PackedInt4::splat(1);
        assert_eq!((a + one).to_array(), [i32::MIN; 4]);
        assert_eq!((PackedInt4::splat(65536) * PackedInt4::splat(65536)).to_array(), [0; 4]);
        assert_eq!(
            (PackedInt4::from_lanes(-3, 7, -11, 13) * PackedInt4::splat(-2)).to_array(),
            [6, -14, 22, -26]
        );
    }

    #[test]
    fn test_bit_cast_preserves_bits() {
        let v = PackedFloat4::from_lanes(-0.0, 1.0, f32::INFINITY, f32::MIN_POSITIVE);
        let bits = v.to_int_bits();
        assert_eq!(bits.to_bits(), v.to_bits());
        assert_eq!(bits.to_float_bits().to_bits(), v.to_bits());
    }

    #[test]
    fn test_aligned_buffer_alignment() {
        let buf = Aligned4::splat(0.0f32);
        assert_eq!(buf.as_ptr() as usize % crate::simd_abstraction::ALIGNMENT, 0);
        assert_eq!(std::mem::align_of::<Aligned4<i32>>(), 16);
    }

    #[test]
    fn test_debug_shows_lanes() {
        let v = PackedInt4::from_lanes(1, 2, 3, 4);
        assert_eq!(format!("{:?}", v), "PackedInt4([1, 2, 3, 4])");
    }
}
