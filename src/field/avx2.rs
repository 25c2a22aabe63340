// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! AVX2-accelerated arithmetic on packs of four base field elements.
//!
//! A [PackedBaseElement] holds four canonical field elements in a single 256-bit register and
//! performs addition and multiplication on all four lanes at once. Lane-wise results are
//! bit-identical to the scalar operations in the parent module on all inputs.
//!
//! Loads and stores use aligned instructions; the [AlignedElements] wrapper guarantees the
//! 32-byte alignment they require.

use super::{BaseElement, M};
use core::arch::x86_64::*;
use core::ops::{Add, Mul};

// CONSTANTS
// ================================================================================================

/// Number of field elements processed by a single packed operation.
pub const LANES: usize = 4;

// ALIGNED STORAGE
// ================================================================================================

/// Four field elements aligned to a 32-byte boundary, as required by aligned AVX2 loads and
/// stores.
#[derive(Copy, Clone, Debug, Default)]
#[repr(C, align(32))]
pub struct AlignedElements(pub [BaseElement; LANES]);

// PACKED FIELD ELEMENT
// ================================================================================================

/// Four base field elements packed into a single AVX2 register.
///
/// All lanes are kept in canonical form: every operation takes canonical lanes and produces
/// canonical lanes.
#[derive(Copy, Clone)]
pub struct PackedBaseElement(__m256i);

impl PackedBaseElement {
    /// Loads four field elements from 32-byte aligned memory.
    #[inline]
    pub fn load(src: &AlignedElements) -> Self {
        debug_assert_eq!(src as *const AlignedElements as usize % 32, 0);
        unsafe { Self(_mm256_load_si256(src.0.as_ptr() as *const __m256i)) }
    }

    /// Stores the four lanes of this element into 32-byte aligned memory.
    #[inline]
    pub fn store(self, dst: &mut AlignedElements) {
        debug_assert_eq!(dst as *const AlignedElements as usize % 32, 0);
        unsafe { _mm256_store_si256(dst.0.as_mut_ptr() as *mut __m256i, self.0) }
    }

    /// Squares all four lanes.
    #[inline]
    pub fn square(self) -> Self {
        self * self
    }
}

impl Add for PackedBaseElement {
    type Output = Self;

    /// Computes (self + rhs) mod M on each lane.
    #[inline]
    fn add(self, rhs: Self) -> Self {
        unsafe {
            let u64max = _mm256_set1_epi64x(-1);

            // wrapping lane-wise sum; a lane that wrapped is short of the true sum by 2^64,
            // and 2^64 reduces to 2^32 - 1 modulo M
            let t0 = _mm256_add_epi64(self.0, rhs.0);
            let carry = cmpgt_u64(self.0, _mm256_sub_epi64(u64max, rhs.0));

            // shift the all-ones carry mask into the constant 2^32 - 1
            let t1 = _mm256_add_epi64(t0, _mm256_srli_epi64(carry, 32));

            Self(reduce(t1))
        }
    }
}

impl Mul for PackedBaseElement {
    type Output = Self;

    /// Computes (self * rhs) mod M on each lane.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        unsafe {
            let u32max = _mm256_set1_epi64x(0xFFFFFFFF);
            let u64max = _mm256_set1_epi64x(-1);

            let (res_hi, res_lo) = full_mul_u64x4(self.0, rhs.0);

            // split the high half of each product into c (low 32 bits) and d (high 32 bits);
            // the product reduces to lo - d + c * (2^32 - 1) modulo M
            let c = _mm256_and_si256(res_hi, u32max);
            let d = _mm256_srli_epi64(res_hi, 32);

            // compute lo - d, subtracting an extra 2^32 - 1 from lanes that borrowed
            let t0 = _mm256_sub_epi64(res_lo, d);
            let borrow = cmpgt_u64(d, res_lo);
            let t1 = _mm256_sub_epi64(t0, _mm256_srli_epi64(borrow, 32));

            // compute c * (2^32 - 1) as (c << 32) - c and add it, folding an extra 2^32 - 1
            // into lanes that overflowed
            let t2 = _mm256_sub_epi64(_mm256_slli_epi64(c, 32), c);
            let t3 = _mm256_add_epi64(t1, t2);
            let carry = cmpgt_u64(t1, _mm256_sub_epi64(u64max, t2));
            let t4 = _mm256_add_epi64(t3, _mm256_srli_epi64(carry, 32));

            Self(reduce(t4))
        }
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Compares lanes of `a` and `b` as unsigned 64-bit integers; lanes of the result are all ones
/// where a > b and all zeros otherwise.
///
/// `_mm256_cmpgt_epi64` interprets lanes as signed integers; flipping the sign bit of both
/// operands turns it into an unsigned comparison.
#[inline(always)]
unsafe fn cmpgt_u64(a: __m256i, b: __m256i) -> __m256i {
    let sign = _mm256_set1_epi64x(i64::MIN);
    _mm256_cmpgt_epi64(_mm256_xor_si256(a, sign), _mm256_xor_si256(b, sign))
}

/// Reduces each unsigned 64-bit lane into canonical form by conditionally subtracting M. A
/// single subtraction suffices because every `u64` is below 2M.
#[inline(always)]
unsafe fn reduce(a: __m256i) -> __m256i {
    let m = _mm256_set1_epi64x(M as i64);
    let gte = _mm256_or_si256(cmpgt_u64(a, m), _mm256_cmpeq_epi64(a, m));
    _mm256_sub_epi64(a, _mm256_and_si256(gte, m))
}

/// Multiplies each unsigned 64-bit lane of `lhs` with the corresponding lane of `rhs`,
/// returning the high and low 64-bit halves of the 128-bit products in two separate registers.
///
/// The 128-bit product is assembled from four 32x32 -> 64 bit widening multiplications, the
/// same limb decomposition the scalar path uses on targets without a native 64x64 multiplier.
#[inline(always)]
pub(crate) unsafe fn full_mul_u64x4(lhs: __m256i, rhs: __m256i) -> (__m256i, __m256i) {
    let u32max = _mm256_set1_epi64x(0xFFFFFFFF);

    let lhs_hi = _mm256_srli_epi64(lhs, 32);
    let rhs_hi = _mm256_srli_epi64(rhs, 32);

    // _mm256_mul_epu32 multiplies the low 32 bits of each 64-bit lane
    let hi = _mm256_mul_epu32(lhs_hi, rhs_hi);
    let mid0 = _mm256_mul_epu32(lhs_hi, rhs);
    let mid1 = _mm256_mul_epu32(lhs, rhs_hi);
    let lo = _mm256_mul_epu32(lhs, rhs);

    let mid0_hi = _mm256_srli_epi64(mid0, 32);
    let mid0_lo = _mm256_and_si256(mid0, u32max);
    let mid1_hi = _mm256_srli_epi64(mid1, 32);
    let mid1_lo = _mm256_and_si256(mid1, u32max);

    // carry out of the low half: bits 32..64 of lo plus both low mid limbs
    let t0 = _mm256_srli_epi64(lo, 32);
    let t1 = _mm256_add_epi64(t0, mid0_lo);
    let t2 = _mm256_add_epi64(t1, mid1_lo);
    let carry = _mm256_srli_epi64(t2, 32);

    let t3 = _mm256_add_epi64(hi, mid0_hi);
    let t4 = _mm256_add_epi64(t3, mid1_hi);
    let res_hi = _mm256_add_epi64(t4, carry);

    let t5 = _mm256_slli_epi64(mid0_lo, 32);
    let t6 = _mm256_slli_epi64(mid1_lo, 32);
    let t7 = _mm256_add_epi64(lo, t5);
    let res_lo = _mm256_add_epi64(t7, t6);

    (res_hi, res_lo)
}

// TESTS
// ================================================================================================
