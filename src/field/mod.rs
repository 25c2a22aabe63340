// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An implementation of a 64-bit STARK-friendly prime field with modulus $2^{64} - 2^{32} + 1$.
//!
//! This field supports very fast modular arithmetic because $2^{64} \equiv 2^{32} - 1 \pmod q$,
//! which means that the high half of a 128-bit product can be folded into the low half with a
//! few 32-bit shifts, additions, and subtractions.
//!
//! Elements are always stored in canonical form: the backing `u64` is the unique representative
//! of the residue class in the range $[0, q)$. Every operation below takes canonical operands
//! and produces a canonical result.

use core::{
    fmt::{Display, Formatter},
    ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign},
};
use rand::{
    distributions::{Distribution, Standard},
    Rng,
};

#[cfg(all(target_arch = "x86_64", target_feature = "avx2"))]
pub mod avx2;

#[cfg(test)]
mod tests;

// CONSTANTS
// ================================================================================================

/// Field modulus = 2^64 - 2^32 + 1.
pub const M: u64 = 0xFFFFFFFF00000001;

// Epsilon = 2^32 - 1; this is the value 2^64 reduces to modulo M.
const E: u64 = 0xFFFFFFFF;

// FIELD ELEMENT
// ================================================================================================

/// Represents a base field element.
///
/// The internal value is always in the range [0, M).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseElement(u64);

impl BaseElement {
    /// Field element with value 0.
    pub const ZERO: Self = Self::new(0);

    /// Field element with value 1.
    pub const ONE: Self = Self::new(1);

    /// Creates a new field element from the provided `value`. If the value is greater than or
    /// equal to the field modulus, modular reduction is silently performed.
    pub const fn new(value: u64) -> Self {
        Self(value % M)
    }

    /// Returns the canonical integer representation of this field element.
    #[inline]
    pub const fn as_int(self) -> u64 {
        self.0
    }

    /// Computes the square of this element.
    #[inline]
    pub fn square(self) -> Self {
        self * self
    }

    /// Computes the 7th power of this element using 4 multiplications.
    #[inline]
    pub fn exp7(self) -> Self {
        let t2 = self.square();
        let t4 = t2.square();
        self * t2 * t4
    }

    /// Exponentiates this element by `power` using square-and-multiply.
    ///
    /// This is not a constant-time procedure; exponents used by this crate are public constants.
    #[inline]
    pub fn exp(self, power: u64) -> Self {
        let mut b = self;

        if power == 0 {
            return Self::ONE;
        } else if b == Self::ZERO {
            return Self::ZERO;
        }

        let mut r = if power & 1 == 1 { b } else { Self::ONE };
        for i in 1..64 - power.leading_zeros() {
            b = b.square();
            if (power >> i) & 1 == 1 {
                r *= b;
            }
        }

        r
    }

    /// Computes the multiplicative inverse of this element; the inverse of 0 is 0.
    #[inline]
    #[allow(clippy::many_single_char_names)]
    pub fn inv(self) -> Self {
        // compute base^(M - 2) using 72 multiplications
        // M - 2 = 0b1111111111111111111111111111111011111111111111111111111111111111

        // compute base^11
        let t2 = self.square() * self;

        // compute base^111
        let t3 = t2.square() * self;

        // compute base^111111 (6 ones)
        let t6 = exp_acc::<3>(t3, t3);

        // compute base^111111111111 (12 ones)
        let t12 = exp_acc::<6>(t6, t6);

        // compute base^111111111111111111111111 (24 ones)
        let t24 = exp_acc::<12>(t12, t12);

        // compute base^1111111111111111111111111111111 (31 ones)
        let t30 = exp_acc::<6>(t24, t6);
        let t31 = t30.square() * self;

        // compute base^111111111111111111111111111111101111111111111111111111111111111
        let t63 = exp_acc::<32>(t31, t31);

        // compute base^1111111111111111111111111111111011111111111111111111111111111111
        t63.square() * self
    }

    /// Returns a field element drawn uniformly at random from the entire field.
    pub fn random() -> Self {
        rand::thread_rng().gen()
    }
}

// OVERLOADED OPERATORS
// ================================================================================================

impl Add for BaseElement {
    type Output = Self;

    /// Computes (self + rhs) mod M.
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn add(self, rhs: Self) -> Self {
        // a wrapped sum is short of the true sum by 2^64, and 2^64 reduces to E modulo M
        let (result, over) = self.0.overflowing_add(rhs.0);
        let result = result.wrapping_add(E * (over as u64));
        Self(if result >= M { result - M } else { result })
    }
}

impl AddAssign for BaseElement {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs
    }
}

impl Sub for BaseElement {
    type Output = Self;

    /// Computes (self - rhs) mod M.
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn sub(self, rhs: Self) -> Self {
        let (result, under) = self.0.overflowing_sub(rhs.0);
        Self(result.wrapping_sub(E * (under as u64)))
    }
}

impl SubAssign for BaseElement {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for BaseElement {
    type Output = Self;

    /// Computes (self * rhs) mod M.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        let z = (self.0 as u128) * (rhs.0 as u128);
        Self(mod_reduce(z))
    }
}

impl MulAssign for BaseElement {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs
    }
}

impl Div for BaseElement {
    type Output = Self;

    /// Computes self * rhs^-1; division by zero yields zero.
    #[inline]
    #[allow(clippy::suspicious_arithmetic_impl)]
    fn div(self, rhs: Self) -> Self {
        self * rhs.inv()
    }
}

impl DivAssign for BaseElement {
    #[inline]
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs
    }
}

impl Neg for BaseElement {
    type Output = Self;

    /// Computes -self mod M.
    #[inline]
    fn neg(self) -> Self {
        if self.0 == 0 {
            Self::ZERO
        } else {
            Self(M - self.0)
        }
    }
}

// TYPE CONVERSIONS
// ================================================================================================

impl From<u128> for BaseElement {
    /// Converts a 128-bit value into a field element.
    fn from(value: u128) -> Self {
        Self(mod_reduce(value))
    }
}

impl From<u64> for BaseElement {
    /// Converts a 64-bit value into a field element. If the value is greater than or equal to
    /// the field modulus, modular reduction is silently performed.
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<u32> for BaseElement {
    /// Converts a 32-bit value into a field element.
    fn from(value: u32) -> Self {
        Self::new(value as u64)
    }
}

impl From<u16> for BaseElement {
    /// Converts a 16-bit value into a field element.
    fn from(value: u16) -> Self {
        Self::new(value as u64)
    }
}

impl From<u8> for BaseElement {
    /// Converts an 8-bit value into a field element.
    fn from(value: u8) -> Self {
        Self::new(value as u64)
    }
}

impl Display for BaseElement {
    fn fmt(&self, f: &mut Formatter) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// RANDOMIZATION
// ================================================================================================

impl Distribution<BaseElement> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> BaseElement {
        BaseElement(rng.gen_range(0..M))
    }
}

// HELPER FUNCTIONS
// ================================================================================================

/// Reduces a 128-bit value modulo M, returning the canonical representative in [0, M).
///
/// Adapted from: <https://github.com/mir-protocol/plonky2/blob/main/src/field/goldilocks_field.rs>
#[inline(always)]
fn mod_reduce(x: u128) -> u64 {
    // assume x consists of four 32-bit values: a, b, c, d such that a contains 32 least
    // significant bits and d contains 32 most significant bits. we break x into corresponding
    // values as shown below
    let ab = x as u64;
    let cd = (x >> 64) as u64;
    let c = (cd as u32) as u64;
    let d = cd >> 32;

    // compute ab - d; because d may be greater than ab we need to handle potential underflow
    let (tmp0, under) = ab.overflowing_sub(d);
    let tmp0 = tmp0.wrapping_sub(E * (under as u64));

    // compute c * 2^32 - c; this is guaranteed not to underflow
    let tmp1 = (c << 32) - c;

    // add temp values; because each of the temp values may be up to 64 bits, we need to handle
    // potential overflow
    let (result, over) = tmp0.overflowing_add(tmp1);
    let result = result.wrapping_add(E * (over as u64));

    // the result is in [0, 2^64); one conditional subtraction brings it into canonical form
    if result >= M {
        result - M
    } else {
        result
    }
}

/// Squares the base N number of times and multiplies the result by the tail value.
#[inline(always)]
fn exp_acc<const N: usize>(base: BaseElement, tail: BaseElement) -> BaseElement {
    let mut result = base;
    for _ in 0..N {
        result = result.square();
    }
    result * tail
}
