// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

use super::{BaseElement, M};
use num_bigint::BigUint;
use proptest::prelude::*;

// MANUAL TESTS
// ================================================================================================

#[test]
fn add() {
    // identity
    let r = BaseElement::random();
    assert_eq!(r, r + BaseElement::ZERO);

    // test addition within bounds
    assert_eq!(BaseElement::new(5), BaseElement::new(2) + BaseElement::new(3));

    // test overflow
    let t = BaseElement::new(M - 1);
    assert_eq!(BaseElement::ZERO, t + BaseElement::ONE);
    assert_eq!(BaseElement::ONE, t + BaseElement::new(2));
}

#[test]
fn sub() {
    // identity
    let r = BaseElement::random();
    assert_eq!(r, r - BaseElement::ZERO);

    // test subtraction within bounds
    assert_eq!(BaseElement::new(2), BaseElement::new(5) - BaseElement::new(3));

    // test underflow
    let expected = BaseElement::new(M - 2);
    assert_eq!(expected, BaseElement::new(3) - BaseElement::new(5));
}

#[test]
fn neg() {
    assert_eq!(BaseElement::ZERO, -BaseElement::ZERO);
    assert_eq!(BaseElement::new(M - 1), -BaseElement::ONE);

    let r = BaseElement::random();
    assert_eq!(r, -(-r));
}

#[test]
fn mul() {
    // identity
    let r = BaseElement::random();
    assert_eq!(BaseElement::ZERO, r * BaseElement::ZERO);
    assert_eq!(r, r * BaseElement::ONE);

    // test multiplication within bounds
    assert_eq!(BaseElement::from(15u8), BaseElement::from(5u8) * BaseElement::from(3u8));

    // test overflow
    let t = BaseElement::new(M - 1);
    assert_eq!(BaseElement::ONE, t * t);
    assert_eq!(BaseElement::new(M - 2), t * BaseElement::from(2u8));
    assert_eq!(BaseElement::new(M - 4), t * BaseElement::from(4u8));

    let t = BaseElement::new((M + 1) / 2);
    assert_eq!(BaseElement::ONE, t * BaseElement::from(2u8));
}

#[test]
fn exp() {
    let a = BaseElement::ZERO;
    assert_eq!(a.exp(0), BaseElement::ONE);
    assert_eq!(a.exp(1), BaseElement::ZERO);
    assert_eq!(a.exp7(), BaseElement::ZERO);

    let a = BaseElement::ONE;
    assert_eq!(a.exp(0), BaseElement::ONE);
    assert_eq!(a.exp(1), BaseElement::ONE);
    assert_eq!(a.exp(3), BaseElement::ONE);
    assert_eq!(a.exp7(), BaseElement::ONE);

    let a = BaseElement::random();
    assert_eq!(a.exp(3), a * a * a);
    assert_eq!(a.exp(7), a.exp7());
}

#[test]
fn inv() {
    // identity
    assert_eq!(BaseElement::ONE, BaseElement::inv(BaseElement::ONE));
    assert_eq!(BaseElement::ZERO, BaseElement::inv(BaseElement::ZERO));

    let r = BaseElement::random();
    assert_eq!(BaseElement::ONE, r * r.inv());
}

#[test]
fn div() {
    let r = BaseElement::random();
    assert_eq!(r, r / BaseElement::ONE);

    // division by zero yields zero
    assert_eq!(BaseElement::ZERO, r / BaseElement::ZERO);
}

#[test]
fn element_as_int() {
    let v = u64::MAX;
    let e = BaseElement::new(v);
    assert_eq!(v % M, e.as_int());

    let e1 = BaseElement::new(0);
    let e2 = BaseElement::new(M);
    assert_eq!(e1.as_int(), e2.as_int());
    assert_eq!(e1.as_int(), 0);
}

#[test]
fn equals() {
    let a = BaseElement::ONE;
    let b = BaseElement::new(M - 1) * BaseElement::new(M - 1);

    // elements are equal
    assert_eq!(a, b);
    assert_eq!(a.as_int(), b.as_int());
}

#[test]
fn from_u128() {
    let v = u128::MAX;
    let e = BaseElement::from(v);
    assert_eq!((v % (M as u128)) as u64, e.as_int());
}

#[test]
fn random_is_canonical() {
    for _ in 0..1000 {
        let e = BaseElement::random();
        assert!(e.as_int() < M);
    }
}

// RANDOMIZED TESTS
// ================================================================================================

proptest! {

    #[test]
    fn add_proptest(a in any::<u64>(), b in any::<u64>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let result = v1 + v2;

        let expected = (((a as u128) + (b as u128)) % (M as u128)) as u64;
        prop_assert_eq!(expected, result.as_int());
    }

    #[test]
    fn sub_proptest(a in any::<u64>(), b in any::<u64>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let result = v1 - v2;

        let a = a % M;
        let b = b % M;
        let expected = if a < b { M - b + a } else { a - b };

        prop_assert_eq!(expected, result.as_int());
    }

    #[test]
    fn sub_matches_add_neg_proptest(a in any::<u64>(), b in any::<u64>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);

        prop_assert_eq!(v1 - v2, v1 + (-v2));
    }

    #[test]
    fn neg_proptest(a in any::<u64>()) {
        let v = BaseElement::new(a);
        let expected = (M - (a % M)) % M;

        prop_assert_eq!(expected, (-v).as_int());
    }

    #[test]
    fn mul_proptest(a in any::<u64>(), b in any::<u64>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);
        let result = v1 * v2;

        let expected = (((a as u128) * (b as u128)) % (M as u128)) as u64;
        prop_assert_eq!(expected, result.as_int());
    }

    #[test]
    fn exp_proptest(a in any::<u64>(), b in any::<u64>()) {
        let result = BaseElement::new(a).exp(b);

        let b = BigUint::from(b);
        let m = BigUint::from(M);
        let expected = BigUint::from(a).modpow(&b, &m);
        prop_assert_eq!(expected, BigUint::from(result.as_int()));
    }

    #[test]
    fn exp_small_matches_repeated_mul_proptest(a in any::<u64>(), n in 0u64..1024) {
        let v = BaseElement::new(a);

        let mut expected = BaseElement::ONE;
        for _ in 0..n {
            expected *= v;
        }

        prop_assert_eq!(expected, v.exp(n));
    }

    #[test]
    fn exp7_proptest(a in any::<u64>()) {
        let v = BaseElement::new(a);
        prop_assert_eq!(v.exp(7), v.exp7());
    }

    #[test]
    fn inv_proptest(a in any::<u64>()) {
        let a = BaseElement::new(a);
        let b = a.inv();

        let expected = if a == BaseElement::ZERO { BaseElement::ZERO } else { BaseElement::ONE };
        prop_assert_eq!(expected, a * b);
    }

    #[test]
    fn div_mul_round_trip_proptest(a in any::<u64>(), b in any::<u64>()) {
        let v1 = BaseElement::new(a);
        let v2 = BaseElement::new(b);

        let result = (v1 * v2) / v2;
        let expected = if v2 == BaseElement::ZERO { BaseElement::ZERO } else { v1 };
        prop_assert_eq!(expected, result);
    }

    #[test]
    fn element_as_int_proptest(a in any::<u64>()) {
        let e = BaseElement::new(a);
        prop_assert_eq!(a % M, e.as_int());
    }
}
