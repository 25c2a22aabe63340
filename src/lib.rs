// Copyright (c) Facebook, Inc. and its affiliates.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! An implementation of the Rescue Prime hash function over the 64-bit prime field with
//! modulus $2^{64} - 2^{32} + 1$.
//!
//! The hash function is implemented according to the Rescue Prime
//! [specifications](https://eprint.iacr.org/2020/1143.pdf) with the following exceptions:
//! * The number of rounds is set to 7, which implies a 40% security margin instead of the 50%
//!   margin used in the specifications (a 50% margin rounds up to 8 rounds). The primary
//!   motivation for this is that having the number of rounds be one less than a power of two
//!   simplifies AIR design for computations involving the hash function.
//! * The first 4 elements of the state (rather than the last 4 elements) are used for capacity
//!   and the remaining 8 elements for rate. The output of the hash function comes from the first
//!   four elements of the rate portion of the state (elements 4, 5, 6, and 7). This effectively
//!   applies a fixed bit permutation before and after the XLIX permutation. We assert without
//!   proof that this does not affect security of the construction.
//! * When hashing a sequence of elements, no padding elements are appended to the end of the
//!   sequence. Instead, the first capacity element is initialized to the number of elements to
//!   be hashed. This means that the number of elements must be known upfront, and the function
//!   cannot be used in a stream mode.
//!
//! The parameters used to instantiate the function are:
//! * Field: 64-bit prime field with modulus $2^{64} - 2^{32} + 1$.
//! * State width: 12 field elements.
//! * Capacity size: 4 field elements.
//! * Number of rounds: 7.
//! * S-Box degree: 7.
//!
//! The above parameters target a 128-bit security level. A digest consists of four field
//! elements and can be serialized into 32 bytes (256 bits); how digests are encoded into bytes
//! is left to the caller.

pub mod field;

mod rescue;
pub use rescue::{
    hash, merge, permute, ALPHA, ARK1, ARK2, CAPACITY_RANGE, DIGEST_RANGE, DIGEST_SIZE,
    INV_ALPHA, MDS, NUM_ROUNDS, RATE_RANGE, RATE_WIDTH, STATE_WIDTH,
};
