//! Finite field arithmetic.
//!
//! The STARK core is generic over the prime field used for the trace and
//! composition polynomials; this module defines the capability interface
//! (`StarkField`) and two concrete implementations: a 64-bit Goldilocks-style
//! field (`F64`) and a 128-bit field (`F128`), matching the two field sizes
//! required by the specification (one 64-bit, one 128-bit, each with a
//! high-order power-of-two subgroup for radix-2 NTT).
//!
//! Everything upstream of this trait (the pipeline's own logic) only ever
//! calls through `StarkField`; it never reaches for `u64`/`u128` arithmetic
//! directly.

mod f64;
mod f128;

pub use f64::F64;
pub use f128::F128;

use std::fmt::Debug;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Marker bound shared by every concrete field element type. Arithmetic
/// itself lives on `StarkField` as associated functions rather than operator
/// overloads, since field elements here are plain `Copy` integers, not
/// wrapper structs. `Serialize`/`DeserializeOwned` are required here (rather
/// than bolted onto `StarkProof`/`FriProof` individually) so every
/// `serde`-derived struct generic over a field element — the proof object
/// and its FRI component — can derive `Serialize`/`Deserialize` without each
/// one repeating the bound.
pub trait FieldElement: Copy + Clone + Debug + Default + PartialEq + Eq + Send + Sync + Serialize + DeserializeOwned {
}

impl FieldElement for u64 {}
impl FieldElement for u128 {}

/// Capability interface for a prime field with a power-of-two multiplicative
/// subgroup, as required by radix-2 NTT.
pub trait StarkField: FieldElement {

    /// Number of bytes in the canonical little-endian encoding of an element.
    const ELEMENT_BYTES: usize;

    const ZERO: Self;
    const ONE: Self;

    fn add(a: Self, b: Self) -> Self;
    fn sub(a: Self, b: Self) -> Self;
    fn mul(a: Self, b: Self) -> Self;
    fn inv(x: Self) -> Self;

    fn div(a: Self, b: Self) -> Self {
        Self::mul(a, Self::inv(b))
    }

    fn neg(x: Self) -> Self {
        Self::sub(Self::ZERO, x)
    }

    fn exp(b: Self, p: u128) -> Self {
        if p == 0 { return Self::ONE; }
        if b == Self::ZERO { return Self::ZERO; }

        let mut r = Self::ONE;
        let mut b = b;
        let mut p = p;
        while p > 0 {
            if p & 1 == 1 {
                r = Self::mul(r, b);
            }
            p >>= 1;
            b = Self::mul(b, b);
        }
        r
    }

    /// Computes multiplicative inverses of a batch of elements using the
    /// standard amortized-inversion trick (a single `inv` call for the
    /// whole batch). Zero entries map to zero.
    fn inv_many(values: &[Self]) -> Vec<Self> {
        let mut result = vec![Self::ONE; values.len()];
        let mut last = Self::ONE;
        for i in 0..values.len() {
            result[i] = last;
            if values[i] != Self::ZERO {
                last = Self::mul(last, values[i]);
            }
        }

        last = Self::inv(last);
        for i in (0..values.len()).rev() {
            if values[i] == Self::ZERO {
                result[i] = Self::ZERO;
            } else {
                result[i] = Self::mul(last, result[i]);
                last = Self::mul(last, values[i]);
            }
        }
        result
    }

    /// Returns a primitive root of unity of the given `order` (a power of 2).
    fn get_root_of_unity(order: usize) -> Self;

    /// Returns `[1, b, b^2, ..., b^(length-1)]`.
    fn get_power_series(b: Self, length: usize) -> Vec<Self> {
        let mut result = Vec::with_capacity(length);
        let mut power = Self::ONE;
        for _ in 0..length {
            result.push(power);
            power = Self::mul(power, b);
        }
        result
    }

    fn from_usize(value: usize) -> Self;
    fn from_bytes(bytes: &[u8]) -> Self;
    fn to_bytes(self) -> Vec<u8>;

    fn rand() -> Self;
    fn rand_vector(length: usize) -> Vec<Self> {
        (0..length).map(|_| Self::rand()).collect()
    }

    /// Deterministic pseudo-random field element derived from a 32-byte seed.
    /// Used by the transcript to turn absorbed Merkle roots into challenges.
    fn prng(seed: [u8; 32]) -> Self;
    fn prng_vector(seed: [u8; 32], length: usize) -> Vec<Self>;
}
