//! 64-bit prime field: p = 2^64 - 45 * 2^32 + 1. Has a multiplicative
//! subgroup of order 2^32, generated by `G`.

use std::convert::TryInto;
use rand::prelude::*;
use rand::distributions::{Distribution, Uniform};
use super::StarkField;

/// Field modulus = 2^64 - 45 * 2^32 + 1.
pub const M: u64 = 18446743880436023297;

/// 2^32 root of unity.
const G: u64 = 8387321423513296549;

/// A 64-bit prime field element, reduced modulo `M`.
pub type F64 = u64;

impl StarkField for F64 {

    const ELEMENT_BYTES: usize = 8;

    const ZERO: F64 = 0;
    const ONE: F64 = 1;

    fn add(a: F64, b: F64) -> F64 {
        let z = (a as u128) + (b as u128);
        if z >= M as u128 { (z - M as u128) as u64 } else { z as u64 }
    }

    fn sub(a: F64, b: F64) -> F64 {
        if a < b { M - b + a } else { a - b }
    }

    fn mul(a: F64, b: F64) -> F64 {
        let mut z = (a as u128) * (b as u128);

        let mut q = (z >> 64) * (M as u128);
        z -= q;
        q = (z >> 64) * (M as u128);
        z -= q;
        q = (z >> 64) * (M as u128);
        z -= q;

        if z >= M as u128 { z -= M as u128; }
        z as u64
    }

    fn inv(x: F64) -> F64 {
        if x == 0 { return 0; }

        let mut a: u128 = 0;
        let mut u: u128 = if x & 1 == 1 { x as u128 } else { (x as u128) + (M as u128) };
        let mut v: u128 = M as u128;
        let mut d = (M as u128) - 1;

        while v != 1 {
            while v < u {
                u -= v;
                d += a;
                while u & 1 == 0 {
                    if d & 1 == 1 { d += M as u128; }
                    u >>= 1;
                    d >>= 1;
                }
            }

            v -= u;
            a += d;

            while v & 1 == 0 {
                if a & 1 == 1 { a += M as u128; }
                v >>= 1;
                a >>= 1;
            }
        }

        while a >= M as u128 { a -= M as u128; }
        a as u64
    }

    fn get_root_of_unity(order: usize) -> F64 {
        assert!(order != 0, "cannot get root of unity for order 0");
        assert!(order.is_power_of_two(), "order must be a power of 2");
        assert!(order.trailing_zeros() <= 32, "order cannot exceed 2^32");
        let p = 1u64 << (32 - order.trailing_zeros());
        Self::exp(G, p as u128)
    }

    fn from_usize(value: usize) -> F64 {
        value as u64
    }

    fn from_bytes(bytes: &[u8]) -> F64 {
        u64::from_le_bytes(bytes[..8].try_into().unwrap()) % M
    }

    fn to_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn rand() -> F64 {
        let range = Uniform::from(0..M);
        let mut g = thread_rng();
        g.sample(range)
    }

    fn prng(seed: [u8; 32]) -> F64 {
        let range = Uniform::from(0..M);
        let mut g = StdRng::from_seed(seed);
        range.sample(&mut g)
    }

    fn prng_vector(seed: [u8; 32], length: usize) -> Vec<F64> {
        let range = Uniform::from(0..M);
        let g = StdRng::from_seed(seed);
        g.sample_iter(range).take(length).collect()
    }
}
