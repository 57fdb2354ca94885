//! 128-bit prime field: p = 2^128 - 9 * 2^32 + 1. Has a multiplicative
//! subgroup of order 2^32, generated by `G`.

use std::convert::TryInto;
use rand::prelude::*;
use rand::distributions::{Distribution, Uniform};
use super::StarkField;

/// Field modulus = 2^128 - 9 * 2^32 + 1.
pub const M: u128 = 340282366920938463463374607393113505793;

/// 2^32 root of unity.
const G: u128 = 8387321423513296549;

/// A 128-bit prime field element, reduced modulo `M`.
pub type F128 = u128;

impl StarkField for F128 {

    const ELEMENT_BYTES: usize = 16;

    const ZERO: F128 = 0;
    const ONE: F128 = 1;

    fn add(a: F128, b: F128) -> F128 {
        let z = M - b;
        if a < z { M - z + a } else { a - z }
    }

    fn sub(a: F128, b: F128) -> F128 {
        if a < b { M - b + a } else { a - b }
    }

    // 128x128 -> 256 bit multiply, reduced via a 64-bit-limb schoolbook
    // reduction, since no native u256 type exists in stable Rust.
    fn mul(a: F128, b: F128) -> F128 {
        let (z, x2) = mul_reduce(a, (b >> 64) as u64);
        let (y0, y1, y2) = mul_128x64(a, b as u64);

        let (mut y1, carry) = adc(y1, z as u64, 0);
        let (mut y2, carry) = adc(y2, (z >> 64) as u64, carry);
        let y3 = x2 + carry;

        if y3 == 1 {
            let (t0, t1) = sub_modulus(y1, y2);
            y1 = t0; y2 = t1;
        }

        let (q0, q1, q2) = mul_by_mod(y2);
        let (mut z0, mut z1, z2) = sub_192x192(y0, y1, y2, q0, q1, q2);

        if z2 == 1 || (z1 == (M >> 64) as u64 && z0 > M as u64) {
            let (t0, t1) = sub_modulus(z0, z1);
            z0 = t0; z1 = t1;
        }

        ((z1 as u128) << 64) + (z0 as u128)
    }

    fn inv(x: F128) -> F128 {
        if x == 0 { return 0; }

        let mut v = M;
        let (mut a0, mut a1, mut a2) = (0u64, 0u64, 0u64);
        let (mut u0, mut u1, mut u2) = if x & 1 == 1 {
            (x as u64, (x >> 64) as u64, 0u64)
        } else {
            add_192x192(x as u64, (x >> 64) as u64, 0, M as u64, (M >> 64) as u64, 0)
        };
        let (mut d0, mut d1, mut d2) = ((M as u64).wrapping_sub(1), (M >> 64) as u64, 0u64);

        while v != 1 {
            while u2 > 0 || (u0 as u128) + ((u1 as u128) << 64) > v {
                let (t0, t1, t2) = sub_192x192(u0, u1, u2, v as u64, (v >> 64) as u64, 0);
                u0 = t0; u1 = t1; u2 = t2;

                let (t0, t1, t2) = add_192x192(d0, d1, d2, a0, a1, a2);
                d0 = t0; d1 = t1; d2 = t2;

                while u0 & 1 == 0 {
                    if d0 & 1 == 1 {
                        let (t0, t1, t2) = add_192x192(d0, d1, d2, M as u64, (M >> 64) as u64, 0);
                        d0 = t0; d1 = t1; d2 = t2;
                    }
                    u0 = (u0 >> 1) | ((u1 & 1) << 63);
                    u1 = (u1 >> 1) | ((u2 & 1) << 63);
                    u2 >>= 1;

                    d0 = (d0 >> 1) | ((d1 & 1) << 63);
                    d1 = (d1 >> 1) | ((d2 & 1) << 63);
                    d2 >>= 1;
                }
            }

            let u_lo = (u0 as u128) + ((u1 as u128) << 64);
            v -= u_lo;

            let (t0, t1, t2) = add_192x192(a0, a1, a2, d0, d1, d2);
            a0 = t0; a1 = t1; a2 = t2;

            while v & 1 == 0 {
                if a0 & 1 == 1 {
                    let (t0, t1, t2) = add_192x192(a0, a1, a2, M as u64, (M >> 64) as u64, 0);
                    a0 = t0; a1 = t1; a2 = t2;
                }
                v >>= 1;
                a0 = (a0 >> 1) | ((a1 & 1) << 63);
                a1 = (a1 >> 1) | ((a2 & 1) << 63);
                a2 >>= 1;
            }
        }

        let mut a = (a0 as u128) + ((a1 as u128) << 64);
        while a2 > 0 || a >= M {
            let (t0, t1, t2) = sub_192x192(a0, a1, a2, M as u64, (M >> 64) as u64, 0);
            a0 = t0; a1 = t1; a2 = t2;
            a = (a0 as u128) + ((a1 as u128) << 64);
        }

        a
    }

    fn get_root_of_unity(order: usize) -> F128 {
        assert!(order != 0, "cannot get root of unity for order 0");
        assert!(order.is_power_of_two(), "order must be a power of 2");
        assert!(order.trailing_zeros() <= 32, "order cannot exceed 2^32");
        let p = 1u64 << (32 - order.trailing_zeros());
        Self::exp(G, p as u128)
    }

    fn from_usize(value: usize) -> F128 {
        value as u128
    }

    fn from_bytes(bytes: &[u8]) -> F128 {
        u128::from_le_bytes(bytes[..16].try_into().unwrap()) % M
    }

    fn to_bytes(self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn rand() -> F128 {
        let range = Uniform::from(0..M);
        let mut g = thread_rng();
        g.sample(range)
    }

    fn prng(seed: [u8; 32]) -> F128 {
        let range = Uniform::from(0..M);
        let mut g = StdRng::from_seed(seed);
        range.sample(&mut g)
    }

    fn prng_vector(seed: [u8; 32], length: usize) -> Vec<F128> {
        let range = Uniform::from(0..M);
        let g = StdRng::from_seed(seed);
        g.sample_iter(range).take(length).collect()
    }
}

// HELPER FUNCTIONS (128x128 -> 256 schoolbook arithmetic)
// ================================================================================================

fn mul_reduce(a: u128, b: u64) -> (u128, u64) {
    let (z0, z1, z2) = mul_128x64(a, b);
    let (q0, q1, q2) = mul_by_mod(z2);
    let (z0, z1, z2) = sub_192x192(z0, z1, z2, q0, q1, q2);
    ((z0 as u128) + ((z1 as u128) << 64), z2)
}

#[inline(always)]
fn mul_128x64(a: u128, b: u64) -> (u64, u64, u64) {
    let z_lo = ((a as u64) as u128) * (b as u128);
    let z_hi = (a >> 64) * (b as u128);
    let z_hi = z_hi + (z_lo >> 64);
    (z_lo as u64, z_hi as u64, (z_hi >> 64) as u64)
}

#[inline(always)]
fn mul_by_mod(a: u64) -> (u64, u64, u64) {
    let a_lo = (a as u128).wrapping_mul(M);
    let a_hi = if a == 0 { 0 } else { a - 1 };
    (a_lo as u64, (a_lo >> 64) as u64, a_hi)
}

#[inline(always)]
fn sub_modulus(a_lo: u64, a_hi: u64) -> (u64, u64) {
    let z_lo = (a_lo as u128).wrapping_sub((M as u64) as u128);
    let z_hi = a_hi.wrapping_sub((M >> 64) as u64).wrapping_sub((z_lo >> 127) as u64);
    (z_lo as u64, z_hi)
}

#[inline(always)]
fn sub_192x192(a0: u64, a1: u64, a2: u64, b0: u64, b1: u64, b2: u64) -> (u64, u64, u64) {
    let z0 = (a0 as u128).wrapping_sub(b0 as u128);
    let z1 = (a1 as u128).wrapping_sub((b1 as u128) + (z0 >> 127));
    let z2 = (a2 as u128).wrapping_sub((b2 as u128) + (z1 >> 127));
    (z0 as u64, z1 as u64, z2 as u64)
}

#[inline(always)]
fn add_192x192(a0: u64, a1: u64, a2: u64, b0: u64, b1: u64, b2: u64) -> (u64, u64, u64) {
    let z0 = (a0 as u128) + (b0 as u128);
    let z1 = (a1 as u128) + (b1 as u128) + (z0 >> 64);
    let z2 = (a2 as u128) + (b2 as u128) + (z1 >> 64);
    (z0 as u64, z1 as u64, z2 as u64)
}

#[inline(always)]
const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let ret = (a as u128) + (b as u128) + (carry as u128);
    (ret as u64, (ret >> 64) as u64)
}

#[cfg(test)]
mod tests {
    use super::{ F128, StarkField, M };

    #[test]
    fn add() {
        let r = F128::rand();
        assert_eq!(r, F128::add(r, 0));
        assert_eq!(5, F128::add(2, 3));

        let t = M - 1;
        assert_eq!(0, F128::add(t, 1));
    }

    #[test]
    fn sub() {
        let r = F128::rand();
        assert_eq!(r, F128::sub(r, 0));
        assert_eq!(2, F128::sub(5, 3));
    }

    #[test]
    fn mul() {
        let r = F128::rand();
        assert_eq!(0, F128::mul(r, 0));
        assert_eq!(r, F128::mul(r, 1));
        assert_eq!(15, F128::mul(5, 3));

        let t = M - 1;
        assert_eq!(1, F128::mul(t, t));
    }

    #[test]
    fn inv() {
        assert_eq!(1, F128::inv(1));
        assert_eq!(0, F128::inv(0));

        let x = F128::rand();
        let y = F128::inv(x);
        assert_eq!(1, F128::mul(x, y));
    }

    #[test]
    fn get_root_of_unity() {
        let root = F128::get_root_of_unity(64);
        assert_eq!(1, F128::exp(root, 64));
        assert_ne!(1, F128::exp(root, 32));
    }
}
