//! Radix-2 number-theoretic transform (NTT): forward evaluation and inverse
//! interpolation of polynomials over power-of-two multiplicative subgroups.
//!
//! The recursive, twiddle-factor structure spins up
//! `crossbeam_utils::thread::scope` once the work per branch drops below
//! `MAX_LOOP`: NTT, Merkle hashing, and FRI folding are all data-parallel by
//! position and may be parallelized across cores as long as the result
//! stays bit-for-bit deterministic regardless of thread count.

use crossbeam_utils::thread;
use crate::field::StarkField;

const USIZE_BITS: usize = 0_usize.count_zeros() as usize;
const MAX_LOOP: usize = 256;

/// In-place recursive NTT with permuted (bit-reversed) output. If
/// `num_threads` is > 1, independent halves of the recursion run on separate
/// threads; the numeric result is identical regardless of thread count.
pub fn fft_in_place<E: StarkField>(values: &mut [E], twiddles: &[E], count: usize, stride: usize, offset: usize, num_threads: usize) {

    let size = values.len() / stride;
    debug_assert!(size.is_power_of_two());
    debug_assert!(offset < stride);
    debug_assert_eq!(values.len() % size, 0);
    debug_assert!(num_threads.is_power_of_two());

    if size > 2 {
        if stride == count && count < MAX_LOOP {
            fft_in_place(values, twiddles, 2 * count, 2 * stride, offset, num_threads);
        } else if num_threads > 1 {
            thread::scope(|s| {
                // SAFETY: the two halves of the recursion touch disjoint
                // strided slices of `values` and never alias.
                let values2 = unsafe { &mut *(values as *mut [E]) };
                s.spawn(move |_| {
                    fft_in_place(values2, twiddles, count, 2 * stride, offset, num_threads / 2);
                });
                fft_in_place(values, twiddles, count, 2 * stride, offset + stride, num_threads / 2);
            }).unwrap();
        } else {
            fft_in_place(values, twiddles, count, 2 * stride, offset, num_threads);
            fft_in_place(values, twiddles, count, 2 * stride, offset + stride, num_threads);
        }
    }

    for offset in offset..(offset + count) {
        butterfly(values, offset, stride);
    }

    let last_offset = offset + size * stride;
    for (i, offset) in (offset..last_offset).step_by(2 * stride).enumerate().skip(1) {
        for j in offset..(offset + count) {
            butterfly_twiddle(values, twiddles[i], j, stride);
        }
    }
}

pub fn get_twiddles<E: StarkField>(root: E, size: usize) -> Vec<E> {
    assert!(size.is_power_of_two());
    assert_eq!(E::exp(root, size as u128), E::ONE);
    let mut twiddles = E::get_power_series(root, size / 2);
    permute(&mut twiddles);
    twiddles
}

pub fn get_inv_twiddles<E: StarkField>(root: E, size: usize) -> Vec<E> {
    let inv_root = E::exp(root, (size - 1) as u128);
    get_twiddles(inv_root, size)
}

pub fn permute<E: StarkField>(v: &mut [E]) {
    let n = v.len();
    for i in 0..n {
        let j = permute_index(n, i);
        if j > i {
            v.swap(i, j);
        }
    }
}

fn permute_index(size: usize, index: usize) -> usize {
    debug_assert!(index < size);
    if size == 1 { return 0; }
    debug_assert!(size.is_power_of_two());
    let bits = size.trailing_zeros() as usize;
    index.reverse_bits() >> (USIZE_BITS - bits)
}

#[inline(always)]
fn butterfly<E: StarkField>(values: &mut [E], offset: usize, stride: usize) {
    let i = offset;
    let j = offset + stride;
    let temp = values[i];
    values[i] = E::add(temp, values[j]);
    values[j] = E::sub(temp, values[j]);
}

#[inline(always)]
fn butterfly_twiddle<E: StarkField>(values: &mut [E], twiddle: E, offset: usize, stride: usize) {
    let i = offset;
    let j = offset + stride;
    let temp = values[i];
    values[j] = E::mul(values[j], twiddle);
    values[i] = E::add(temp, values[j]);
    values[j] = E::sub(temp, values[j]);
}
