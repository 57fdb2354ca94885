//! Dense univariate polynomial operations over a `StarkField`: evaluation
//! (naive and NTT-based), interpolation (Lagrange and NTT-based), the usual
//! ring operations, and synthetic division by a monomial or by a sparse
//! vanishing polynomial.

use std::mem;
use crate::field::StarkField;
use crate::fft;

/// Evaluates polynomial `p` (coefficients, low degree first) at `x`.
pub fn eval<E: StarkField>(p: &[E], x: E) -> E {
    let mut y = E::ZERO;
    let mut power_of_x = E::ONE;
    for &coeff in p {
        y = E::add(y, E::mul(coeff, power_of_x));
        power_of_x = E::mul(power_of_x, x);
    }
    y
}

/// Evaluates `p` over its entire NTT domain in place via forward NTT.
pub fn eval_fft<E: StarkField>(p: &mut [E], unpermute: bool) {
    let g = E::get_root_of_unity(p.len());
    let twiddles = fft::get_twiddles(g, p.len());
    eval_fft_twiddles(p, &twiddles, unpermute);
}

pub fn eval_fft_twiddles<E: StarkField>(p: &mut [E], twiddles: &[E], unpermute: bool) {
    debug_assert_eq!(p.len(), twiddles.len() * 2, "invalid number of twiddles");
    fft::fft_in_place(p, twiddles, 1, 1, 0, 1);
    if unpermute {
        fft::permute(p);
    }
}

/// Lagrange-interpolates the polynomial passing through `(xs[i], ys[i])`.
pub fn interpolate<E: StarkField>(xs: &[E], ys: &[E]) -> Vec<E> {
    debug_assert_eq!(xs.len(), ys.len(), "number of X and Y coordinates must be the same");

    let roots = get_zero_roots(xs);
    let mut divisor = [E::ZERO, E::ONE];
    let mut numerators: Vec<Vec<E>> = Vec::with_capacity(xs.len());
    for &x in xs {
        divisor[0] = E::neg(x);
        numerators.push(div(&roots, &divisor));
    }

    let mut denominators: Vec<E> = Vec::with_capacity(xs.len());
    for i in 0..xs.len() {
        denominators.push(eval(&numerators[i], xs[i]));
    }
    let denominators = E::inv_many(&denominators);

    let mut result = vec![E::ZERO; xs.len()];
    for i in 0..xs.len() {
        if ys[i] == E::ZERO { continue; }
        let y_slice = E::mul(ys[i], denominators[i]);
        for j in 0..xs.len() {
            if numerators[i][j] != E::ZERO {
                result[j] = E::add(result[j], E::mul(numerators[i][j], y_slice));
            }
        }
    }
    result
}

/// Inverse-NTT interpolation of evaluations `v` over the implied root-of-unity
/// domain of size `v.len()`, done in place.
pub fn interpolate_fft<E: StarkField>(v: &mut [E], unpermute: bool) {
    let g = E::get_root_of_unity(v.len());
    let twiddles = fft::get_inv_twiddles(g, v.len());
    interpolate_fft_twiddles(v, &twiddles, unpermute);
}

pub fn interpolate_fft_twiddles<E: StarkField>(v: &mut [E], inv_twiddles: &[E], unpermute: bool) {
    fft::fft_in_place(v, inv_twiddles, 1, 1, 0, 1);
    let inv_length = E::inv(E::from_usize(v.len()));
    for e in v.iter_mut() {
        *e = E::mul(*e, inv_length);
    }
    if unpermute {
        fft::permute(v);
    }
}

pub fn add<E: StarkField>(a: &[E], b: &[E]) -> Vec<E> {
    let len = a.len().max(b.len());
    (0..len).map(|i| {
        let c1 = if i < a.len() { a[i] } else { E::ZERO };
        let c2 = if i < b.len() { b[i] } else { E::ZERO };
        E::add(c1, c2)
    }).collect()
}

pub fn sub<E: StarkField>(a: &[E], b: &[E]) -> Vec<E> {
    let len = a.len().max(b.len());
    (0..len).map(|i| {
        let c1 = if i < a.len() { a[i] } else { E::ZERO };
        let c2 = if i < b.len() { b[i] } else { E::ZERO };
        E::sub(c1, c2)
    }).collect()
}

pub fn mul<E: StarkField>(a: &[E], b: &[E]) -> Vec<E> {
    let result_len = a.len() + b.len() - 1;
    let mut result = vec![E::ZERO; result_len];
    for i in 0..a.len() {
        for j in 0..b.len() {
            let s = E::mul(a[i], b[j]);
            result[i + j] = E::add(result[i + j], s);
        }
    }
    result
}

pub fn mul_by_const<E: StarkField>(p: &[E], k: E) -> Vec<E> {
    p.iter().map(|&c| E::mul(c, k)).collect()
}

/// Divides `a` by `b`; if they don't divide evenly the remainder is dropped.
pub fn div<E: StarkField>(a: &[E], b: &[E]) -> Vec<E> {
    let mut apos = degree_of(a);
    let mut a = a.to_vec();

    let bpos = degree_of(b);
    assert!(apos >= bpos, "cannot divide by polynomial of higher degree");
    if bpos == 0 {
        assert!(b[0] != E::ZERO, "cannot divide polynomial by zero");
    }

    let mut result = vec![E::ZERO; apos - bpos + 1];
    for i in (0..result.len()).rev() {
        let quot = E::div(a[apos], b[bpos]);
        result[i] = quot;
        for j in (0..bpos).rev() {
            a[i + j] = E::sub(a[i + j], E::mul(b[j], quot));
        }
        apos = apos.wrapping_sub(1);
    }
    result
}

/// Divides `a` by the monomial `(x - b)` using synthetic division.
pub fn syn_div<E: StarkField>(a: &[E], b: E) -> Vec<E> {
    let mut result = a.to_vec();
    syn_div_in_place(&mut result, b);
    result
}

pub fn syn_div_in_place<E: StarkField>(a: &mut [E], b: E) {
    let mut c = E::ZERO;
    for i in (0..a.len()).rev() {
        let temp = E::add(a[i], E::mul(b, c));
        a[i] = c;
        c = temp;
    }
}

/// Divides `a` by `(x^degree - 1) / prod_i (x - exceptions[i])` in place.
/// Used to divide the numerator of the composition polynomial by the zero
/// polynomial `Z(x)` expressed as numerator/denominator vectors (§4.4).
///
/// `a / Z` is computed as `a * prod_i (x - exceptions[i]) / (x^degree - 1)`:
/// each exception first multiplies `a` via synthetic multiplication (growing
/// its degree by one per exception), and only then is the product folded
/// modulo `x^degree - 1`, which divides it evenly.
pub fn syn_div_expanded_in_place<E: StarkField>(a: &mut [E], degree: usize, exceptions: &[E]) {
    let mut result = a.to_vec();

    for &exception in exceptions {
        let exception = E::neg(exception);
        result.push(E::ZERO);

        let mut next_term = result[0];
        result[0] = E::ZERO;
        for i in 0..(result.len() - 1) {
            result[i] = E::add(result[i], E::mul(next_term, exception));
            mem::swap(&mut next_term, &mut result[i + 1]);
        }
    }

    let degree_offset = result.len() - degree;
    for i in (0..degree_offset).rev() {
        result[i] = E::add(result[i], result[i + degree]);
    }

    a[..degree_offset].copy_from_slice(&result[degree..]);
    for i in degree_offset..a.len() {
        a[i] = E::ZERO;
    }
}

pub fn degree_of<E: StarkField>(poly: &[E]) -> usize {
    for i in (0..poly.len()).rev() {
        if poly[i] != E::ZERO { return i; }
    }
    0
}

/// Returns the degree of the polynomial whose evaluations over the
/// root-of-unity domain are `evaluations`.
pub fn infer_degree<E: StarkField>(evaluations: &[E]) -> usize {
    assert!(evaluations.len().is_power_of_two(), "number of evaluations must be a power of 2");
    let mut poly = evaluations.to_vec();
    interpolate_fft(&mut poly, true);
    degree_of(&poly)
}

fn get_zero_roots<E: StarkField>(xs: &[E]) -> Vec<E> {
    let mut n = xs.len() + 1;
    let mut result = vec![E::ZERO; n];

    n -= 1;
    result[n] = E::ONE;

    for &x in xs {
        n -= 1;
        result[n] = E::ZERO;
        for j in n..xs.len() {
            result[j] = E::sub(result[j], E::mul(result[j + 1], x));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use crate::field::{ F64, StarkField };

    #[test]
    fn eval_matches_fft() {
        let n = 64;
        let poly = F64::rand_vector(n);

        let mut y1 = poly.clone();
        super::eval_fft(&mut y1, true);

        let roots = F64::get_power_series(F64::get_root_of_unity(n), n);
        let y2: Vec<F64> = roots.iter().map(|&x| super::eval(&poly, x)).collect();
        assert_eq!(y1, y2);
    }

    #[test]
    fn add_sub_mul() {
        let a: Vec<F64> = vec![10, 20, 3];
        let b: Vec<F64> = vec![4, 5];
        assert_eq!(vec![14, 25, 3], super::add(&a, &b));
        assert_eq!(vec![6, 15, 3], super::sub(&a, &b));
    }

    #[test]
    fn div_exact() {
        let a: Vec<F64> = super::mul(&[2, 1], &[3, 1]); // (x+2)(x+3)
        let b: Vec<F64> = vec![3, 1];
        assert_eq!(vec![2, 1], super::div(&a, &b));
    }

    #[test]
    fn syn_div_matches_div() {
        let poly: Vec<F64> = super::mul(&[2, 1], &[3, 1]);
        let result = super::syn_div(&poly, F64::neg(3));
        let expected = super::div(&poly, &[3, 1]);
        assert_eq!(expected, result[..expected.len()].to_vec());
    }

    #[test]
    fn syn_div_expanded_recovers_quotient() {
        // Z(x) = (x^4 - 1) / (x - e), built via ordinary synthetic division
        // so the test doesn't depend on the function under test.
        let n = 4;
        let r = F64::get_root_of_unity(n);
        let e = F64::exp(r, (n - 1) as u128);

        let mut vanishing = vec![F64::ZERO; n + 1];
        vanishing[0] = F64::neg(F64::ONE);
        vanishing[n] = F64::ONE;
        let z = super::div(&vanishing, &[F64::neg(e), F64::ONE]);

        let q: Vec<F64> = vec![5, 7, 11];
        let mut a = super::mul(&q, &z);
        a.resize(8, F64::ZERO);

        super::syn_div_expanded_in_place(&mut a, n, &[e]);
        assert_eq!(q, a[..q.len()].to_vec());
        assert!(a[q.len()..].iter().all(|&c| c == F64::ZERO));
    }

    #[test]
    fn interpolate_matches_eval() {
        let xs: Vec<F64> = vec![1, 2, 3, 4];
        let ys: Vec<F64> = vec![10, 20, 30, 40];
        let poly = super::interpolate(&xs, &ys);
        for i in 0..xs.len() {
            assert_eq!(ys[i], super::eval(&poly, xs[i]));
        }
    }

    #[test]
    fn degree_of_trims_zeros() {
        assert_eq!(0, super::degree_of::<F64>(&[1]));
        assert_eq!(1, super::degree_of::<F64>(&[1, 2, 0]));
        assert_eq!(2, super::degree_of::<F64>(&[1, 2, 3, 0]));
    }

    #[test]
    fn infer_degree_matches() {
        let poly: Vec<F64> = vec![1, 2, 3, 4];
        let mut evaluations = poly.clone();
        evaluations.resize(16, 0);
        super::eval_fft(&mut evaluations, true);
        assert_eq!(super::degree_of(&poly), super::infer_degree(&evaluations));
    }
}
