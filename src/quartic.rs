//! Degree-3 (quartic) polynomial batch operations used by FRI's fold-by-4
//! step: evaluating and Lagrange-interpolating many degree-3 polynomials at
//! once, amortizing the field inversions across the whole batch.

use crate::field::StarkField;

/// Evaluates the degree-3 polynomial `p` (4 coefficients) at `x`.
pub fn eval<E: StarkField>(p: &[E], x: E) -> E {
    debug_assert_eq!(p.len(), 4, "quartic polynomial must have exactly 4 terms");
    let mut y = E::add(p[0], E::mul(p[1], x));

    let x2 = E::mul(x, x);
    y = E::add(y, E::mul(p[2], x2));

    let x3 = E::mul(x2, x);
    y = E::add(y, E::mul(p[3], x3));

    y
}

/// Evaluates a batch of degree-3 polynomials (4 sequential coefficients each)
/// at the corresponding X coordinate.
pub fn evaluate_batch<E: StarkField>(polys: &[E], xs: &[E]) -> Vec<E> {
    let n = polys.len() / 4;
    debug_assert_eq!(polys.len() % 4, 0, "each polynomial must contain 4 coefficients");
    debug_assert_eq!(n, xs.len(), "number of polynomials must equal number of X coordinates");

    let mut result = Vec::with_capacity(n);
    for (i, j) in (0..n).zip((0..polys.len()).step_by(4)) {
        result.push(eval(&polys[j..(j + 4)], xs[i]));
        let _ = i;
    }
    result
}

/// Interpolates batches of 4 `(x, y)` coordinates into degree-3 polynomials,
/// amortizing the batch's field inversions into a single `inv_many` call.
pub fn interpolate_batch<E: StarkField>(xs: &[E], ys: &[E]) -> Vec<E> {
    let n = xs.len() / 4;
    debug_assert_eq!(xs.len(), ys.len(), "number of X and Y coordinates must be equal");
    debug_assert_eq!(xs.len() % 4, 0, "coordinate batches must consist of 4 coordinates each");

    let mut equations = vec![E::ZERO; n * 16];
    let mut inverses = vec![E::ZERO; n * 4];

    for (i, j) in (0..xs.len()).step_by(4).zip((0..equations.len()).step_by(16)) {
        let x01 = E::mul(xs[i], xs[i + 1]);
        let x02 = E::mul(xs[i], xs[i + 2]);
        let x03 = E::mul(xs[i], xs[i + 3]);
        let x12 = E::mul(xs[i + 1], xs[i + 2]);
        let x13 = E::mul(xs[i + 1], xs[i + 3]);
        let x23 = E::mul(xs[i + 2], xs[i + 3]);

        // eq0
        equations[j] = E::mul(E::neg(x12), xs[i + 3]);
        equations[j + 1] = E::add(E::add(x12, x13), x23);
        equations[j + 2] = E::sub(E::sub(E::neg(xs[i + 1]), xs[i + 2]), xs[i + 3]);
        equations[j + 3] = E::ONE;
        inverses[i] = eval(&equations[j..(j + 4)], xs[i]);

        // eq1
        equations[j + 4] = E::mul(E::neg(x02), xs[i + 3]);
        equations[j + 5] = E::add(E::add(x02, x03), x23);
        equations[j + 6] = E::sub(E::sub(E::neg(xs[i]), xs[i + 2]), xs[i + 3]);
        equations[j + 7] = E::ONE;
        inverses[i + 1] = eval(&equations[(j + 4)..(j + 8)], xs[i + 1]);

        // eq2
        equations[j + 8] = E::mul(E::neg(x01), xs[i + 3]);
        equations[j + 9] = E::add(E::add(x01, x03), x13);
        equations[j + 10] = E::sub(E::sub(E::neg(xs[i]), xs[i + 1]), xs[i + 3]);
        equations[j + 11] = E::ONE;
        inverses[i + 2] = eval(&equations[(j + 8)..(j + 12)], xs[i + 2]);

        // eq3
        equations[j + 12] = E::mul(E::neg(x01), xs[i + 2]);
        equations[j + 13] = E::add(E::add(x01, x02), x12);
        equations[j + 14] = E::sub(E::sub(E::neg(xs[i]), xs[i + 1]), xs[i + 2]);
        equations[j + 15] = E::ONE;
        inverses[i + 3] = eval(&equations[(j + 12)..(j + 16)], xs[i + 3]);
    }

    let inverses = E::inv_many(&inverses);

    let mut result = vec![E::ZERO; n * 4];
    for (i, j) in (0..ys.len()).step_by(4).zip((0..equations.len()).step_by(16)) {
        for k in 0..4 {
            let inv_y = E::mul(ys[i + k], inverses[i + k]);
            for c in 0..4 {
                result[i + c] = E::add(result[i + c], E::mul(inv_y, equations[j + k * 4 + c]));
            }
        }
    }
    result
}
