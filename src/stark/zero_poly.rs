//! `Z(x) = (x^T - 1) / (x - g^(T-1))`, the vanishing polynomial of the trace
//! domain `D_T`, represented as numerator and denominator vectors rather
//! than materialized so that dividing the transition-constraint combination
//! by it is an O(|D_E|) pointwise operation instead of a polynomial long
//! division.

use crate::field::StarkField;

/// `Z(x) = (x^T - 1) / (x - g^(T-1))` over the trace domain `D_T` of size
/// `trace_length`, evaluated over a domain of size `trace_length * k2`.
pub struct ZeroPolynomial<E: StarkField> {
    trace_length: usize,
    extension_factor: usize,
    last_trace_point: E,
}

impl<E: StarkField> ZeroPolynomial<E> {
    /// `extension_factor` is `k2 = |D_E| / |D_T|`; `trace_generator` is the
    /// generator `g` of `D_T`.
    pub fn new(trace_length: usize, extension_factor: usize, trace_generator: E) -> Self {
        let last_trace_point = E::exp(trace_generator, (trace_length - 1) as u128);
        ZeroPolynomial { trace_length, extension_factor, last_trace_point }
    }

    /// Evaluates the numerator and denominator of `Z(x)` over every point of
    /// `domain` (expected to be `D_E`, ordered as `domain_root^i`).
    ///
    /// The numerator `x^T - 1` only takes `extension_factor` distinct values
    /// on `D_E` (one per coset of `D_T`), indexed by `i mod extension_factor`;
    /// the denominator `x - g^(T-1)` is evaluated at every position since it
    /// has no such periodicity.
    pub fn evaluate_all(&self, domain: &[E]) -> (Vec<E>, Vec<E>) {
        let mut numerators = Vec::with_capacity(self.extension_factor);
        for i in 0..self.extension_factor {
            let x = domain[i];
            let numerator = E::sub(E::exp(x, self.trace_length as u128), E::ONE);
            numerators.push(numerator);
        }

        let denominators: Vec<E> = domain.iter()
            .map(|&x| E::sub(x, self.last_trace_point))
            .collect();

        (numerators, denominators)
    }

    /// Looks up the numerator value for domain position `index`, given the
    /// per-coset numerator vector returned by [`Self::evaluate_all`].
    pub fn numerator_at(&self, numerators: &[E], index: usize) -> E {
        numerators[index % self.extension_factor]
    }

    /// `g^(T-1)`, the sole zero of the denominator `x - g^(T-1)`. Exposed so
    /// the composition polynomial can divide its numerator by `Z(x)` in
    /// coefficient form via [`crate::polynom::syn_div_expanded_in_place`],
    /// which takes this point as its `exceptions` argument.
    pub fn last_trace_point(&self) -> E {
        self.last_trace_point
    }

    /// Evaluates `Z(x)` directly at a single point, as used by the verifier
    /// when reconstructing `C(x)` at a queried position. Panics if `x` is a
    /// root of `D_T` (`Z` has a zero there, and queried positions are
    /// required to avoid `D_T`).
    pub fn evaluate_at(&self, x: E) -> E {
        let numerator = E::sub(E::exp(x, self.trace_length as u128), E::ONE);
        let denominator = E::sub(x, self.last_trace_point);
        assert_ne!(E::ZERO, denominator, "Z(x) is undefined at a point of the trace domain");
        E::div(numerator, denominator)
    }
}
