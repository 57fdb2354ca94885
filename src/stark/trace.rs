//! Execution trace construction and low-degree extension.
//!
//! Runs the AIR's transition function over the readonly input streams to
//! produce the mutable register rows, then low-degree-extends every
//! register (mutable and readonly alike) from the trace domain `D_T` to the
//! evaluation domain `D_E`. Only the mutable (`state`) and `secret`
//! registers are later committed into the trace Merkle tree — the
//! `input`/`public` registers are, by construction, already known to the
//! verifier, which recomputes their low-degree extension itself rather than
//! receiving it over a Merkle proof.

use crate::air::{ Air, RegisterCounts, ReadonlyRegisters };
use crate::field::StarkField;
use crate::fft;
use crate::polynom;

pub struct TraceTable<E: StarkField> {
    register_counts: RegisterCounts,
    /// Coefficient-form polynomials, one per register, populated by `extend`.
    polys: Vec<Vec<E>>,
    /// Register values; length `trace_length` until `extend` is called,
    /// length `domain_size` afterward.
    values: Vec<Vec<E>>,
    extension_factor: usize,
    extended: bool,
}

impl<E: StarkField> TraceTable<E> {
    /// Runs `air`'s transition function over the readonly streams, seeded
    /// with `initial_state`, to build the full (unextended) trace matrix.
    pub fn build<A: Air<E>>(air: &A, readonly: &ReadonlyRegisters<E>, initial_state: &[E]) -> Self {
        let ctx = air.context();
        let trace_length = ctx.trace_length;
        let state_width = ctx.register_counts.state;
        assert_eq!(state_width, initial_state.len(), "initial state width mismatch");

        let mut state_rows = vec![vec![E::ZERO; trace_length]; state_width];
        for i in 0..state_width {
            state_rows[i][0] = initial_state[i];
        }

        let mut current = initial_state.to_vec();
        for step in 0..(trace_length - 1) {
            let readonly_row = readonly.row_at(step);
            let next = air.evaluate_transition(&current, &readonly_row);
            assert_eq!(state_width, next.len(), "transition function returned wrong row width");
            for i in 0..state_width {
                state_rows[i][step + 1] = next[i];
            }
            current = next;
        }

        let mut values = state_rows;
        values.extend(readonly.input.iter().cloned());
        values.extend(readonly.public.iter().cloned());
        values.extend(readonly.secret.iter().cloned());

        let register_counts = RegisterCounts {
            state: state_width,
            input: readonly.input.len(),
            public: readonly.public.len(),
            secret: readonly.secret.len(),
        };

        TraceTable {
            register_counts,
            polys: Vec::with_capacity(values.len()),
            values,
            extension_factor: 1,
            extended: false,
        }
    }

    /// Low-degree-extends every register from `D_T` (length `trace_length`)
    /// to `D_E` (length `trace_length * extension_factor`) via
    /// interpolate-then-evaluate NTTs, keeping the coefficient form of each
    /// register for later boundary/composition use.
    pub fn extend(&mut self, extension_factor: usize) {
        assert!(!self.extended, "trace table has already been extended");
        assert!(extension_factor.is_power_of_two(), "extension factor must be a power of 2");

        let trace_length = self.values[0].len();
        let domain_size = trace_length * extension_factor;

        let trace_root = E::get_root_of_unity(trace_length);
        let inv_twiddles = fft::get_inv_twiddles(trace_root, trace_length);

        let eval_root = E::get_root_of_unity(domain_size);
        let twiddles = fft::get_twiddles(eval_root, domain_size);

        for register in self.values.iter_mut() {
            let mut poly = register.clone();
            polynom::interpolate_fft_twiddles(&mut poly, &inv_twiddles, true);
            self.polys.push(poly.clone());

            poly.resize(domain_size, E::ZERO);
            polynom::eval_fft_twiddles(&mut poly, &twiddles, true);
            *register = poly;
        }

        self.extension_factor = extension_factor;
        self.extended = true;
    }

    pub fn register_counts(&self) -> RegisterCounts {
        self.register_counts
    }

    pub fn register_count(&self) -> usize {
        self.register_counts.total()
    }

    pub fn is_extended(&self) -> bool {
        self.extended
    }

    pub fn domain_size(&self) -> usize {
        self.values[0].len()
    }

    /// The full register row (all registers, in `state, input, public,
    /// secret` order) at domain position `position`.
    pub fn row_at(&self, position: usize) -> Vec<E> {
        self.values.iter().map(|r| r[position]).collect()
    }

    /// The subset of the row that is Merkle-committed: `state` followed by
    /// `secret` registers.
    pub fn committed_row_at(&self, position: usize) -> Vec<E> {
        let rc = self.register_counts;
        let state_end = rc.state;
        let secret_start = rc.state + rc.input + rc.public;
        let mut row = Vec::with_capacity(rc.state + rc.secret);
        row.extend(self.values[0..state_end].iter().map(|r| r[position]));
        row.extend(self.values[secret_start..].iter().map(|r| r[position]));
        row
    }

    pub fn poly(&self, index: usize) -> &[E] {
        &self.polys[index]
    }

    pub fn state_poly(&self, register: usize) -> &[E] {
        assert!(register < self.register_counts.state);
        &self.polys[register]
    }

    pub fn eval_polys_at(&self, z: E) -> Vec<E> {
        self.polys.iter().map(|p| polynom::eval(p, z)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::{ AirContext, Assertion };
    use crate::field::F64;

    struct Fibonacci;

    impl Air<F64> for Fibonacci {
        fn context(&self) -> &AirContext {
            static CTX: std::sync::OnceLock<AirContext> = std::sync::OnceLock::new();
            CTX.get_or_init(|| AirContext {
                trace_length: 8,
                constraint_degrees: vec![1, 1],
                register_counts: RegisterCounts { state: 2, input: 0, public: 0, secret: 0 },
                trace_shape: vec![8],
            })
        }

        fn evaluate_transition(&self, current: &[F64], _readonly: &[F64]) -> Vec<F64> {
            vec![F64::add(current[0], current[1]), F64::add(current[0], F64::mul(2, current[1]))]
        }

        fn evaluate_constraints(&self, current: &[F64], next: &[F64], _readonly: &[F64]) -> Vec<F64> {
            vec![
                F64::sub(next[0], F64::add(current[0], current[1])),
                F64::sub(next[1], F64::add(current[0], F64::mul(2, current[1]))),
            ]
        }
    }

    fn readonly() -> ReadonlyRegisters<F64> {
        ReadonlyRegisters { input: vec![], public: vec![], secret: vec![] }
    }

    #[test]
    fn build_produces_correct_trace_length() {
        let air = Fibonacci;
        let trace = TraceTable::build(&air, &readonly(), &[1, 1]);
        assert_eq!(8, trace.domain_size());
        assert_eq!(2, trace.register_count());
    }

    #[test]
    fn transition_constraints_are_satisfied_at_every_interior_step() {
        let air = Fibonacci;
        let trace = TraceTable::build(&air, &readonly(), &[1, 1]);
        for step in 0..7 {
            let current = trace.row_at(step);
            let next = trace.row_at(step + 1);
            let c = air.evaluate_constraints(&current, &next, &[]);
            assert_eq!(vec![0, 0], c);
        }
    }

    #[test]
    fn extend_preserves_trace_domain_values() {
        let air = Fibonacci;
        let mut trace = TraceTable::build(&air, &readonly(), &[1, 1]);
        let unextended = (0..8).map(|i| trace.row_at(i)).collect::<Vec<_>>();
        trace.extend(4);
        assert_eq!(32, trace.domain_size());

        let g = F64::get_root_of_unity(32);
        let trace_g = F64::exp(g, 4);
        for (i, expected_row) in unextended.iter().enumerate() {
            let z = F64::exp(trace_g, i as u128);
            let evaluated = trace.eval_polys_at(z);
            assert_eq!(*expected_row, evaluated);
        }
    }

    fn _assertion_silences_unused_import(_a: Assertion<F64>) {}
}
