//! Composition polynomial: combines the degree-adjusted transition
//! constraint quotient `D(x) = Q(x)/Z(x)` with the degree-adjusted boundary
//! combination `BC(x)` into a single polynomial `C(x)`, evaluated over the
//! evaluation domain `D_E` for commitment. Constraints are grouped by
//! declared degree so each group gets its own degree-adjustment exponent
//! rather than adjusting every constraint to the single worst-case degree.
//!
//! The division by `Z(x)` is done in coefficient form (interpolate,
//! synthetic-divide, re-evaluate) rather than the pointwise
//! numerator/denominator division the rest of [`crate::stark::zero_poly`]
//! exposes: a pointwise divide would hit `0/0` at every trace-domain point,
//! since both the transition-constraint combination and `Z` vanish there
//! when the trace is valid.

use crate::air::Air;
use crate::field::StarkField;
use crate::polynom;
use crate::transcript::Transcript;

use super::boundary::BoundaryConstraints;
use super::context::EvaluationContext;
use super::trace::TraceTable;
use super::zero_poly::ZeroPolynomial;

pub struct CompositionPolynomial<E: StarkField> {
    evaluations: Vec<E>,
}

impl<E: StarkField> CompositionPolynomial<E> {
    /// Builds `C(x)`, evaluated over `D_E`, drawing the α/β
    /// linear-combination coefficients from `transcript` (which must
    /// already have absorbed the trace root: the transcript consumes α
    /// immediately followed by β in one seeded round before anything else
    /// is absorbed).
    pub fn new<A: Air<E>>(
        air: &A,
        trace: &TraceTable<E>,
        boundary: &BoundaryConstraints<E>,
        zero: &ZeroPolynomial<E>,
        context: &EvaluationContext<E>,
        transcript: &mut Transcript<E>,
    ) -> Self {
        let (alphas, betas) = draw_coefficients(air, boundary, context, transcript);
        let d_eval = Self::transition_term(air, trace, zero, context, &alphas);
        let bc_eval = Self::boundary_term(trace, boundary, context, &betas);

        let evaluations: Vec<E> = d_eval.iter().zip(bc_eval.iter())
            .map(|(&d, &b)| E::add(d, b))
            .collect();

        CompositionPolynomial { evaluations }
    }

    pub fn evaluations(&self) -> &[E] {
        &self.evaluations
    }

    /// `D(x) = Q(x) / Z(x)`, the degree-adjusted, randomly-combined
    /// transition-constraint quotient, evaluated over `D_E`.
    fn transition_term<A: Air<E>>(
        air: &A,
        trace: &TraceTable<E>,
        zero: &ZeroPolynomial<E>,
        context: &EvaluationContext<E>,
        alphas: &[E],
    ) -> Vec<E> {
        let trace_length = context.trace_length();
        let comp_domain_size = context.composition_domain_size();
        let comp_generator = context.composition_generator();
        let ce_blowup = context.ce_blowup();
        let stride = context.extension_factor() / ce_blowup;

        let degrees = &air.context().constraint_degrees;
        let m = degrees.len();
        let state_width = air.context().register_counts.state;

        // Step 1: evaluate transition constraints over D_C by reading the
        // already-extended-to-D_E trace at the D_C-to-D_E subsampled
        // positions (D_C is a subgroup of D_E of index `stride`, so this
        // is equivalent to - but cheaper than - a fresh LDE to D_C).
        let mut q_evals = vec![vec![E::ZERO; comp_domain_size]; m];
        for j in 0..comp_domain_size {
            let de_pos = j * stride;
            let next_de_pos = ((j + ce_blowup) % comp_domain_size) * stride;
            let current_full = trace.row_at(de_pos);
            let next_full = trace.row_at(next_de_pos);
            let readonly = &current_full[state_width..];
            let q = air.evaluate_constraints(&current_full[..state_width], &next_full[..state_width], readonly);
            debug_assert_eq!(m, q.len(), "constraint evaluator returned wrong number of constraints");
            for i in 0..m {
                q_evals[i][j] = q[i];
            }
        }

        // Steps 2-3: degree adjustment + random linear combination. A
        // constraint needs an adjusted copy iff its effective degree
        // `d_i * trace_length` falls short of the combination degree `D`.
        let mut qc = vec![E::ZERO; comp_domain_size];
        for i in 0..m {
            let alpha = alphas[i];
            for j in 0..comp_domain_size {
                qc[j] = E::add(qc[j], E::mul(alpha, q_evals[i][j]));
            }
        }

        let mut alpha_cursor = m;
        for i in 0..m {
            let effective_degree = degrees[i] * trace_length;
            if effective_degree >= comp_domain_size { continue; }
            let exponent = comp_domain_size - effective_degree;
            let base = E::exp(comp_generator, (exponent % comp_domain_size) as u128);
            let series = E::get_power_series(base, comp_domain_size);
            let alpha = alphas[alpha_cursor];
            alpha_cursor += 1;
            for j in 0..comp_domain_size {
                qc[j] = E::add(qc[j], E::mul(alpha, E::mul(q_evals[i][j], series[j])));
            }
        }

        // Steps 4-5: interpolate back to coefficient form, divide by Z(x)
        // via synthetic division, then re-evaluate (zero-padded forward
        // NTT) over D_E.
        polynom::interpolate_fft(&mut qc, true);
        polynom::syn_div_expanded_in_place(&mut qc, trace_length, &[zero.last_trace_point()]);

        qc.resize(context.evaluation_domain_size(), E::ZERO);
        polynom::eval_fft(&mut qc, true);
        qc
    }

    /// `BC(x)`, the degree-adjusted, randomly-combined boundary
    /// combination, evaluated over `D_E`.
    fn boundary_term(
        trace: &TraceTable<E>,
        boundary: &BoundaryConstraints<E>,
        context: &EvaluationContext<E>,
        betas: &[E],
    ) -> Vec<E> {
        let trace_length = context.trace_length();
        let composition_degree = context.composition_degree();
        let needs_adjustment = composition_degree > trace_length;
        let boundary_count = boundary.count();

        let mut bc = vec![E::ZERO; composition_degree.max(trace_length)];
        for (idx, &register) in boundary.registers().iter().enumerate() {
            let register_poly = trace.state_poly(register);
            let b_poly = boundary.build_poly(idx, register_poly);

            let beta = betas[idx];
            for (k, &c) in b_poly.iter().enumerate() {
                bc[k] = E::add(bc[k], E::mul(beta, c));
            }

            if needs_adjustment {
                let shift = composition_degree - trace_length;
                let beta_adj = betas[boundary_count + idx];
                for (k, &c) in b_poly.iter().enumerate() {
                    bc[k + shift] = E::add(bc[k + shift], E::mul(beta_adj, c));
                }
            }
        }

        bc.resize(context.evaluation_domain_size(), E::ZERO);
        polynom::eval_fft(&mut bc, true);
        bc
    }

    /// Single-point reconstruction of `C(x)` from revealed trace leaves and
    /// already-drawn transcript coefficients, as used by the verifier.
    pub fn evaluate_at<A: Air<E>>(
        air: &A,
        x: E,
        current_state: &[E],
        next_state: &[E],
        readonly: &[E],
        boundary: &BoundaryConstraints<E>,
        boundary_values: &[E],
        zero: &ZeroPolynomial<E>,
        context: &EvaluationContext<E>,
        alphas: &[E],
        betas: &[E],
    ) -> E {
        let trace_length = context.trace_length();
        let comp_domain_size = context.composition_domain_size();
        let degrees = &air.context().constraint_degrees;
        let m = degrees.len();

        let q = air.evaluate_constraints(current_state, next_state, readonly);
        debug_assert_eq!(m, q.len());

        let mut qc = E::ZERO;
        for i in 0..m {
            qc = E::add(qc, E::mul(alphas[i], q[i]));
        }

        let mut alpha_cursor = m;
        for i in 0..m {
            let effective_degree = degrees[i] * trace_length;
            if effective_degree >= comp_domain_size { continue; }
            let exponent = comp_domain_size - effective_degree;
            let xp = E::exp(x, exponent as u128);
            qc = E::add(qc, E::mul(alphas[alpha_cursor], E::mul(q[i], xp)));
            alpha_cursor += 1;
        }

        let d_x = E::div(qc, zero.evaluate_at(x));

        let composition_degree = context.composition_degree();
        let needs_adjustment = composition_degree > trace_length;
        let boundary_count = boundary.count();

        let mut bc_x = E::ZERO;
        for (idx, &p_r_x) in boundary_values.iter().enumerate() {
            let b_x = boundary.evaluate_at(idx, x, p_r_x);
            bc_x = E::add(bc_x, E::mul(betas[idx], b_x));
            if needs_adjustment {
                let shift = composition_degree - trace_length;
                let xp = E::exp(x, shift as u128);
                bc_x = E::add(bc_x, E::mul(betas[boundary_count + idx], E::mul(b_x, xp)));
            }
        }

        E::add(d_x, bc_x)
    }
}

/// Draws the α (transition) and β (boundary) coefficient vectors from the
/// transcript in the canonical order (original constraints first, then
/// adjusted copies grouped by degree in ascending input order), sized
/// exactly as needed for the constraint set and boundary register count so
/// that prover and verifier consume the same number of transcript bytes.
pub fn draw_coefficients<A: Air<E>, E: StarkField>(
    air: &A,
    boundary: &BoundaryConstraints<E>,
    context: &EvaluationContext<E>,
    transcript: &mut Transcript<E>,
) -> (Vec<E>, Vec<E>) {
    let trace_length = context.trace_length();
    let comp_domain_size = context.composition_domain_size();
    let degrees = &air.context().constraint_degrees;
    let m = degrees.len();
    let adjustment_count = degrees.iter().filter(|&&d| d * trace_length < comp_domain_size).count();

    let composition_degree = context.composition_degree();
    let needs_boundary_adjustment = composition_degree > trace_length;
    let boundary_count = boundary.count();
    let b_count = if needs_boundary_adjustment { boundary_count * 2 } else { boundary_count };

    let alphas = transcript.draw_coefficients(m + adjustment_count);
    let betas = transcript.draw_coefficients(b_count);
    (alphas, betas)
}
