//! Top-level prover: wires the trace builder, commitment layer, composition
//! polynomial, and FRI together in the canonical Fiat-Shamir absorption
//! order and assembles the resulting [`StarkProof`].

use crate::air::{ self, Air, Assertion, ReadonlyRegisters };
use crate::error::{ InputError, StarkError };
use crate::field::StarkField;
use crate::options::ProofOptions;
use crate::transcript::Transcript;

use super::boundary::BoundaryConstraints;
use super::commitment::{ commit_composition, commit_trace };
use super::composition::CompositionPolynomial;
use super::context::EvaluationContext;
use super::encode_public_params;
use super::fri;
use super::proof::StarkProof;
use super::trace::TraceTable;
use super::zero_poly::ZeroPolynomial;

/// Builds a [`StarkProof`] attesting that running `air`'s transition
/// function from `initial_state` over `readonly`'s streams produces a trace
/// satisfying every constraint and every assertion.
pub fn prove<A: Air<E>, E: StarkField>(
    air: &A,
    readonly: &ReadonlyRegisters<E>,
    initial_state: &[E],
    assertions: &[Assertion<E>],
    options: ProofOptions,
) -> Result<StarkProof<E>, StarkError> {
    let ctx_meta = air.context();
    let register_counts = ctx_meta.register_counts;
    let trace_length = ctx_meta.trace_length;

    air::validate(assertions, &register_counts, trace_length)?;
    if register_counts.public > 0 && readonly.public.is_empty() {
        return Err(InputError::MissingPublicInputs(register_counts.public).into());
    }
    if register_counts.secret > 0 && readonly.secret.is_empty() {
        return Err(InputError::MissingSecretInputs(register_counts.secret).into());
    }

    let ctx = EvaluationContext::<E>::new(trace_length, ctx_meta.max_constraint_degree(), options.extension_factor())?;

    let mut trace = TraceTable::build(air, readonly, initial_state);
    log::debug!("built execution trace of length {}", trace_length);
    trace.extend(ctx.extension_factor());
    log::debug!("extended trace to evaluation domain of size {}", trace.domain_size());

    let hash = options.hash_algorithm();
    let public_params = encode_public_params(trace_length, &register_counts, assertions);
    let mut transcript = Transcript::<E>::new(b"stark-core", &public_params, hash);

    let trace_tree = commit_trace(&trace, hash);
    transcript.absorb(&trace_tree.root());
    log::info!("committed to execution trace");

    let trace_domain = ctx.get_trace_domain();
    let boundary = BoundaryConstraints::new(assertions, &trace_domain);
    let zero = ZeroPolynomial::new(ctx.trace_length(), ctx.extension_factor(), ctx.trace_generator());

    let composition = CompositionPolynomial::new(air, &trace, &boundary, &zero, &ctx, &mut transcript);
    log::info!("computed composition polynomial of degree bound {}", ctx.composition_degree());

    let composition_tree = commit_composition(composition.evaluations(), hash);
    transcript.absorb(&composition_tree.root());
    log::debug!("committed to composition polynomial evaluations");

    let degree_bound = ctx.composition_degree() + 1;
    let evaluation_domain = ctx.get_evaluation_domain();
    let (round_trees, remainder) =
        fri::reduce(composition.evaluations().to_vec(), evaluation_domain, degree_bound, hash, &mut transcript);
    log::info!("reduced composition polynomial through {} FRI layers", round_trees.len());

    let domain_size = ctx.evaluation_domain_size();
    let exe_positions = transcript.draw_positions(options.exe_query_count(), domain_size, ctx.extension_factor());
    let fri_positions = transcript.draw_positions(options.fri_query_count(), domain_size, ctx.extension_factor());

    let trace_positions = super::augmented_positions(&exe_positions, ctx.extension_factor(), domain_size);
    let trace_proof = trace_tree.prove_batch(&trace_positions);
    let composition_rows = fri::sorted_rows(&exe_positions, domain_size);
    let composition_proof = composition_tree.prove_batch(&composition_rows);
    let fri_proof = fri::build_proof(&composition_tree, &round_trees, remainder, &fri_positions, domain_size);
    log::info!("assembled proof ({} execution queries, {} FRI queries)", options.exe_query_count(), options.fri_query_count());

    Ok(StarkProof {
        options,
        trace_root: trace_tree.root(),
        trace_proof,
        composition_root: composition_tree.root(),
        composition_proof,
        fri: fri_proof,
        trace_length,
        trace_shape: ctx_meta.trace_shape.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::{ AirContext, RegisterCounts };
    use crate::field::F64;
    use crate::hash::HashAlgorithm;

    struct Fibonacci;

    impl Air<F64> for Fibonacci {
        fn context(&self) -> &AirContext {
            static CTX: std::sync::OnceLock<AirContext> = std::sync::OnceLock::new();
            CTX.get_or_init(|| AirContext {
                trace_length: 16,
                constraint_degrees: vec![1, 1],
                register_counts: RegisterCounts { state: 2, input: 0, public: 0, secret: 0 },
                trace_shape: vec![16],
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
    fn rejects_empty_assertions() {
        let air = Fibonacci;
        let options = ProofOptions::new(4, 80, 40, HashAlgorithm::Blake2s256).unwrap();
        let result = prove(&air, &readonly(), &[1, 1], &[], options);
        assert!(matches!(result, Err(StarkError::Input(InputError::NoAssertions))));
    }

    #[test]
    fn produces_a_proof_for_a_valid_trace() {
        let air = Fibonacci;
        let options = ProofOptions::new(4, 16, 16, HashAlgorithm::Blake2s256).unwrap();
        let assertions = vec![Assertion::new(0, 0, F64::from_usize(1)), Assertion::new(1, 0, F64::from_usize(1))];
        let proof = prove(&air, &readonly(), &[1, 1], &assertions, options).unwrap();
        assert_eq!(16, proof.trace_length);
        assert!(!proof.fri.remainder.is_empty());
    }
}
