//! Top-level verifier: replays the prover's Fiat-Shamir sequence from the
//! committed roots alone, checks the trace and composition Merkle openings,
//! reconstructs the composition polynomial's value at each queried position
//! from the revealed trace rows and confirms it against the committed
//! value, then hands the FRI component off to [`fri::verify`] for the
//! low-degree check.

use std::collections::BTreeSet;
use std::collections::HashMap;

use crate::air::{ self, Air, Assertion, ReadonlyRegisters };
use crate::error::{ StarkError, VerificationError };
use crate::field::StarkField;
use crate::merkle::MerkleTree;
use crate::polynom;
use crate::transcript::Transcript;

use super::boundary::BoundaryConstraints;
use super::composition::{ self, CompositionPolynomial };
use super::context::EvaluationContext;
use super::encode_public_params;
use super::fri;
use super::proof::StarkProof;
use super::zero_poly::ZeroPolynomial;

/// Checks that `proof` attests to a trace of `air`, starting wherever the
/// asserted registers say it starts, that satisfies every constraint and
/// every assertion. `readonly` must be the same input/public streams the
/// prover ran against (the `secret` streams are not needed here - those
/// registers are only ever revealed through the trace's Merkle openings).
pub fn verify<A: Air<E>, E: StarkField>(
    air: &A,
    readonly: &ReadonlyRegisters<E>,
    assertions: &[Assertion<E>],
    proof: &StarkProof<E>,
) -> Result<(), StarkError> {
    let ctx_meta = air.context();
    let register_counts = ctx_meta.register_counts;

    air::validate(assertions, &register_counts, proof.trace_length)?;

    let ctx = EvaluationContext::<E>::new(proof.trace_length, ctx_meta.max_constraint_degree(), proof.options.extension_factor())?;
    let hash = proof.options.hash_algorithm();

    let public_params = encode_public_params(proof.trace_length, &register_counts, assertions);
    let mut transcript = Transcript::<E>::new(b"stark-core", &public_params, hash);
    transcript.absorb(&proof.trace_root);

    let trace_domain = ctx.get_trace_domain();
    let boundary = BoundaryConstraints::new(assertions, &trace_domain);
    let zero = ZeroPolynomial::new(ctx.trace_length(), ctx.extension_factor(), ctx.trace_generator());

    let (alphas, betas) = composition::draw_coefficients(air, &boundary, &ctx, &mut transcript);
    transcript.absorb(&proof.composition_root);

    let mut special_xs = Vec::with_capacity(proof.fri.layers.len() + 1);
    special_xs.push(transcript.draw_element());
    for layer in &proof.fri.layers {
        transcript.absorb(&layer.root);
        special_xs.push(transcript.draw_element());
    }

    let domain_size = ctx.evaluation_domain_size();
    let exe_positions = transcript.draw_positions(proof.options.exe_query_count(), domain_size, ctx.extension_factor());
    let fri_positions = transcript.draw_positions(proof.options.fri_query_count(), domain_size, ctx.extension_factor());

    verify_execution_consistency(air, readonly, &boundary, &zero, &ctx, &alphas, &betas, &exe_positions, proof, hash)?;
    log::debug!("execution trace and composition consistency checks passed");

    let degree_bound = ctx.composition_degree() + 1;
    fri::verify(&proof.fri, &proof.composition_root, &fri_positions, &special_xs, domain_size, degree_bound, hash)?;
    log::debug!("FRI low-degree check passed");

    Ok(())
}

/// Opens the trace at every queried position and at the position one trace
/// step ahead (needed to evaluate transition constraints), reconstructs the
/// input/public registers' low-degree extension at those same points (they
/// are public, so the verifier recomputes rather than receives them), and
/// checks that `CompositionPolynomial::evaluate_at` agrees with the
/// committed composition value at every queried position.
fn verify_execution_consistency<A: Air<E>, E: StarkField>(
    air: &A,
    readonly: &ReadonlyRegisters<E>,
    boundary: &BoundaryConstraints<E>,
    zero: &ZeroPolynomial<E>,
    ctx: &EvaluationContext<E>,
    alphas: &[E],
    betas: &[E],
    exe_positions: &[usize],
    proof: &StarkProof<E>,
    hash: crate::hash::HashAlgorithm,
) -> Result<(), VerificationError> {
    let rc = air.context().register_counts;
    let domain_size = ctx.evaluation_domain_size();
    let shift = ctx.extension_factor();

    let mut augmented: BTreeSet<usize> = BTreeSet::new();
    for &p in exe_positions {
        augmented.insert(p);
        augmented.insert((p + shift) % domain_size);
    }
    let sorted_trace_positions: Vec<usize> = augmented.into_iter().collect();

    if !MerkleTree::verify_batch(&proof.trace_root, &sorted_trace_positions, &proof.trace_proof, hash) {
        return Err(VerificationError::TraceMerkleProofInvalid(sorted_trace_positions[0]));
    }
    log::debug!("trace Merkle proof verified at {} positions", sorted_trace_positions.len());

    let composition_rows = fri::sorted_rows(exe_positions, domain_size);
    if !MerkleTree::verify_batch(&proof.composition_root, &composition_rows, &proof.composition_proof, hash) {
        return Err(VerificationError::CompositionMerkleProofInvalid(exe_positions[0]));
    }
    log::debug!("composition Merkle proof verified at {} rows", composition_rows.len());

    let trace_index: HashMap<usize, usize> =
        sorted_trace_positions.iter().enumerate().map(|(i, &p)| (p, i)).collect();
    let row_index: HashMap<usize, usize> =
        composition_rows.iter().enumerate().map(|(i, &r)| (r, i)).collect();

    let input_polys = interpolated_registers(&readonly.input, ctx);
    let public_polys = interpolated_registers(&readonly.public, ctx);

    let domain_root = ctx.domain_root();

    for &p in exe_positions {
        let next_p = (p + shift) % domain_size;

        let current_leaf = &proof.trace_proof.values[trace_index[&p]];
        let next_leaf = &proof.trace_proof.values[trace_index[&next_p]];

        let current_committed = decode_committed_row::<E>(current_leaf, rc.state, rc.secret);
        let next_committed = decode_committed_row::<E>(next_leaf, rc.state, rc.secret);

        let current_state = &current_committed[..rc.state];
        let current_secret = &current_committed[rc.state..];
        let next_state = &next_committed[..rc.state];

        let x = E::exp(domain_root, p as u128);
        let input_values: Vec<E> = input_polys.iter().map(|poly| polynom::eval(poly, x)).collect();
        let public_values: Vec<E> = public_polys.iter().map(|poly| polynom::eval(poly, x)).collect();

        let mut readonly_row = Vec::with_capacity(rc.readonly());
        readonly_row.extend_from_slice(&input_values);
        readonly_row.extend_from_slice(&public_values);
        readonly_row.extend_from_slice(current_secret);

        let boundary_values: Vec<E> = boundary.registers().iter().map(|&r| current_state[r]).collect();

        let expected = CompositionPolynomial::evaluate_at(
            air,
            x,
            current_state,
            next_state,
            &readonly_row,
            boundary,
            &boundary_values,
            zero,
            ctx,
            alphas,
            betas,
        );

        let composition_row_bytes = &proof.composition_proof.values[row_index[&fri::row_position(p, domain_size)]];
        let composition_row: [E; 4] = fri::decode_row(composition_row_bytes);
        let committed = composition_row[fri::row_slot(p, domain_size)];

        if expected != committed {
            return Err(VerificationError::CompositionValueMismatch(p));
        }
    }

    Ok(())
}

fn interpolated_registers<E: StarkField>(registers: &[Vec<E>], ctx: &EvaluationContext<E>) -> Vec<Vec<E>> {
    registers.iter().map(|register| {
        let mut poly = register.clone();
        debug_assert_eq!(ctx.trace_length(), poly.len());
        polynom::interpolate_fft(&mut poly, true);
        poly
    }).collect()
}

fn decode_committed_row<E: StarkField>(bytes: &[u8], state_count: usize, secret_count: usize) -> Vec<E> {
    let width = E::ELEMENT_BYTES;
    (0..(state_count + secret_count))
        .map(|i| E::from_bytes(&bytes[i * width..(i + 1) * width]))
        .collect()
}
