use std::collections::HashMap;

use crate::error::VerificationError;
use crate::field::StarkField;
use crate::hash::HashAlgorithm;
use crate::merkle::{ Digest, MerkleTree };
use crate::polynom;

use super::{ decode_row, row_position, row_slot, sorted_rows, FriProof, FOLD_FACTOR };

/// Verifies a [`FriProof`] against an already-committed composition root.
///
/// Every transcript draw this check depends on -- `special_x` for round 0
/// and for each subsequent layer -- has no dependency on the query
/// positions at all (the prover draws them purely from the sequence of
/// absorbed roots), so the caller replays that absorb/draw sequence itself
/// from `proof.fri.layers`'s roots *before* drawing query positions, and
/// passes the resulting `special_xs` in here alongside the positions.
/// Drawing positions any earlier would be unsound: the verifier has no
/// transmitted positions field to check against, so the only positions that
/// mean anything are the ones its own transcript produces in the same
/// relative order the prover's did.
///
/// Round 0 needs no externally-supplied "expected values": `proof.initial_proof`
/// is checked directly against `composition_root`, and its decoded leaves
/// are themselves the ground truth (the composition commitment *is* round
/// 0's evaluation vector). From there each subsequent layer's batched proof
/// is checked, the queried row is confirmed to agree with the prior round's
/// fold, and the row itself is folded via the matching `special_xs` entry.
/// Finally the last folded values are checked against the remainder
/// polynomial, and the remainder's degree against the shrunken bound.
///
/// Split into an unconditional round 0 (driven by `initial_proof`) plus a
/// per-layer loop, to match how `prover::reduce` folds.
pub fn verify<E: StarkField>(
    proof: &FriProof<E>,
    composition_root: &Digest,
    positions: &[usize],
    special_xs: &[E],
    domain_size: usize,
    max_degree_plus_1: usize,
    hash: HashAlgorithm,
) -> Result<(), VerificationError> {
    debug_assert_eq!(special_xs.len(), proof.layers.len() + 1, "one special_x per round, including round 0");

    let mut layer_domain_size = domain_size;
    let mut degree_bound = max_degree_plus_1;

    let rows = sorted_rows(positions, layer_domain_size);
    if !MerkleTree::verify_batch(composition_root, &rows, &proof.initial_proof, hash) {
        return Err(VerificationError::FriLayerProofInvalid(0));
    }
    let mut expected = fold_queried_positions(
        positions,
        &rows,
        &proof.initial_proof.values,
        layer_domain_size,
        domain_size,
        special_xs[0],
        None,
    )?;
    layer_domain_size /= FOLD_FACTOR;
    degree_bound = (degree_bound + 3) / 4;

    for (depth, layer) in proof.layers.iter().enumerate() {
        let rows = sorted_rows(positions, layer_domain_size);
        if !MerkleTree::verify_batch(&layer.root, &rows, &layer.proof, hash) {
            return Err(VerificationError::FriLayerProofInvalid(depth + 1));
        }

        expected = fold_queried_positions(
            positions,
            &rows,
            &layer.proof.values,
            layer_domain_size,
            domain_size,
            special_xs[depth + 1],
            Some((&expected, depth + 1)),
        )?;
        layer_domain_size /= FOLD_FACTOR;
        degree_bound = (degree_bound + 3) / 4;
    }

    if polynom::degree_of(&proof.remainder) >= degree_bound.max(1) {
        return Err(VerificationError::FriRemainderDegreeMismatch { degree: degree_bound });
    }

    let remainder_root = E::get_root_of_unity(layer_domain_size.max(1).next_power_of_two());
    for (i, &p) in positions.iter().enumerate() {
        let x = E::exp(remainder_root, (p % layer_domain_size) as u128);
        let actual = polynom::eval(&proof.remainder, x);
        if actual != expected[i] {
            return Err(VerificationError::FriFoldingMismatch {
                depth: proof.layers.len() + 1,
                expected: expected[i].to_bytes(),
                found: actual.to_bytes(),
            });
        }
    }

    Ok(())
}

/// Checks, for every queried position, that the authenticated row it maps
/// to agrees with the previous round's folded value (skipped when
/// `previous` is `None`, at round 0, since the row itself is ground truth),
/// then folds the row by interpolating its 4 points and evaluating at
/// `special_x`.
fn fold_queried_positions<E: StarkField>(
    positions: &[usize],
    sorted_rows_for_layer: &[usize],
    leaf_values: &[Vec<u8>],
    layer_domain_size: usize,
    full_domain_size: usize,
    special_x: E,
    previous: Option<(&[E], usize)>,
) -> Result<Vec<E>, VerificationError> {
    let column_of: HashMap<usize, usize> =
        sorted_rows_for_layer.iter().enumerate().map(|(i, &r)| (r, i)).collect();
    let domain_root = domain_root_for::<E>(layer_domain_size, full_domain_size);
    let row_count = layer_domain_size / FOLD_FACTOR;

    let mut next = Vec::with_capacity(positions.len());
    for (i, &p) in positions.iter().enumerate() {
        let row = row_position(p, layer_domain_size);
        let slot = row_slot(p, layer_domain_size);
        let col = column_of[&row];
        let leaf: [E; 4] = decode_row(&leaf_values[col]);

        if let Some((prior, depth)) = previous {
            if leaf[slot] != prior[i] {
                return Err(VerificationError::FriFoldingMismatch {
                    depth,
                    expected: prior[i].to_bytes(),
                    found: leaf[slot].to_bytes(),
                });
            }
        }

        let xs = [
            E::exp(domain_root, row as u128),
            E::exp(domain_root, (row + row_count) as u128),
            E::exp(domain_root, (row + 2 * row_count) as u128),
            E::exp(domain_root, (row + 3 * row_count) as u128),
        ];
        let poly = polynom::interpolate(&xs, &leaf);
        next.push(polynom::eval(&poly, special_x));
    }
    Ok(next)
}

/// The generator of the domain a given round folds over, derived from the
/// full evaluation domain's generator rather than trying to invert the fold.
fn domain_root_for<E: StarkField>(layer_domain_size: usize, full_domain_size: usize) -> E {
    let full_root = E::get_root_of_unity(full_domain_size);
    let shift = full_domain_size / layer_domain_size;
    E::exp(full_root, shift as u128)
}
