use crate::field::StarkField;
use crate::hash::HashAlgorithm;
use crate::merkle::MerkleTree;
use crate::polynom;
use crate::quartic;
use crate::transcript::Transcript;

use super::{ coset_rows, row_bytes, sorted_rows, FriLayerProof, FriProof, MAX_REMAINDER_LENGTH };

/// Folds the composition polynomial's evaluations (over `domain`, `D_E`
/// ordered as `domain_root^i`) by 4, once unconditionally and then
/// conditionally further, committing each round beyond round 0 to a Merkle
/// tree and absorbing the root before drawing that round's folding
/// challenge, until the claimed degree bound drops to
/// [`MAX_REMAINDER_LENGTH`] or fewer coefficients. The caller must already
/// have committed and absorbed `evaluations` itself (the composition root);
/// this only folds and commits what comes after.
pub fn reduce<E: StarkField>(
    evaluations: Vec<E>,
    domain: Vec<E>,
    mut degree_bound: usize,
    hash: HashAlgorithm,
    transcript: &mut Transcript<E>,
) -> (Vec<MerkleTree>, Vec<E>) {
    let special_x = transcript.draw_element();
    let (mut evaluations, mut domain) = fold_once(&evaluations, &domain, special_x);
    degree_bound = (degree_bound + 3) / 4;

    let mut trees = Vec::new();
    while degree_bound > MAX_REMAINDER_LENGTH {
        let tree = commit_round(&evaluations, hash);
        transcript.absorb(&tree.root());
        let special_x = transcript.draw_element();

        let (next_evaluations, next_domain) = fold_once(&evaluations, &domain, special_x);
        trees.push(tree);
        evaluations = next_evaluations;
        domain = next_domain;
        degree_bound = (degree_bound + 3) / 4;
    }

    let mut remainder = evaluations;
    polynom::interpolate_fft(&mut remainder, true);
    remainder.truncate(degree_bound);
    (trees, remainder)
}

/// Assembles the final [`FriProof`] once the query positions are known:
/// opens a batched Merkle proof for round 0 (against `composition_tree`,
/// already built by the caller) and one per subsequent round, for the rows
/// those positions degrade to (`super::row_position`).
pub fn build_proof<E: StarkField>(
    composition_tree: &MerkleTree,
    round_trees: &[MerkleTree],
    remainder: Vec<E>,
    positions: &[usize],
    domain_size: usize,
) -> FriProof<E> {
    let mut round_domain_size = domain_size;
    let initial_proof = composition_tree.prove_batch(&sorted_rows(positions, round_domain_size));
    round_domain_size /= 4;

    let mut layers = Vec::with_capacity(round_trees.len());
    for tree in round_trees {
        let rows = sorted_rows(positions, round_domain_size);
        let proof = tree.prove_batch(&rows);
        layers.push(FriLayerProof { root: tree.root(), proof });
        round_domain_size /= 4;
    }

    FriProof { initial_proof, layers, remainder }
}

fn commit_round<E: StarkField>(evaluations: &[E], hash: HashAlgorithm) -> MerkleTree {
    let rows = coset_rows(evaluations);
    let leaves: Vec<Vec<u8>> = rows.iter().map(row_bytes).collect();
    MerkleTree::new(leaves, hash)
}

/// Folds one round: interpolates every coset row of 4 into a degree-3
/// polynomial and evaluates all of them at `special_x`, amortizing the
/// batch's field inversions (`quartic::interpolate_batch`/`evaluate_batch`).
/// Returns the folded evaluations and the domain they're indexed by
/// (`domain_root^4` raised to the matching powers).
fn fold_once<E: StarkField>(evaluations: &[E], domain: &[E], special_x: E) -> (Vec<E>, Vec<E>) {
    let value_rows = coset_rows(evaluations);
    let x_rows = coset_rows(domain);

    let xs_flat: Vec<E> = x_rows.iter().flatten().copied().collect();
    let ys_flat: Vec<E> = value_rows.iter().flatten().copied().collect();
    let polys = quartic::interpolate_batch(&xs_flat, &ys_flat);

    let special_xs = vec![special_x; value_rows.len()];
    let folded = quartic::evaluate_batch(&polys, &special_xs);

    let next_domain_root = E::exp(domain[1], 4);
    let next_domain = E::get_power_series(next_domain_root, domain.len() / 4);

    (folded, next_domain)
}
