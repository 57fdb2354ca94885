//! Merkle commitment over byte-blob leaves, with batched multi-proof
//! construction and verification: given a sorted set of queried positions,
//! only the sibling hashes not derivable from the queried leaves themselves
//! are emitted. A complete binary tree over a 1-indexed node array backs
//! `root`/`prove_batch`/`verify_batch`; the batching algorithm itself walks
//! the query set level by level, skipping a sibling already implied by
//! another query and collapsing positions that converge on a shared
//! ancestor, to produce a proof shaped as a `values` array plus a `nodes`
//! matrix with one column per query and a `depth`.

use std::collections::HashSet;
use serde::{ Deserialize, Serialize };
use crate::hash::{ HashAlgorithm, DIGEST_SIZE };

pub type Digest = [u8; DIGEST_SIZE];

/// A complete binary Merkle tree over opaque leaf blobs.
pub struct MerkleTree {
    nodes: Vec<Digest>,
    leaves: Vec<Vec<u8>>,
    hash: HashAlgorithm,
}

impl MerkleTree {
    /// Builds a tree over `leaves`. The number of leaves must be a power of
    /// two of at least 2.
    pub fn new(leaves: Vec<Vec<u8>>, hash: HashAlgorithm) -> Self {
        let n = leaves.len();
        assert!(n.is_power_of_two() && n >= 2, "number of leaves must be a power of 2, at least 2");

        let mut nodes = vec![[0u8; DIGEST_SIZE]; 2 * n];
        for i in 0..n {
            hash.hash(&leaves[i], &mut nodes[n + i]);
        }
        for i in (1..n).rev() {
            nodes[i] = hash.merge(&nodes[2 * i], &nodes[2 * i + 1]);
        }

        MerkleTree { nodes, leaves, hash }
    }

    pub fn root(&self) -> Digest {
        self.nodes[1]
    }

    pub fn leaves(&self) -> &[Vec<u8>] {
        &self.leaves
    }

    pub fn depth(&self) -> u8 {
        self.leaves.len().trailing_zeros() as u8
    }

    /// Builds a batched multi-proof for `positions`, which must be sorted
    /// in strictly ascending order with no duplicates.
    pub fn prove_batch(&self, positions: &[usize]) -> BatchMerkleProof {
        debug_assert!(positions.windows(2).all(|w| w[0] < w[1]), "positions must be sorted and unique");

        let n = self.leaves.len();
        let values: Vec<Vec<u8>> = positions.iter().map(|&p| self.leaves[p].clone()).collect();

        let mut known: HashSet<usize> = positions.iter().map(|&p| p + n).collect();
        let mut indices: Vec<usize> = positions.iter().map(|&p| p + n).collect();
        let mut cols: Vec<usize> = (0..positions.len()).collect();
        let mut nodes: Vec<Vec<Digest>> = vec![Vec::new(); positions.len()];

        while indices[0] > 1 {
            let mut next_indices = Vec::with_capacity(indices.len());
            let mut next_cols = Vec::with_capacity(cols.len());

            for i in 0..indices.len() {
                let idx = indices[i];
                let col = cols[i];
                let sibling = idx ^ 1;
                if !known.contains(&sibling) {
                    nodes[col].push(self.nodes[sibling]);
                    known.insert(sibling);
                }

                let parent = idx >> 1;
                known.insert(parent);
                if next_indices.last() != Some(&parent) {
                    next_indices.push(parent);
                    next_cols.push(col);
                }
            }

            indices = next_indices;
            cols = next_cols;
        }

        BatchMerkleProof { values, nodes, depth: self.depth() }
    }

    /// Verifies a batched multi-proof against `root` for the given
    /// (sorted, unique) `positions`.
    pub fn verify_batch(root: &Digest, positions: &[usize], proof: &BatchMerkleProof, hash: HashAlgorithm) -> bool {
        if positions.len() != proof.values.len() || positions.len() != proof.nodes.len() {
            return false;
        }
        if positions.windows(2).any(|w| w[0] >= w[1]) {
            return false;
        }

        let n = 1usize << proof.depth;
        let mut known: std::collections::HashMap<usize, Digest> = std::collections::HashMap::new();

        let mut indices = Vec::with_capacity(positions.len());
        for (i, &p) in positions.iter().enumerate() {
            if p >= n {
                return false;
            }
            let idx = p + n;
            let mut digest = [0u8; DIGEST_SIZE];
            hash.hash(&proof.values[i], &mut digest);
            known.insert(idx, digest);
            indices.push(idx);
        }

        let mut cols: Vec<usize> = (0..positions.len()).collect();
        let mut cursors = vec![0usize; proof.nodes.len()];

        while indices[0] > 1 {
            let mut next_indices = Vec::with_capacity(indices.len());
            let mut next_cols = Vec::with_capacity(cols.len());

            for i in 0..indices.len() {
                let idx = indices[i];
                let col = cols[i];
                let sibling = idx ^ 1;

                if !known.contains_key(&sibling) {
                    let col_nodes = &proof.nodes[col];
                    if cursors[col] >= col_nodes.len() {
                        return false;
                    }
                    known.insert(sibling, col_nodes[cursors[col]]);
                    cursors[col] += 1;
                }

                let (left_idx, right_idx) = if idx & 1 == 0 { (idx, sibling) } else { (sibling, idx) };
                let left = known[&left_idx];
                let right = known[&right_idx];
                let parent = idx >> 1;
                let parent_hash = hash.merge(&left, &right);

                match known.get(&parent) {
                    Some(&existing) if existing != parent_hash => return false,
                    Some(_) => {}
                    None => { known.insert(parent, parent_hash); }
                }

                if next_indices.last() != Some(&parent) {
                    next_indices.push(parent);
                    next_cols.push(col);
                }
            }

            indices = next_indices;
            cols = next_cols;
        }

        known.get(&1) == Some(root)
    }
}

/// A batched Merkle multi-proof: the queried leaf blobs, a per-query column
/// of sibling hashes not derivable from the other queried leaves, and the
/// tree's depth (needed to recover leaf node indices).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchMerkleProof {
    pub values: Vec<Vec<u8>>,
    pub nodes: Vec<Vec<Digest>>,
    pub depth: u8,
}

#[cfg(test)]
mod tests {
    use super::MerkleTree;
    use crate::hash::HashAlgorithm;

    fn sample_leaves(n: usize) -> Vec<Vec<u8>> {
        (0..n).map(|i| vec![i as u8; 8]).collect()
    }

    #[test]
    fn single_position_proof_round_trips() {
        let hash = HashAlgorithm::Blake2s256;
        let tree = MerkleTree::new(sample_leaves(16), hash);
        let root = tree.root();

        for p in [0usize, 7, 15] {
            let proof = tree.prove_batch(&[p]);
            assert!(MerkleTree::verify_batch(&root, &[p], &proof, hash));
        }
    }

    #[test]
    fn batched_proof_round_trips() {
        let hash = HashAlgorithm::Sha256;
        let tree = MerkleTree::new(sample_leaves(32), hash);
        let root = tree.root();

        let positions = vec![1usize, 2, 3, 17, 30];
        let proof = tree.prove_batch(&positions);
        assert!(MerkleTree::verify_batch(&root, &positions, &proof, hash));
    }

    #[test]
    fn tampered_leaf_fails_verification() {
        let hash = HashAlgorithm::Blake2s256;
        let tree = MerkleTree::new(sample_leaves(16), hash);
        let root = tree.root();

        let positions = vec![2usize, 9];
        let mut proof = tree.prove_batch(&positions);
        proof.values[0][0] ^= 0xff;
        assert!(!MerkleTree::verify_batch(&root, &positions, &proof, hash));
    }

    #[test]
    fn wrong_root_fails_verification() {
        let hash = HashAlgorithm::Blake2s256;
        let tree = MerkleTree::new(sample_leaves(16), hash);
        let mut root = tree.root();
        root[0] ^= 1;

        let positions = vec![4usize];
        let proof = tree.prove_batch(&positions);
        assert!(!MerkleTree::verify_batch(&root, &positions, &proof, hash));
    }
}
