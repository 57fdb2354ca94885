//! Merkle-commits the extended trace and the composition polynomial's
//! evaluations so the verifier can later demand openings at a handful of
//! pseudorandomly-chosen positions instead of reading the whole (large)
//! evaluation domain.
//!
//! Trace leaves are built from `TraceTable::committed_row_at`, one leaf per
//! position out of the state/secret registers. Composition leaves use
//! [`crate::stark::fri::coset_rows`]'s stride grouping rather than a plain
//! consecutive chunking, so the same grouping the commitment describes is
//! the one FRI's first fold actually operates on.

use crate::field::StarkField;
use crate::hash::HashAlgorithm;
use crate::merkle::MerkleTree;

use super::fri::{ coset_rows, row_bytes };
use super::trace::TraceTable;

/// Commits the trace's state and secret registers: one leaf per domain
/// position, the concatenation of that position's register values.
pub fn commit_trace<E: StarkField>(trace: &TraceTable<E>, hash: HashAlgorithm) -> MerkleTree {
    let domain_size = trace.domain_size();
    let leaves: Vec<Vec<u8>> = (0..domain_size)
        .map(|position| {
            let row = trace.committed_row_at(position);
            let mut bytes = Vec::with_capacity(row.len() * E::ELEMENT_BYTES);
            for v in row {
                bytes.extend_from_slice(&v.to_bytes());
            }
            bytes
        })
        .collect();
    MerkleTree::new(leaves, hash)
}

/// Commits the composition polynomial's evaluations, grouped into rows of 4
/// by the same stride FRI's first folding round uses, so one committed tree
/// doubles as FRI's layer-0 tree.
pub fn commit_composition<E: StarkField>(evaluations: &[E], hash: HashAlgorithm) -> MerkleTree {
    let rows = coset_rows(evaluations);
    let leaves: Vec<Vec<u8>> = rows.iter().map(row_bytes).collect();
    MerkleTree::new(leaves, hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::air::{ Air, AirContext, ReadonlyRegisters, RegisterCounts };
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

    #[test]
    fn trace_commitment_round_trips_a_leaf() {
        let air = Fibonacci;
        let readonly = ReadonlyRegisters::<F64> { input: vec![], public: vec![], secret: vec![] };
        let mut trace = TraceTable::build(&air, &readonly, &[1, 1]);
        trace.extend(4);

        let tree = commit_trace(&trace, HashAlgorithm::Blake2s256);
        let proof = tree.prove_batch(&[3]);
        assert!(MerkleTree::verify_batch(&tree.root(), &[3], &proof, HashAlgorithm::Blake2s256));
    }

    #[test]
    fn composition_commitment_has_one_leaf_per_four_evaluations() {
        let evaluations: Vec<F64> = (0..32).collect();
        let tree = commit_composition(&evaluations, HashAlgorithm::Blake2s256);
        assert_eq!(8, tree.leaves().len());
    }
}
