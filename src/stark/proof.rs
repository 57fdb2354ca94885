//! Proof object and wire format: bundles the trace and composition Merkle
//! proofs, the FRI proof, and the degree-adjustment metadata into one
//! serde-serializable struct, generic over an arbitrary `trace_shape`,
//! register count, and `E: StarkField`.

use serde::{ Deserialize, Serialize };

use crate::error::ProofFormatError;
use crate::field::StarkField;
use crate::merkle::{ BatchMerkleProof, Digest };
use crate::options::ProofOptions;

use super::fri::FriProof;

/// An array field in the wire format may carry no more than this many
/// entries; a `BatchMerkleProof`'s `nodes` matrix may carry no more than
/// this many columns.
pub const MAX_ARRAY_LENGTH: usize = 256;
pub const MAX_MATRIX_COLUMNS: usize = 127;

/// The full, self-contained proof the prover hands back to its caller and
/// the verifier checks. `trace_shape` is carried through from the AIR
/// unexamined, so the verifier's caller can recover how the (out-of-scope)
/// AIR front end unrolled nested input loops.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StarkProof<E: StarkField> {
    pub options: ProofOptions,
    pub trace_root: Digest,
    pub trace_proof: BatchMerkleProof,
    pub composition_root: Digest,
    pub composition_proof: BatchMerkleProof,
    pub fri: FriProof<E>,
    pub trace_length: usize,
    pub trace_shape: Vec<u32>,
}

impl<E: StarkField> StarkProof<E> {
    /// Encodes the proof to its wire format.
    pub fn serialize(&self) -> Vec<u8> {
        bincode::serialize(self).expect("proof serialization cannot fail")
    }

    /// Decodes a proof from its wire format, rejecting a buffer whose arrays
    /// or Merkle-proof matrices exceed the hard limits before trusting
    /// anything else in it.
    pub fn parse(bytes: &[u8]) -> Result<Self, ProofFormatError> {
        let proof: StarkProof<E> = bincode::deserialize(bytes)
            .map_err(|e| ProofFormatError::Malformed(e.to_string()))?;
        proof.validate_limits()?;
        Ok(proof)
    }

    /// The encoded size in bytes, without materializing the full buffer.
    pub fn size_of(&self) -> usize {
        bincode::serialized_size(self).expect("proof size computation cannot fail") as usize
    }

    fn validate_limits(&self) -> Result<(), ProofFormatError> {
        check_array(self.trace_proof.values.len())?;
        check_matrix(self.trace_proof.nodes.len())?;
        check_array(self.composition_proof.values.len())?;
        check_matrix(self.composition_proof.nodes.len())?;
        check_array(self.fri.initial_proof.values.len())?;
        check_matrix(self.fri.initial_proof.nodes.len())?;

        for layer in &self.fri.layers {
            check_array(layer.proof.values.len())?;
            check_matrix(layer.proof.nodes.len())?;
        }
        check_array(self.fri.remainder.len())?;

        Ok(())
    }
}

fn check_array(actual: usize) -> Result<(), ProofFormatError> {
    if actual > MAX_ARRAY_LENGTH {
        return Err(ProofFormatError::ArrayTooLarge { actual, limit: MAX_ARRAY_LENGTH });
    }
    Ok(())
}

fn check_matrix(actual: usize) -> Result<(), ProofFormatError> {
    if actual > MAX_MATRIX_COLUMNS {
        return Err(ProofFormatError::TooManyColumns { actual, limit: MAX_MATRIX_COLUMNS });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::F64;
    use crate::hash::HashAlgorithm;
    use crate::merkle::MerkleTree;
    use crate::stark::fri::{ FriLayerProof, FriProof };

    fn sample_proof() -> StarkProof<F64> {
        let leaves: Vec<Vec<u8>> = (0..4u64).map(|i| i.to_le_bytes().to_vec()).collect();
        let tree = MerkleTree::new(leaves, HashAlgorithm::Blake2s256);
        let proof = tree.prove_batch(&[0, 2]);

        StarkProof {
            options: ProofOptions::default(),
            trace_root: tree.root(),
            trace_proof: proof.clone(),
            composition_root: tree.root(),
            composition_proof: proof.clone(),
            fri: FriProof {
                initial_proof: proof.clone(),
                layers: vec![FriLayerProof { root: tree.root(), proof }],
                remainder: vec![1, 2, 3],
            },
            trace_length: 64,
            trace_shape: vec![64],
        }
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let proof = sample_proof();
        let bytes = proof.serialize();
        let decoded = StarkProof::<F64>::parse(&bytes).unwrap();
        assert_eq!(proof.trace_root, decoded.trace_root);
        assert_eq!(proof.trace_length, decoded.trace_length);
        assert_eq!(proof.fri.remainder, decoded.fri.remainder);
    }

    #[test]
    fn size_of_matches_serialized_length() {
        let proof = sample_proof();
        assert_eq!(proof.serialize().len(), proof.size_of());
    }

    #[test]
    fn parse_rejects_oversized_array() {
        let mut proof = sample_proof();
        proof.fri.remainder = vec![0u64; MAX_ARRAY_LENGTH + 1];
        let bytes = proof.serialize();
        let result = StarkProof::<F64>::parse(&bytes);
        assert!(matches!(result, Err(ProofFormatError::ArrayTooLarge { .. })));
    }
}
