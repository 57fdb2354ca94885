//! FRI (Fast Reed-Solomon IOP of Proximity): proves that a committed
//! evaluation vector is close to a polynomial of some claimed degree, by
//! repeatedly folding the evaluations by a factor of 4 and committing each
//! folded layer, until what remains is small enough to send as plain
//! coefficients and check directly.
//!
//! Every challenge (`special_x` per layer, the query positions) is drawn
//! through this crate's [`crate::transcript::Transcript`] for Fiat-Shamir
//! hygiene: re-deriving a PRNG seed directly from the last committed root
//! would let two draws against the same seed come out correlated, so the
//! transcript ratchets its seed after every draw instead. The remainder is
//! sent as a literal coefficient vector rather than as evaluations plus a
//! spot-check.
//!
//! The composition commitment doubles as FRI's round-0 evaluation vector: it
//! is always built and opened (for the execution-trace consistency check,
//! independent of FRI entirely), and [`reduce`] folds it once
//! unconditionally before deciding whether the resulting degree bound still
//! warrants committing and folding further rounds. `FriProof::layers`
//! therefore holds rounds 1, 2, ... only; round 0's opening is
//! `FriProof::initial_proof`, against the composition root the caller
//! already committed.
//!
//! Row grouping is by stride, not by consecutive run: row `i` of a round
//! with `n` evaluations holds the values at positions `{i, i+n/4, i+n/2,
//! i+3n/4}`, which is exactly the coset of the `x -> x^4` map that a
//! degree-3 fold needs.

mod prover;
mod verifier;

pub use prover::{ build_proof, reduce };
pub use verifier::verify;

use serde::{ Deserialize, Serialize };

use crate::field::StarkField;
use crate::merkle::{ BatchMerkleProof, Digest };

/// Folding stops once the claimed degree bound drops to this many
/// coefficients or fewer; the remainder is then sent directly rather than
/// committed to and folded again.
pub const MAX_REMAINDER_LENGTH: usize = 256;

pub const FOLD_FACTOR: usize = 4;

/// One committed, folded round beyond round 0: the Merkle root of its rows
/// of 4, and a batched multi-proof opening the rows the verifier queried.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriLayerProof {
    pub root: Digest,
    pub proof: BatchMerkleProof,
}

/// The full FRI component of a proof: the opening of round 0 (the
/// composition commitment, folded once), one [`FriLayerProof`] per
/// subsequent folding round, and the final remainder as a coefficient
/// vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FriProof<E: StarkField> {
    pub initial_proof: BatchMerkleProof,
    pub layers: Vec<FriLayerProof>,
    pub remainder: Vec<E>,
}

/// Groups `values` (length a multiple of 4) into `len/4` rows, one per coset
/// of the `x -> x^4` map: row `i` holds the values at the stride-separated
/// positions `{i, i+stride, i+2*stride, i+3*stride}` where `stride =
/// len/4`. Used both to regroup a round's evaluations before folding and to
/// regroup the matching domain points for quartic interpolation.
pub(crate) fn coset_rows<E: StarkField>(values: &[E]) -> Vec<[E; 4]> {
    let stride = values.len() / FOLD_FACTOR;
    debug_assert_eq!(values.len(), stride * FOLD_FACTOR, "length must be a multiple of 4");
    (0..stride)
        .map(|i| [values[i], values[i + stride], values[i + 2 * stride], values[i + 3 * stride]])
        .collect()
}

/// Serializes a row of 4 field elements into Merkle leaf bytes.
pub(crate) fn row_bytes<E: StarkField>(row: &[E; 4]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(E::ELEMENT_BYTES * 4);
    for &v in row {
        bytes.extend_from_slice(&v.to_bytes());
    }
    bytes
}

pub(crate) fn decode_row<E: StarkField>(bytes: &[u8]) -> [E; 4] {
    let width = E::ELEMENT_BYTES;
    [
        E::from_bytes(&bytes[0..width]),
        E::from_bytes(&bytes[width..2 * width]),
        E::from_bytes(&bytes[2 * width..3 * width]),
        E::from_bytes(&bytes[3 * width..4 * width]),
    ]
}

/// The row a query position degrades to at a round whose evaluation array
/// has `round_domain_size` entries: `position % (round_domain_size / 4)`.
pub(crate) fn row_position(position: usize, round_domain_size: usize) -> usize {
    position % (round_domain_size / FOLD_FACTOR)
}

/// The slot (0..4) a query position occupies within its row.
pub(crate) fn row_slot(position: usize, round_domain_size: usize) -> usize {
    let local = position % round_domain_size;
    local / (round_domain_size / FOLD_FACTOR)
}

pub(crate) fn sorted_rows(positions: &[usize], round_domain_size: usize) -> Vec<usize> {
    let mut rows: Vec<usize> = positions.iter().map(|&p| row_position(p, round_domain_size)).collect();
    rows.sort_unstable();
    rows.dedup();
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::F64;

    #[test]
    fn coset_rows_groups_by_stride_not_run() {
        let values: Vec<F64> = (1..=8).collect();
        let rows = coset_rows(&values);
        assert_eq!(vec![[1, 3, 5, 7], [2, 4, 6, 8]], rows);
    }

    #[test]
    fn row_position_matches_stride_grouping() {
        // round_domain_size = 8, so row_count = 2; position 5 -> row 5 % 2 = 1.
        assert_eq!(1, row_position(5, 8));
        assert_eq!(0, row_position(4, 8));
    }

    #[test]
    fn row_slot_identifies_stride_offset() {
        assert_eq!(0, row_slot(1, 8));
        assert_eq!(1, row_slot(3, 8));
        assert_eq!(2, row_slot(5, 8));
        assert_eq!(3, row_slot(7, 8));
    }

    #[test]
    fn row_bytes_round_trips_through_decode_row() {
        let row: [F64; 4] = [10, 20, 30, 40];
        let bytes = row_bytes(&row);
        assert_eq!(row, decode_row::<F64>(&bytes));
    }
}
