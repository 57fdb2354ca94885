//! The STARK core pipeline: trace construction through low-degree
//! extension, boundary/transition constraint combination into a single
//! composition polynomial, commitment, FRI low-degree testing, and the
//! proof object that bundles it all together. [`prove`] and [`verify`] are
//! the two public entry points; everything else in this module is a
//! collaborator they wire together in the canonical Fiat-Shamir order
//! documented on [`Transcript`](crate::transcript::Transcript).

pub mod boundary;
pub mod commitment;
pub mod composition;
pub mod context;
pub mod fri;
pub mod proof;
pub mod prover;
pub mod trace;
pub mod verifier;
pub mod zero_poly;

pub use proof::StarkProof;
pub use prover::prove;
pub use verifier::verify;

use crate::air::{ Assertion, RegisterCounts };
use crate::field::StarkField;

/// Union of `positions` and `positions` shifted forward by one trace step
/// (`shift = extension_factor`), sorted and deduplicated: the full set of
/// trace rows a transition-constraint check at each position needs open
/// (the row itself, and the next row).
pub(crate) fn augmented_positions(positions: &[usize], shift: usize, domain_size: usize) -> Vec<usize> {
    use std::collections::BTreeSet;
    let mut set: BTreeSet<usize> = BTreeSet::new();
    for &p in positions {
        set.insert(p);
        set.insert((p + shift) % domain_size);
    }
    set.into_iter().collect()
}

/// Encodes the public statement (trace length, register layout, and the
/// asserted boundary values) into the bytes the transcript is seeded with,
/// so prover and verifier derive the exact same initial challenge stream
/// from the exact same public information.
pub(crate) fn encode_public_params<E: StarkField>(
    trace_length: usize,
    register_counts: &RegisterCounts,
    assertions: &[Assertion<E>],
) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&(trace_length as u64).to_le_bytes());
    bytes.extend_from_slice(&(register_counts.state as u32).to_le_bytes());
    bytes.extend_from_slice(&(register_counts.input as u32).to_le_bytes());
    bytes.extend_from_slice(&(register_counts.public as u32).to_le_bytes());
    bytes.extend_from_slice(&(register_counts.secret as u32).to_le_bytes());

    let mut sorted: Vec<&Assertion<E>> = assertions.iter().collect();
    sorted.sort_by_key(|a| (a.register, a.step));
    for a in sorted {
        bytes.extend_from_slice(&(a.register as u32).to_le_bytes());
        bytes.extend_from_slice(&(a.step as u32).to_le_bytes());
        bytes.extend_from_slice(&a.value.to_bytes());
    }
    bytes
}
