//! Fiat-Shamir transcript. Feeding a committed root straight into a field
//! PRNG as its seed, with no accumulation across absorptions, is a known
//! footgun: a second draw against the same seed before the next absorption
//! would come out correlated with the first. Here the transcript accumulates
//! instead: every absorption folds the new bytes into the running seed with
//! the hash's own `merge`, and every draw ratchets the seed forward
//! afterward so a second draw without an intervening absorb still yields
//! fresh randomness.

use crate::field::StarkField;
use crate::hash::{ HashAlgorithm, DIGEST_SIZE };
use crate::merkle::Digest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Uninitialized,
    Seeded,
}

/// A single-owner, explicit Fiat-Shamir transcript. `E` is the field that
/// challenges are drawn into.
pub struct Transcript<E: StarkField> {
    hash: HashAlgorithm,
    seed: Digest,
    state: State,
    _marker: std::marker::PhantomData<E>,
}

impl<E: StarkField> Transcript<E> {
    /// Seeds the transcript from a domain-separation tag and the public
    /// parameters of the proof (trace length, register counts, proof
    /// options, public input values, assertions — whatever the caller
    /// considers part of the statement being proven).
    pub fn new(domain_tag: &[u8], public_params: &[u8], hash: HashAlgorithm) -> Self {
        let mut buf = Vec::with_capacity(domain_tag.len() + public_params.len());
        buf.extend_from_slice(domain_tag);
        buf.extend_from_slice(public_params);
        let mut seed = [0u8; DIGEST_SIZE];
        hash.hash(&buf, &mut seed);
        Transcript { hash, seed, state: State::Seeded, _marker: std::marker::PhantomData }
    }

    /// Absorbs a commitment root, in the canonical order: trace root, then
    /// composition root, then each FRI layer's column root.
    pub fn absorb(&mut self, digest: &Digest) {
        debug_assert_eq!(self.state, State::Seeded, "transcript must be seeded before absorbing");
        self.seed = self.hash.merge(&self.seed, digest);
    }

    /// Draws `count` field elements (the α or β linear-combination
    /// coefficients, or a single-element draw such as a FRI folding
    /// challenge `x_l`).
    pub fn draw_coefficients(&mut self, count: usize) -> Vec<E> {
        let values = E::prng_vector(self.seed, count);
        self.ratchet();
        values
    }

    pub fn draw_element(&mut self) -> E {
        self.draw_coefficients(1)[0]
    }

    /// Draws `count` distinct positions in `[0, domain_size)`, excluding any
    /// position that lands on the trace domain `D_T` (multiples of
    /// `extension_factor`, since `D_T ⊂ D_E` is exactly those points and
    /// `Z(x)` has a zero there), via rejection sampling.
    pub fn draw_positions(&mut self, count: usize, domain_size: usize, extension_factor: usize) -> Vec<usize> {
        use rand::prelude::*;
        use rand::distributions::Uniform;

        let range = Uniform::from(0..domain_size);
        let mut rng = StdRng::from_seed(self.seed);

        let mut result = Vec::with_capacity(count);
        for _ in 0..(count * 1000).max(10_000) {
            let value: usize = rng.sample(range);
            if extension_factor > 1 && value % extension_factor == 0 { continue; }
            if result.contains(&value) { continue; }
            result.push(value);
            if result.len() >= count { break; }
        }
        assert_eq!(count, result.len(), "could not draw enough distinct query positions");

        self.ratchet();
        result
    }

    /// Ratchets the seed forward after a draw so that two draws without an
    /// intervening absorb never repeat the same squeeze.
    fn ratchet(&mut self) {
        self.seed = self.hash.merge(&self.seed, &[0x53]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::F64;

    #[test]
    fn same_inputs_produce_same_challenges() {
        let mut t1 = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);
        let mut t2 = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);

        let root = [7u8; DIGEST_SIZE];
        t1.absorb(&root);
        t2.absorb(&root);

        assert_eq!(t1.draw_coefficients(4), t2.draw_coefficients(4));
    }

    #[test]
    fn absorbing_changes_subsequent_draws() {
        let mut t = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);
        let before = t.draw_coefficients(4);
        t.absorb(&[1u8; DIGEST_SIZE]);
        let after = t.draw_coefficients(4);
        assert_ne!(before, after);
    }

    #[test]
    fn repeated_draws_without_absorb_differ() {
        let mut t = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);
        let a = t.draw_coefficients(4);
        let b = t.draw_coefficients(4);
        assert_ne!(a, b);
    }

    #[test]
    fn positions_never_land_on_trace_domain() {
        let mut t = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);
        let positions = t.draw_positions(20, 512, 8);
        assert_eq!(20, positions.len());
        for p in &positions {
            assert_ne!(0, p % 8);
        }
    }

    #[test]
    fn positions_are_distinct() {
        let mut t = Transcript::<F64>::new(b"stark-core", b"params", HashAlgorithm::Blake2s256);
        let positions = t.draw_positions(30, 1024, 4);
        let mut sorted = positions.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(positions.len(), sorted.len());
    }
}
