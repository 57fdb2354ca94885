//! The AIR (Algebraic Intermediate Representation) front-end contract: the
//! object the prover/verifier pipeline consumes but does not itself compile.
//! Parsing a human-authored constraint script into this form is explicitly
//! out of scope — callers hand the core an `Air` impl plus its
//! already-unrolled readonly register streams, with an arbitrary
//! caller-defined register layout rather than a fixed one.

mod assertion;
pub use assertion::{ validate, Assertion };

use crate::field::StarkField;

/// Register layout of the execution trace: `state` are the mutable
/// registers driven by the transition function; `input`, `public`, and
/// `secret` are readonly registers fed from already-unrolled input streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterCounts {
    pub state: usize,
    pub input: usize,
    pub public: usize,
    pub secret: usize,
}

impl RegisterCounts {
    pub fn readonly(&self) -> usize {
        self.input + self.public + self.secret
    }

    pub fn total(&self) -> usize {
        self.state + self.readonly()
    }
}

/// The readonly register streams, already unrolled to the trace length by
/// whatever produced them (the out-of-scope AIR front end). Row order when
/// concatenated for constraint evaluation and leaf serialization is
/// `input`, then `public`, then `secret`.
#[derive(Debug, Clone)]
pub struct ReadonlyRegisters<E: StarkField> {
    pub input: Vec<Vec<E>>,
    pub public: Vec<Vec<E>>,
    pub secret: Vec<Vec<E>>,
}

impl<E: StarkField> ReadonlyRegisters<E> {
    pub fn counts(&self) -> RegisterCounts {
        RegisterCounts { state: 0, input: self.input.len(), public: self.public.len(), secret: self.secret.len() }
    }

    /// Returns the readonly row at step `step`, in `input, public, secret`
    /// order.
    pub fn row_at(&self, step: usize) -> Vec<E> {
        let mut row = Vec::with_capacity(self.input.len() + self.public.len() + self.secret.len());
        for reg in &self.input { row.push(reg[step]); }
        for reg in &self.public { row.push(reg[step]); }
        for reg in &self.secret { row.push(reg[step]); }
        row
    }
}

/// Metadata shared by the evaluation context, the trace builder, and the
/// proof object: trace length, declared transition constraint degrees, and
/// register counts. `trace_shape` records how the (out-of-scope) AIR front
/// end unrolled nested input loops into the flat per-step readonly streams
/// above, one count per loop nesting depth, carried through to the proof
/// unexamined so the verifier can report it back to its own caller.
#[derive(Debug, Clone)]
pub struct AirContext {
    pub trace_length: usize,
    pub constraint_degrees: Vec<usize>,
    pub register_counts: RegisterCounts,
    pub trace_shape: Vec<u32>,
}

impl AirContext {
    pub fn max_constraint_degree(&self) -> usize {
        self.constraint_degrees.iter().copied().max().unwrap_or(1)
    }
}

/// The compiled constraint system: a transition function plus the
/// constraint evaluator that checks it was followed. `E` is the field the
/// AIR was compiled against.
pub trait Air<E: StarkField> {
    fn context(&self) -> &AirContext;

    /// Computes the next state row given the current state row and the
    /// readonly row at the same step.
    fn evaluate_transition(&self, current: &[E], readonly: &[E]) -> Vec<E>;

    /// Evaluates every transition constraint given consecutive state rows
    /// and the readonly row at the first of the two steps. Returns one
    /// value per declared constraint; all must be zero for a valid trace
    /// at every step except the last.
    fn evaluate_constraints(&self, current: &[E], next: &[E], readonly: &[E]) -> Vec<E>;
}
