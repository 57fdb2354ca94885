//! `stark-core`: the prover/verifier pipeline of a STARK (Scalable
//! Transparent Argument of Knowledge) proving system.
//!
//! This crate covers exactly the "hard part" of a STARK engine: given a
//! caller-supplied [`air::Air`] (a compiled transition function plus its
//! constraint evaluator) and a set of boundary [`air::Assertion`]s, it builds
//! an execution trace, low-degree-extends it, folds the transition and
//! boundary constraints into a single composition polynomial, commits both
//! via Merkle tree, and proves the composition polynomial's bounded degree
//! with FRI. Everything upstream of the compiled `Air` (parsing a
//! human-authored constraint script into one) and everything downstream of a
//! verified `Ok(())` (what the caller does with that fact) is out of scope.
//!
//! The pipeline's two entry points, [`prove`] and [`verify`], plus the types
//! a caller needs to build an `Air` and read back a [`StarkProof`], are
//! hoisted to the crate root. Everything else (the field, Merkle, and hash
//! capability interfaces; the individual pipeline stages) stays in its
//! module for callers who need to reach further in.

pub mod air;
pub mod error;
pub mod fft;
pub mod field;
pub mod hash;
pub mod merkle;
pub mod options;
pub mod polynom;
pub mod quartic;
pub mod stark;
pub mod transcript;

pub use air::{ Air, AirContext, Assertion, ReadonlyRegisters, RegisterCounts };
pub use error::{ ConfigError, InputError, ProofFormatError, StarkError, VerificationError };
pub use hash::HashAlgorithm;
pub use options::ProofOptions;
pub use stark::{ prove, verify, StarkProof };
