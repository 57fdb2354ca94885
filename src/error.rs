//! Error taxonomy for the prover/verifier pipeline. Configuration, input,
//! proof-format, and verification failures are kept as distinct variants so
//! callers can tell a malformed request apart from a failed proof.

use thiserror::Error;

/// An invalid combination of `ProofOptions` fields, caught before a proof is
/// ever attempted.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("extension factor {0} is not a power of 2")]
    ExtensionFactorNotPowerOfTwo(usize),
    #[error("trace length {0} is not a power of 2")]
    TraceLengthNotPowerOfTwo(usize),
    #[error("extension factor {actual} is below the minimum of {minimum} required for {num_constraints} constraints")]
    ExtensionFactorTooSmall { actual: usize, minimum: usize },
    #[error("extension factor {0} exceeds the maximum of 32")]
    ExtensionFactorTooLarge(usize),
    #[error("execution trace query count {0} exceeds the maximum of 128")]
    ExeQueryCountTooLarge(usize),
    #[error("FRI query count {0} exceeds the maximum of 64")]
    FriQueryCountTooLarge(usize),
}

/// A malformed request to `prove`: bad assertions, empty inputs, or a trace
/// that doesn't fit the declared register counts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("no assertions were provided; at least one assertion is required")]
    NoAssertions,
    #[error("assertion targets register {register}, but only {register_count} registers are declared")]
    InvalidAssertionRegister { register: usize, register_count: usize },
    #[error("assertion targets step {step}, but the trace has only {trace_length} steps")]
    InvalidAssertionStep { step: usize, trace_length: usize },
    #[error("two assertions conflict at register {register}, step {step}: {value_a:?} != {value_b:?}")]
    ConflictingAssertions { register: usize, step: usize, value_a: Vec<u8>, value_b: Vec<u8> },
    #[error("public input stream is empty but the AIR declares {0} public registers")]
    MissingPublicInputs(usize),
    #[error("secret input stream is empty but the AIR declares {0} secret registers")]
    MissingSecretInputs(usize),
}

/// A proof object failed to decode: truncated buffer, an out-of-range size
/// prefix, or an array/matrix that exceeds a hard wire-format limit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProofFormatError {
    #[error("unexpected end of input while reading {0}")]
    UnexpectedEof(&'static str),
    #[error("array of {actual} entries exceeds the hard limit of {limit}")]
    ArrayTooLarge { actual: usize, limit: usize },
    #[error("matrix has {actual} columns, exceeding the hard limit of {limit}")]
    TooManyColumns { actual: usize, limit: usize },
    #[error("failed to deserialize proof: {0}")]
    Malformed(String),
}

/// Why `verify` rejected a proof. Carried as data rather than just `false`
/// so callers get a diagnostic reason, per the verification-failure
/// taxonomy: a Merkle mismatch, a transcript divergence, a failed FRI
/// check, and a composition-reconstruction mismatch are all distinguishable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerificationError {
    #[error("trace Merkle proof failed to verify at query position {0}")]
    TraceMerkleProofInvalid(usize),
    #[error("composition Merkle proof failed to verify at query position {0}")]
    CompositionMerkleProofInvalid(usize),
    #[error("FRI layer {0} Merkle proof failed to verify")]
    FriLayerProofInvalid(usize),
    #[error("FRI layer {depth} folding is inconsistent: expected {expected:?}, found {found:?}")]
    FriFoldingMismatch { depth: usize, expected: Vec<u8>, found: Vec<u8> },
    #[error("FRI remainder does not agree with the degree bound of {degree}")]
    FriRemainderDegreeMismatch { degree: usize },
    #[error("reconstructed composition value does not match the committed value at query position {0}")]
    CompositionValueMismatch(usize),
    #[error("boundary constraints are unsatisfied at register {register}, step {step}")]
    BoundaryConstraintUnsatisfied { register: usize, step: usize },
    #[error("transcript diverged from the proof's committed roots")]
    TranscriptDivergence,
    #[error("claimed degree {claimed} exceeds the maximum allowed degree {max}")]
    DegreeBoundViolation { claimed: usize, max: usize },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StarkError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    ProofFormat(#[from] ProofFormatError),
    #[error(transparent)]
    Verification(#[from] VerificationError),
}
