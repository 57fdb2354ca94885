//! Crate-level scenario tests, mirroring the teacher's `src/tests/` directory
//! of end-to-end `execute`/`verify` checks (here: `prove`/`verify`), one file
//! per concrete scenario from the specification's testable-properties section.

use stark_core::air::{ Air, AirContext, Assertion, ReadonlyRegisters, RegisterCounts };
use stark_core::error::{ InputError, StarkError };
use stark_core::field::{ F64, StarkField };
use stark_core::hash::HashAlgorithm;
use stark_core::options::ProofOptions;
use stark_core::{ prove, verify };

/// `out = [r0 + r1, r0 + 2*r1]`: the textbook linear-recurrence AIR, degree 1
/// in both registers.
struct Fibonacci {
    context: AirContext,
}

impl Fibonacci {
    fn new(trace_length: usize) -> Self {
        Fibonacci {
            context: AirContext {
                trace_length,
                constraint_degrees: vec![1, 1],
                register_counts: RegisterCounts { state: 2, input: 0, public: 0, secret: 0 },
                trace_shape: vec![trace_length as u32],
            },
        }
    }
}

impl Air<F64> for Fibonacci {
    fn context(&self) -> &AirContext {
        &self.context
    }

    fn evaluate_transition(&self, current: &[F64], _readonly: &[F64]) -> Vec<F64> {
        vec![
            F64::add(current[0], current[1]),
            F64::add(current[0], F64::mul(2, current[1])),
        ]
    }

    fn evaluate_constraints(&self, current: &[F64], next: &[F64], _readonly: &[F64]) -> Vec<F64> {
        vec![
            F64::sub(next[0], F64::add(current[0], current[1])),
            F64::sub(next[1], F64::add(current[0], F64::mul(2, current[1]))),
        ]
    }
}

/// `next = current^2`: a single-register, degree-2 AIR used only to probe
/// the extension-factor boundary (`k1 = 2`, so the minimum valid extension
/// factor is `2*k1 = 4`).
struct Squaring {
    context: AirContext,
}

impl Squaring {
    fn new(trace_length: usize) -> Self {
        Squaring {
            context: AirContext {
                trace_length,
                constraint_degrees: vec![2],
                register_counts: RegisterCounts { state: 1, input: 0, public: 0, secret: 0 },
                trace_shape: vec![trace_length as u32],
            },
        }
    }
}

impl Air<F64> for Squaring {
    fn context(&self) -> &AirContext {
        &self.context
    }

    fn evaluate_transition(&self, current: &[F64], _readonly: &[F64]) -> Vec<F64> {
        vec![F64::mul(current[0], current[0])]
    }

    fn evaluate_constraints(&self, current: &[F64], next: &[F64], _readonly: &[F64]) -> Vec<F64> {
        vec![F64::sub(next[0], F64::mul(current[0], current[0]))]
    }
}

fn empty_readonly() -> ReadonlyRegisters<F64> {
    ReadonlyRegisters { input: vec![], public: vec![], secret: vec![] }
}

/// Surfaces the prover/verifier's `log::debug!`/`info!` progress lines under
/// `RUST_LOG=debug cargo test -- --nocapture`, the same way the teacher's own
/// binary wires up `env_logger` in `main.rs`. Idempotent across the several
/// tests in this file that call it.
fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Runs `air`'s transition function the same way `TraceTable::build` does,
/// to compute the value a final assertion should claim without hardcoding a
/// magic constant tied to some other field's modulus.
fn run_to_step<A: Air<F64>>(air: &A, initial_state: &[F64], step: usize) -> Vec<F64> {
    let mut current = initial_state.to_vec();
    for _ in 0..step {
        current = air.evaluate_transition(&current, &[]);
    }
    current
}

#[test]
fn fibonacci_t64_proves_and_verifies() {
    init_logging();
    let air = Fibonacci::new(64);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];

    let final_state = run_to_step(&air, &initial_state, 63);
    let assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 63, final_state[1]),
    ];

    let options = ProofOptions::new(8, 32, 32, HashAlgorithm::Blake2s256).unwrap();
    let proof = prove(&air, &readonly, &initial_state, &assertions, options).unwrap();
    assert_eq!(64, proof.trace_length);

    let result = verify(&air, &readonly, &assertions, &proof);
    assert_eq!(Ok(()), result);
}

#[test]
fn fibonacci_tamper_fails_verification() {
    let air = Fibonacci::new(64);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];

    let final_state = run_to_step(&air, &initial_state, 63);
    let assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 63, final_state[1]),
    ];

    let options = ProofOptions::new(8, 32, 32, HashAlgorithm::Blake2s256).unwrap();
    let mut proof = prove(&air, &readonly, &initial_state, &assertions, options).unwrap();

    // Flip the high bit of the trace root.
    proof.trace_root[0] ^= 0x80;

    let result = verify(&air, &readonly, &assertions, &proof);
    assert!(result.is_err());
}

#[test]
fn fibonacci_assertion_mismatch_fails_verification() {
    let air = Fibonacci::new(64);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];

    let final_state = run_to_step(&air, &initial_state, 63);
    let wrong_final = F64::add(final_state[1], 1);

    let honest_assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 63, final_state[1]),
    ];
    let tampered_assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 63, wrong_final),
    ];

    let options = ProofOptions::new(8, 32, 32, HashAlgorithm::Blake2s256).unwrap();

    // A proof honestly built against the correct final value must fail to
    // verify against the wrong claimed assertion: the same proof bytes, a
    // different (and false) public statement.
    let proof = prove(&air, &readonly, &initial_state, &honest_assertions, options).unwrap();
    let result = verify(&air, &readonly, &tampered_assertions, &proof);
    assert!(result.is_err());
}

#[test]
fn empty_assertions_rejected_before_proving() {
    let air = Fibonacci::new(64);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];

    let options = ProofOptions::default();
    let result = prove(&air, &readonly, &initial_state, &[], options);
    assert_eq!(Err(StarkError::Input(InputError::NoAssertions)), result);
}

#[test]
fn extension_factor_must_cover_twice_the_constraint_blowup() {
    // max constraint degree 2 => k1 = 2, so the extension factor must be at
    // least 4; 2 is rejected, 4 succeeds (spec §8 scenario 6).
    let air = Squaring::new(8);
    let readonly = empty_readonly();
    let initial_state = vec![2u64];
    let final_state = run_to_step(&air, &initial_state, 7);
    let assertions = vec![Assertion::new(0, 0, 2), Assertion::new(0, 7, final_state[0])];

    let too_small = ProofOptions::new(2, 8, 8, HashAlgorithm::Blake2s256).unwrap();
    let result = prove(&air, &readonly, &initial_state, &assertions, too_small);
    assert!(matches!(result, Err(StarkError::Config(_))));

    let just_right = ProofOptions::new(4, 8, 8, HashAlgorithm::Blake2s256).unwrap();
    let proof = prove(&air, &readonly, &initial_state, &assertions, just_right).unwrap();
    assert_eq!(Ok(()), verify(&air, &readonly, &assertions, &proof));
}

#[test]
fn fri_remainder_never_empty_for_a_nontrivial_trace() {
    let air = Fibonacci::new(64);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];
    let final_state = run_to_step(&air, &initial_state, 63);
    let assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 63, final_state[1]),
    ];

    let options = ProofOptions::new(8, 32, 32, HashAlgorithm::Blake2s256).unwrap();
    let proof = prove(&air, &readonly, &initial_state, &assertions, options).unwrap();
    assert!(!proof.fri.remainder.is_empty());
}

#[test]
fn serialize_parse_round_trips_for_a_real_proof() {
    let air = Fibonacci::new(32);
    let readonly = empty_readonly();
    let initial_state = vec![1u64, 1u64];
    let final_state = run_to_step(&air, &initial_state, 31);
    let assertions = vec![
        Assertion::new(0, 0, 1),
        Assertion::new(1, 0, 1),
        Assertion::new(1, 31, final_state[1]),
    ];

    let options = ProofOptions::new(8, 24, 24, HashAlgorithm::Sha256).unwrap();
    let proof = prove(&air, &readonly, &initial_state, &assertions, options).unwrap();

    let bytes = proof.serialize();
    assert_eq!(bytes.len(), proof.size_of());

    let decoded = stark_core::StarkProof::<F64>::parse(&bytes).unwrap();
    let reencoded = decoded.serialize();
    assert_eq!(bytes, reencoded);

    assert_eq!(Ok(()), verify(&air, &readonly, &assertions, &decoded));
}
