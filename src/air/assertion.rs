//! Boundary assertions: `(register, step, value)` triples supplied by the
//! caller to both `prove` and `verify` (§3 Assertion).

use crate::field::StarkField;
use crate::error::InputError;
use super::RegisterCounts;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assertion<E: StarkField> {
    pub register: usize,
    pub step: usize,
    pub value: E,
}

impl<E: StarkField> Assertion<E> {
    pub fn new(register: usize, step: usize, value: E) -> Self {
        Assertion { register, step, value }
    }
}

/// Validates assertions against the declared register count and trace
/// length before a trace is built, and rejects conflicting duplicates.
/// Mirrors the "validate metadata before running the heavy pipeline"
/// pattern observed in the wider pack's AIR-based provers.
pub fn validate<E: StarkField>(assertions: &[Assertion<E>], register_counts: &RegisterCounts, trace_length: usize) -> Result<(), InputError> {
    if assertions.is_empty() {
        return Err(InputError::NoAssertions);
    }

    let state_width = register_counts.state;
    for a in assertions {
        if a.register >= state_width {
            return Err(InputError::InvalidAssertionRegister { register: a.register, register_count: state_width });
        }
        if a.step >= trace_length {
            return Err(InputError::InvalidAssertionStep { step: a.step, trace_length });
        }
    }

    for i in 0..assertions.len() {
        for j in (i + 1)..assertions.len() {
            let a = &assertions[i];
            let b = &assertions[j];
            if a.register == b.register && a.step == b.step && a.value != b.value {
                return Err(InputError::ConflictingAssertions {
                    register: a.register,
                    step: a.step,
                    value_a: a.value.to_bytes(),
                    value_b: b.value.to_bytes(),
                });
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::F64;

    fn counts() -> RegisterCounts {
        RegisterCounts { state: 2, input: 0, public: 0, secret: 0 }
    }

    #[test]
    fn empty_assertions_rejected() {
        let result = validate::<F64>(&[], &counts(), 64);
        assert_eq!(Err(InputError::NoAssertions), result);
    }

    #[test]
    fn out_of_range_register_rejected() {
        let assertions = vec![Assertion::new(5, 0, 1)];
        let result = validate(&assertions, &counts(), 64);
        assert!(matches!(result, Err(InputError::InvalidAssertionRegister { register: 5, register_count: 2 })));
    }

    #[test]
    fn out_of_range_step_rejected() {
        let assertions = vec![Assertion::new(0, 64, 1)];
        let result = validate(&assertions, &counts(), 64);
        assert!(matches!(result, Err(InputError::InvalidAssertionStep { step: 64, trace_length: 64 })));
    }

    #[test]
    fn conflicting_assertions_rejected() {
        let assertions = vec![Assertion::new(0, 0, 1), Assertion::new(0, 0, 2)];
        let result = validate(&assertions, &counts(), 64);
        assert!(matches!(result, Err(InputError::ConflictingAssertions { .. })));
    }

    #[test]
    fn consistent_assertions_accepted() {
        let assertions = vec![Assertion::new(0, 0, 1), Assertion::new(1, 0, 1), Assertion::new(1, 63, 5)];
        assert_eq!(Ok(()), validate(&assertions, &counts(), 64));
    }
}
