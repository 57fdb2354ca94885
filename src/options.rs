//! Prover/verifier configuration: extension factor, query counts, a
//! selectable hash algorithm (the [`HashAlgorithm`] enum from
//! [`crate::hash`], serde-serializable directly rather than through a
//! function-pointer `serialize_with`), and `initial_memory`/`maximum_memory`
//! hints. The hints are carried for a future acceleration layer but are
//! non-functional here — no such layer is implemented in this core.

use serde::{ Deserialize, Serialize };

use crate::error::ConfigError;
use crate::hash::HashAlgorithm;

const DEFAULT_EXTENSION_FACTOR: usize = 8;
const DEFAULT_EXE_QUERY_COUNT: usize = 80;
const MAX_EXE_QUERY_COUNT: usize = 128;
const DEFAULT_FRI_QUERY_COUNT: usize = 40;
const MAX_FRI_QUERY_COUNT: usize = 64;
const MAX_EXTENSION_FACTOR: usize = 32;
const DEFAULT_INITIAL_MEMORY: usize = 1 << 20;
const DEFAULT_MAXIMUM_MEMORY: usize = 1 << 30;

/// Everything a prover/verifier pair needs to agree on up front. Validated
/// eagerly at construction; `extension_factor` is checked again against the
/// AIR's max constraint degree once that's known, by
/// [`crate::stark::context::EvaluationContext::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofOptions {
    extension_factor: usize,
    exe_query_count: usize,
    fri_query_count: usize,
    hash_algorithm: HashAlgorithm,
    initial_memory: usize,
    maximum_memory: usize,
}

impl ProofOptions {
    pub fn new(
        extension_factor: usize,
        exe_query_count: usize,
        fri_query_count: usize,
        hash_algorithm: HashAlgorithm,
    ) -> Result<Self, ConfigError> {
        if !extension_factor.is_power_of_two() {
            return Err(ConfigError::ExtensionFactorNotPowerOfTwo(extension_factor));
        }
        if extension_factor > MAX_EXTENSION_FACTOR {
            return Err(ConfigError::ExtensionFactorTooLarge(extension_factor));
        }
        if exe_query_count == 0 || exe_query_count > MAX_EXE_QUERY_COUNT {
            return Err(ConfigError::ExeQueryCountTooLarge(exe_query_count));
        }
        if fri_query_count == 0 || fri_query_count > MAX_FRI_QUERY_COUNT {
            return Err(ConfigError::FriQueryCountTooLarge(fri_query_count));
        }

        Ok(ProofOptions {
            extension_factor,
            exe_query_count,
            fri_query_count,
            hash_algorithm,
            initial_memory: DEFAULT_INITIAL_MEMORY,
            maximum_memory: DEFAULT_MAXIMUM_MEMORY,
        })
    }

    /// Same as [`ProofOptions::new`] but with explicit memory hints.
    pub fn with_memory_hints(mut self, initial_memory: usize, maximum_memory: usize) -> Self {
        self.initial_memory = initial_memory;
        self.maximum_memory = maximum_memory;
        self
    }

    pub fn extension_factor(&self) -> usize { self.extension_factor }
    pub fn exe_query_count(&self) -> usize { self.exe_query_count }
    pub fn fri_query_count(&self) -> usize { self.fri_query_count }
    pub fn hash_algorithm(&self) -> HashAlgorithm { self.hash_algorithm }
    pub fn initial_memory(&self) -> usize { self.initial_memory }
    pub fn maximum_memory(&self) -> usize { self.maximum_memory }
}

impl Default for ProofOptions {
    /// The smallest valid extension factor is AIR-dependent (it must be at
    /// least `2 * k1`), so the default here is a starting point; callers
    /// proving AIRs with a higher max constraint degree should raise it
    /// explicitly, matching the spec's "default = smallest valid" guidance
    /// for `extensionFactor`.
    fn default() -> Self {
        ProofOptions {
            extension_factor: DEFAULT_EXTENSION_FACTOR,
            exe_query_count: DEFAULT_EXE_QUERY_COUNT,
            fri_query_count: DEFAULT_FRI_QUERY_COUNT,
            hash_algorithm: HashAlgorithm::default(),
            initial_memory: DEFAULT_INITIAL_MEMORY,
            maximum_memory: DEFAULT_MAXIMUM_MEMORY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let opts = ProofOptions::default();
        assert_eq!(8, opts.extension_factor());
        assert_eq!(80, opts.exe_query_count());
        assert_eq!(40, opts.fri_query_count());
    }

    #[test]
    fn rejects_non_power_of_two_extension_factor() {
        let result = ProofOptions::new(6, 80, 40, HashAlgorithm::Blake2s256);
        assert!(matches!(result, Err(ConfigError::ExtensionFactorNotPowerOfTwo(6))));
    }

    #[test]
    fn rejects_oversized_query_counts() {
        let result = ProofOptions::new(8, 256, 40, HashAlgorithm::Blake2s256);
        assert!(matches!(result, Err(ConfigError::ExeQueryCountTooLarge(256))));

        let result = ProofOptions::new(8, 80, 128, HashAlgorithm::Blake2s256);
        assert!(matches!(result, Err(ConfigError::FriQueryCountTooLarge(128))));
    }

    #[test]
    fn serde_round_trips() {
        let opts = ProofOptions::default();
        let bytes = bincode::serialize(&opts).unwrap();
        let decoded: ProofOptions = bincode::deserialize(&bytes).unwrap();
        assert_eq!(opts, decoded);
    }
}
