//! Derives the three nested domains and their generators from the trace
//! length, the AIR's max constraint degree, and the configured extension
//! factor.

use crate::error::ConfigError;
use crate::field::StarkField;

/// Domains and generators needed throughout the prover/verifier pipeline.
/// `D_T ⊂ D_C ⊂ D_E` as multiplicative subgroups of the same root of unity.
#[derive(Debug, Clone)]
pub struct EvaluationContext<E: StarkField> {
    trace_length: usize,
    ce_blowup: usize,
    extension_factor: usize,
    domain_root: E,
    trace_generator: E,
    composition_generator: E,
}

impl<E: StarkField> EvaluationContext<E> {
    /// `max_constraint_degree` determines `k1`, the smallest power of two
    /// at least as large as it; `extension_factor` is `k2` and must be a
    /// power of two in `[2*k1, 32]`.
    pub fn new(trace_length: usize, max_constraint_degree: usize, extension_factor: usize) -> Result<Self, ConfigError> {
        if !trace_length.is_power_of_two() {
            return Err(ConfigError::TraceLengthNotPowerOfTwo(trace_length));
        }
        if !extension_factor.is_power_of_two() {
            return Err(ConfigError::ExtensionFactorNotPowerOfTwo(extension_factor));
        }

        // A degree-1 AIR would otherwise yield ce_blowup == 1, collapsing
        // D_C onto D_T and leaving no headroom for the Q/Z coefficient-form
        // division in the composition polynomial; k1 >= 2 keeps D_C strictly
        // larger than D_T.
        let ce_blowup = max_constraint_degree.next_power_of_two().max(2);
        let min_extension_factor = 2 * ce_blowup;
        if extension_factor < min_extension_factor {
            return Err(ConfigError::ExtensionFactorTooSmall { actual: extension_factor, minimum: min_extension_factor });
        }
        if extension_factor > 32 {
            return Err(ConfigError::ExtensionFactorTooLarge(extension_factor));
        }

        let evaluation_domain_size = trace_length * extension_factor;
        let domain_root = E::get_root_of_unity(evaluation_domain_size);
        let trace_generator = E::exp(domain_root, extension_factor as u128);
        let composition_generator = E::exp(domain_root, (extension_factor / ce_blowup) as u128);

        Ok(EvaluationContext {
            trace_length,
            ce_blowup,
            extension_factor,
            domain_root,
            trace_generator,
            composition_generator,
        })
    }

    pub fn trace_length(&self) -> usize { self.trace_length }
    pub fn ce_blowup(&self) -> usize { self.ce_blowup }
    pub fn extension_factor(&self) -> usize { self.extension_factor }

    pub fn trace_domain_size(&self) -> usize { self.trace_length }
    pub fn composition_domain_size(&self) -> usize { self.trace_length * self.ce_blowup }
    pub fn evaluation_domain_size(&self) -> usize { self.trace_length * self.extension_factor }

    pub fn domain_root(&self) -> E { self.domain_root }
    pub fn trace_generator(&self) -> E { self.trace_generator }
    pub fn composition_generator(&self) -> E { self.composition_generator }

    pub fn composition_degree(&self) -> usize {
        let combination_degree = self.ce_blowup * self.trace_length;
        combination_degree.saturating_sub(self.trace_length).max(self.trace_length)
    }

    pub fn get_trace_domain(&self) -> Vec<E> {
        E::get_power_series(self.trace_generator, self.trace_length)
    }

    pub fn get_composition_domain(&self) -> Vec<E> {
        E::get_power_series(self.composition_generator, self.composition_domain_size())
    }

    pub fn get_evaluation_domain(&self) -> Vec<E> {
        E::get_power_series(self.domain_root, self.evaluation_domain_size())
    }
}
