//! Per-factor percentile resolution with fallback and optional noise.
//!
//! Absent factors are excluded from aggregation entirely — they carry no
//! weight and no percentile. The one exception is location, which always
//! participates via its designated default token.

use rand::Rng;

use lifescore_core::factor::LOCATION_DEFAULT_TOKEN;
use lifescore_core::{Answer, AnswerSet, FactorDefinition, FactorId, FactorTable};

use crate::engine::EngineConfig;

/// One resolved factor, ready for aggregation.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub factor: FactorId,
    pub display_value: String,
    pub percentile: f64,
    pub weight: f64,
}

/// Resolves answered factors against the reference table.
pub struct PercentileResolver<'a> {
    table: &'a FactorTable,
    noise_amplitude: f64,
    noise_floor: f64,
    noise_ceiling: f64,
}

impl<'a> PercentileResolver<'a> {
    pub fn new(table: &'a FactorTable, config: &EngineConfig) -> Self {
        Self {
            table,
            noise_amplitude: config.noise_amplitude,
            noise_floor: config.noise_floor,
            noise_ceiling: config.noise_ceiling,
        }
    }

    /// Resolve one answered factor. Unknown tokens degrade to the factor's
    /// fallback percentile, never an error.
    pub fn resolve(&self, def: &FactorDefinition, answer: &Answer) -> Resolved {
        Resolved {
            factor: def.id,
            display_value: answer.display_value().to_owned(),
            percentile: def.percentile_for(&answer.value),
            weight: def.weight,
        }
    }

    /// Resolve with a uniform perturbation in [−amplitude, +amplitude],
    /// clamped to [floor, ceiling]. The clamp stays strictly inside
    /// [0, 100]: no real-world factor sits at an absolute extreme, and
    /// repeated sampling against a hard boundary skews the distribution.
    pub fn resolve_noisy<R: Rng>(
        &self,
        def: &FactorDefinition,
        answer: &Answer,
        rng: &mut R,
    ) -> Resolved {
        let mut resolved = self.resolve(def, answer);
        resolved.percentile = self.perturb(resolved.percentile, rng);
        resolved
    }

    /// Resolve every answered factor in answer-set order. When location is
    /// unanswered, its default token resolves last.
    pub fn resolve_all(&self, answers: &AnswerSet) -> Vec<Resolved> {
        let mut resolved = Vec::with_capacity(answers.len() + 1);
        for (factor, answer) in answers.iter() {
            let Some(def) = self.table.get(factor) else {
                continue;
            };
            resolved.push(self.resolve(def, answer));
        }

        if answers.get(FactorId::Location).is_none() {
            if let Some(def) = self.table.get(FactorId::Location) {
                resolved.push(self.resolve(def, &Answer::new(LOCATION_DEFAULT_TOKEN)));
            }
        }

        resolved
    }

    /// Noisy variant of `resolve_all`, used by the uncertainty simulator.
    pub fn resolve_all_noisy<R: Rng>(&self, answers: &AnswerSet, rng: &mut R) -> Vec<Resolved> {
        let mut resolved = self.resolve_all(answers);
        for r in &mut resolved {
            r.percentile = self.perturb(r.percentile, rng);
        }
        resolved
    }

    fn perturb<R: Rng>(&self, percentile: f64, rng: &mut R) -> f64 {
        let noise = rng.gen_range(-self.noise_amplitude..=self.noise_amplitude);
        (percentile + noise).clamp(self.noise_floor, self.noise_ceiling)
    }
}
