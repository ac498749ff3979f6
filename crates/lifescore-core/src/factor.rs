//! Factor reference data: identifiers, weights, and token→percentile tables.
//!
//! The `FactorTable` is constructed once at initialization and read-only
//! thereafter. Weight sum = 1.0 (± 1e-9) is a load-time invariant, checked
//! once in `FactorTable::new`.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ScoreError;
use crate::types::collections::FxHashMap;

/// Tolerance for the weight-sum invariant.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

/// Token the location factor resolves when no location answer is present.
///
/// Location always participates — it anchors every scenario to a geographic
/// baseline. Every other factor is simply excluded when unanswered.
pub const LOCATION_DEFAULT_TOKEN: &str = "high-income";

/// The seven recognized survey factors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FactorId {
    Income,
    Education,
    Healthcare,
    Water,
    Location,
    Hunger,
    Internet,
}

impl FactorId {
    /// All recognized factors, in canonical order.
    pub const ALL: [FactorId; 7] = [
        FactorId::Income,
        FactorId::Education,
        FactorId::Healthcare,
        FactorId::Water,
        FactorId::Location,
        FactorId::Hunger,
        FactorId::Internet,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FactorId::Income => "income",
            FactorId::Education => "education",
            FactorId::Healthcare => "healthcare",
            FactorId::Water => "water",
            FactorId::Location => "location",
            FactorId::Hunger => "hunger",
            FactorId::Internet => "internet",
        }
    }

    /// Parse a factor identifier. Unknown ids yield `None` so lenient
    /// ingestion can treat them as absent.
    pub fn parse(s: &str) -> Option<FactorId> {
        match s {
            "income" => Some(FactorId::Income),
            "education" => Some(FactorId::Education),
            "healthcare" => Some(FactorId::Healthcare),
            "water" => Some(FactorId::Water),
            "location" => Some(FactorId::Location),
            "hunger" => Some(FactorId::Hunger),
            "internet" => Some(FactorId::Internet),
            _ => None,
        }
    }

    /// Canonical weight for this factor. The full set sums to exactly 1.0.
    pub fn canonical_weight(&self) -> f64 {
        match self {
            FactorId::Income => 0.25,
            FactorId::Education => 0.20,
            FactorId::Healthcare => 0.20,
            FactorId::Water => 0.15,
            FactorId::Location => 0.10,
            FactorId::Hunger => 0.05,
            FactorId::Internet => 0.05,
        }
    }
}

impl fmt::Display for FactorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable per-factor metadata: weight, categorical lookup, fallback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactorDefinition {
    pub id: FactorId,
    /// Human-readable name used in contribution breakdowns.
    pub label: String,
    /// Importance in (0, 1]; all weights together sum to 1.0.
    pub weight: f64,
    /// Categorical value token → percentile in [0, 100].
    pub percentiles: FxHashMap<String, f64>,
    /// Percentile used when a supplied token is not in `percentiles`.
    pub fallback: f64,
}

impl FactorDefinition {
    /// Look up a token's percentile, degrading silently to the fallback
    /// for unknown values.
    pub fn percentile_for(&self, token: &str) -> f64 {
        match self.percentiles.get(token) {
            Some(&p) => p,
            None => {
                debug!(
                    factor = %self.id,
                    token,
                    fallback = self.fallback,
                    "unknown categorical token, using fallback percentile"
                );
                self.fallback
            }
        }
    }
}

/// The full immutable reference table, one definition per recognized factor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<FactorDefinition>", into = "Vec<FactorDefinition>")]
pub struct FactorTable {
    factors: Vec<FactorDefinition>,
}

impl FactorTable {
    /// Build a table from definitions, enforcing the load-time invariants:
    /// every recognized factor present exactly once, weights in (0, 1]
    /// summing to 1.0 ± 1e-9, all percentiles within [0, 100].
    pub fn new(factors: Vec<FactorDefinition>) -> Result<Self, ScoreError> {
        Self::validate(&factors)?;
        Ok(Self { factors })
    }

    /// Build a table from an injected JSON payload (an array of factor
    /// definitions, the shape the external reference-statistics loader
    /// produces).
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ScoreError> {
        let factors: Vec<FactorDefinition> = Vec::deserialize(value)
            .map_err(|e| ScoreError::InvalidTable(e.to_string()))?;
        Self::new(factors)
    }

    pub fn get(&self, id: FactorId) -> Option<&FactorDefinition> {
        self.factors.iter().find(|f| f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorDefinition> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }

    fn validate(factors: &[FactorDefinition]) -> Result<(), ScoreError> {
        for id in FactorId::ALL {
            let count = factors.iter().filter(|f| f.id == id).count();
            if count != 1 {
                return Err(ScoreError::InvalidTable(format!(
                    "factor '{id}' appears {count} times, expected exactly once"
                )));
            }
        }

        let mut weight_sum = 0.0;
        for f in factors {
            if !(f.weight > 0.0 && f.weight <= 1.0) {
                return Err(ScoreError::InvalidTable(format!(
                    "factor '{}' has weight {} outside (0, 1]",
                    f.id, f.weight
                )));
            }
            weight_sum += f.weight;

            if !(0.0..=100.0).contains(&f.fallback) {
                return Err(ScoreError::InvalidTable(format!(
                    "factor '{}' has fallback percentile {} outside [0, 100]",
                    f.id, f.fallback
                )));
            }
            for (token, &p) in &f.percentiles {
                if !(0.0..=100.0).contains(&p) {
                    return Err(ScoreError::InvalidTable(format!(
                        "factor '{}' token '{token}' has percentile {p} outside [0, 100]",
                        f.id
                    )));
                }
            }
        }

        if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScoreError::InvalidTable(format!(
                "weights sum to {weight_sum}, expected 1.0"
            )));
        }

        Ok(())
    }

    /// The built-in canonical reference table — the same data the external
    /// reference-statistics loader would inject at start-up.
    pub fn reference() -> Self {
        fn def(
            id: FactorId,
            label: &str,
            tokens: &[(&str, f64)],
        ) -> FactorDefinition {
            FactorDefinition {
                id,
                label: label.to_owned(),
                weight: id.canonical_weight(),
                percentiles: tokens
                    .iter()
                    .map(|&(t, p)| (t.to_owned(), p))
                    .collect(),
                fallback: 50.0,
            }
        }

        let factors = vec![
            def(
                FactorId::Income,
                "Household income",
                &[
                    ("bottom-bracket", 5.0),
                    ("low-bracket", 25.0),
                    ("middle-bracket", 50.0),
                    ("high-bracket", 75.0),
                    ("top-bracket", 95.0),
                ],
            ),
            def(
                FactorId::Education,
                "Education level",
                &[
                    ("none", 15.0),
                    ("primary", 35.0),
                    ("secondary", 65.0),
                    ("university", 90.0),
                ],
            ),
            def(
                FactorId::Healthcare,
                "Healthcare access",
                &[
                    ("unaffordable", 10.0),
                    ("difficult", 35.0),
                    ("moderate", 60.0),
                    ("easy", 85.0),
                ],
            ),
            def(
                FactorId::Water,
                "Water access",
                &[
                    ("must-collect", 12.0),
                    ("intermittent", 40.0),
                    ("reliable", 65.0),
                ],
            ),
            def(
                FactorId::Location,
                "Country income group",
                &[
                    ("low-income", 10.0),
                    ("lower-middle-income", 30.0),
                    ("upper-middle-income", 55.0),
                    ("high-income", 84.0),
                ],
            ),
            def(
                FactorId::Hunger,
                "Food security",
                &[
                    ("often", 5.0),
                    ("sometimes", 25.0),
                    ("rarely", 40.0),
                    ("never", 55.0),
                ],
            ),
            def(
                FactorId::Internet,
                "Internet access",
                &[
                    ("none", 20.0),
                    ("slow", 45.0),
                    ("basic", 60.0),
                    ("high-speed", 80.0),
                ],
            ),
        ];

        // The canonical data always satisfies the invariants.
        Self { factors }
    }
}

impl TryFrom<Vec<FactorDefinition>> for FactorTable {
    type Error = ScoreError;

    fn try_from(factors: Vec<FactorDefinition>) -> Result<Self, Self::Error> {
        Self::new(factors)
    }
}

impl From<FactorTable> for Vec<FactorDefinition> {
    fn from(table: FactorTable) -> Self {
        table.factors
    }
}
