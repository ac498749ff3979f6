//! Answers and the (possibly partial) answer set.
//!
//! An `AnswerSet` never covers all factors by requirement — a respondent
//! may answer 2 of 7 questions. Ingestion from the quiz layer is lenient:
//! malformed entries are skipped, never errors.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::factor::FactorId;

/// One user response to a survey factor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// Categorical value token. The computation key.
    pub value: String,
    /// Optional display label; never used in computation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Answer {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: None,
        }
    }

    pub fn with_label(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: Some(label.into()),
        }
    }

    /// Text shown in factor details: the label when present, else the token.
    pub fn display_value(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.value)
    }
}

/// Insertion-ordered collection of answers keyed by factor.
///
/// Backed by a small vec — at most seven factors, so linear lookup beats
/// hashing and iteration order stays stable for `ScoreResult::details`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerSet {
    entries: Vec<(FactorId, Answer)>,
}

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the answer for a factor. Replacement keeps the
    /// factor's original position.
    pub fn insert(&mut self, factor: FactorId, answer: Answer) {
        match self.entries.iter_mut().find(|(id, _)| *id == factor) {
            Some((_, existing)) => *existing = answer,
            None => self.entries.push((factor, answer)),
        }
    }

    /// Builder-style insert of a bare token.
    pub fn with(mut self, factor: FactorId, value: &str) -> Self {
        self.insert(factor, Answer::new(value));
        self
    }

    pub fn get(&self, factor: FactorId) -> Option<&Answer> {
        self.entries
            .iter()
            .find(|(id, _)| *id == factor)
            .map(|(_, a)| a)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FactorId, &Answer)> {
        self.entries.iter().map(|(id, a)| (*id, a))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Lenient ingestion from the quiz layer's JSON.
    ///
    /// Accepts `{"factor": {"value": "...", "label": "..."}}` objects as
    /// well as bare `{"factor": "token"}` strings. Entries with unknown
    /// factor ids, missing `value`, or any other shape are treated as
    /// absent.
    pub fn from_json(value: &Value) -> Self {
        let mut set = Self::new();
        let Some(map) = value.as_object() else {
            debug!("answer payload is not an object, treating as empty");
            return set;
        };

        for (key, entry) in map {
            let Some(factor) = FactorId::parse(key) else {
                debug!(key = %key, "unrecognized factor id, skipping");
                continue;
            };
            match entry {
                Value::String(token) => set.insert(factor, Answer::new(token.clone())),
                Value::Object(obj) => {
                    let Some(token) = obj.get("value").and_then(Value::as_str) else {
                        debug!(%factor, "answer entry missing 'value', skipping");
                        continue;
                    };
                    let label = obj.get("label").and_then(Value::as_str).map(str::to_owned);
                    set.insert(
                        factor,
                        Answer {
                            value: token.to_owned(),
                            label,
                        },
                    );
                }
                _ => {
                    debug!(%factor, "answer entry has unexpected shape, skipping");
                }
            }
        }

        set
    }
}

impl FromIterator<(FactorId, Answer)> for AnswerSet {
    fn from_iter<I: IntoIterator<Item = (FactorId, Answer)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (factor, answer) in iter {
            set.insert(factor, answer);
        }
        set
    }
}
