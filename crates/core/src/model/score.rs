use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::model::{Criterion, EvaluationError};

/// A single rubric score, always within `Score::MIN..=Score::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Returns `None` when `value` is outside 1..=5.
    #[must_use]
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    /// Coerce an untrusted form value into a score for `criterion`.
    ///
    /// Strings are trimmed and parsed as base-10 integers; nothing fancier.
    ///
    /// # Errors
    ///
    /// Returns `EvaluationError::NotANumber` or `EvaluationError::OutOfRange`.
    pub fn coerce(criterion: &Criterion, raw: &RawScore) -> Result<Self, EvaluationError> {
        let value = match raw {
            RawScore::Integer(value) => *value,
            RawScore::Text(text) => {
                text.trim()
                    .parse::<i64>()
                    .map_err(|_| EvaluationError::NotANumber {
                        criterion: criterion.to_string(),
                        raw: text.clone(),
                    })?
            }
        };
        u8::try_from(value)
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| EvaluationError::OutOfRange {
                criterion: criterion.to_string(),
                value,
            })
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Value submitted for a criterion before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawScore {
    Integer(i64),
    Text(String),
}

impl From<i64> for RawScore {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for RawScore {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<u8> for RawScore {
    fn from(value: u8) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<&str> for RawScore {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for RawScore {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Criterion name to raw value, as collected from whatever form the caller shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawScores(BTreeMap<String, RawScore>);

impl RawScores {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, criterion: impl Into<String>, value: impl Into<RawScore>) {
        self.0.insert(criterion.into(), value.into());
    }

    #[must_use]
    pub fn with(mut self, criterion: impl Into<String>, value: impl Into<RawScore>) -> Self {
        self.insert(criterion, value);
        self
    }

    #[must_use]
    pub fn get(&self, criterion: &str) -> Option<&RawScore> {
        self.0.get(criterion)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RawScores
where
    K: Into<String>,
    V: Into<RawScore>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}
