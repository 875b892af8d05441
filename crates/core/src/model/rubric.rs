use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use thiserror::Error;

use crate::model::Category;

const DEFAULT_CRITERIA: [&str; 4] = ["Clarity", "Structure", "Insight", "Relevance"];
const BEHAVIORAL_CRITERIA: [&str; 4] = ["Situation", "Task", "Action", "Result"];
const STRATEGY_CRITERIA: [&str; 4] = ["Vision", "Execution", "Impact", "Measurement"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RubricError {
    #[error("criterion name cannot be empty")]
    EmptyCriterion,

    #[error("rubric must contain at least one criterion")]
    NoCriteria,

    #[error("criterion `{0}` appears more than once")]
    DuplicateCriterion(String),
}

/// Name of a single scoring criterion (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Criterion(String);

impl Criterion {
    /// # Errors
    ///
    /// Returns `RubricError::EmptyCriterion` if the name is blank.
    pub fn new(value: impl Into<String>) -> Result<Self, RubricError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(RubricError::EmptyCriterion);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered, non-empty list of unique criteria that an answer is scored against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Rubric(Vec<Criterion>);

impl Rubric {
    /// Build a rubric from criterion names, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns `RubricError::NoCriteria` for an empty list,
    /// `RubricError::EmptyCriterion` for a blank name and
    /// `RubricError::DuplicateCriterion` when a name repeats.
    pub fn new<I, S>(names: I) -> Result<Self, RubricError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut criteria = Vec::new();
        for name in names {
            let criterion = Criterion::new(name)?;
            if !seen.insert(criterion.clone()) {
                return Err(RubricError::DuplicateCriterion(criterion.0));
            }
            criteria.push(criterion);
        }
        if criteria.is_empty() {
            return Err(RubricError::NoCriteria);
        }
        Ok(Self(criteria))
    }

    // Only for the built-in constant lists above.
    fn builtin(names: &[&str]) -> Self {
        Self(names.iter().map(|n| Criterion((*n).to_string())).collect())
    }

    #[must_use]
    pub fn criteria(&self) -> &[Criterion] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Criterion> {
        self.0.iter()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|c| c.as_str() == name)
    }
}

impl<'a> IntoIterator for &'a Rubric {
    type Item = &'a Criterion;
    type IntoIter = std::slice::Iter<'a, Criterion>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Maps categories to the rubric used to score their answers.
///
/// Lookups are exact; anything without a dedicated entry gets the default rubric.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RubricRegistry {
    default: Rubric,
    by_category: HashMap<Category, Rubric>,
}

impl RubricRegistry {
    #[must_use]
    pub fn new(default: Rubric) -> Self {
        Self {
            default,
            by_category: HashMap::new(),
        }
    }

    /// The stock registry: Behavioral and Strategy get their own rubric,
    /// everything else is scored on Clarity/Structure/Insight/Relevance.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new(Rubric::builtin(&DEFAULT_CRITERIA));
        registry.by_category.insert(
            Category::builtin("Behavioral"),
            Rubric::builtin(&BEHAVIORAL_CRITERIA),
        );
        registry.by_category.insert(
            Category::builtin("Strategy"),
            Rubric::builtin(&STRATEGY_CRITERIA),
        );
        registry
    }

    #[must_use]
    pub fn with_rubric(mut self, category: Category, rubric: Rubric) -> Self {
        self.by_category.insert(category, rubric);
        self
    }

    #[must_use]
    pub fn criteria_for(&self, category: &Category) -> &Rubric {
        self.by_category.get(category).unwrap_or(&self.default)
    }

    #[must_use]
    pub fn default_rubric(&self) -> &Rubric {
        &self.default
    }

    #[must_use]
    pub fn has_rubric_for(&self, category: &Category) -> bool {
        self.by_category.contains_key(category)
    }
}

impl Default for RubricRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
