use serde::Serialize;
use thiserror::Error;

use crate::model::{Criterion, RawScores, Rubric, Score};

/// Reasons a score submission is rejected. The caller can fix the input and retry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvaluationError {
    #[error("missing score for `{criterion}`")]
    MissingScore { criterion: String },

    #[error("score for `{criterion}` is not a whole number: {raw:?}")]
    NotANumber { criterion: String, raw: String },

    #[error("score for `{criterion}` must be between 1 and 5, got {value}")]
    OutOfRange { criterion: String, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CriterionScore {
    pub criterion: Criterion,
    pub score: Score,
}

/// Scored answer to one question.
///
/// Built once per answered question and never changed afterwards. Scores are kept
/// in rubric order so reports read the same way the form was laid out.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    question: String,
    rubric: Rubric,
    scores: Vec<CriterionScore>,
    notes: String,
    average: f64,
}

impl Evaluation {
    /// Validate `raw` against `rubric` and build the evaluation.
    ///
    /// Keys in `raw` that the rubric does not mention are ignored.
    ///
    /// # Errors
    ///
    /// Returns the first `EvaluationError` found, walking the rubric in order.
    pub fn score(
        question: impl Into<String>,
        rubric: &Rubric,
        raw: &RawScores,
        notes: impl Into<String>,
    ) -> Result<Self, EvaluationError> {
        let mut scores = Vec::with_capacity(rubric.len());
        for criterion in rubric {
            let value = raw
                .get(criterion.as_str())
                .ok_or_else(|| EvaluationError::MissingScore {
                    criterion: criterion.to_string(),
                })?;
            scores.push(CriterionScore {
                criterion: criterion.clone(),
                score: Score::coerce(criterion, value)?,
            });
        }

        let total: u32 = scores.iter().map(|s| u32::from(s.score.value())).sum();
        #[allow(clippy::cast_precision_loss)]
        let average = f64::from(total) / rubric.len() as f64;

        Ok(Self {
            question: question.into(),
            rubric: rubric.clone(),
            scores,
            notes: notes.into(),
            average,
        })
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn rubric(&self) -> &Rubric {
        &self.rubric
    }

    #[must_use]
    pub fn scores(&self) -> &[CriterionScore] {
        &self.scores
    }

    #[must_use]
    pub fn score_for(&self, criterion: &str) -> Option<Score> {
        self.scores
            .iter()
            .find(|s| s.criterion.as_str() == criterion)
            .map(|s| s.score)
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }

    #[must_use]
    pub fn average(&self) -> f64 {
        self.average
    }
}
