use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::model::{CriterionScore, Evaluation};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SummaryError {
    #[error("cannot summarize a session with no evaluations")]
    NoEvaluations,
}

/// One answered question as it appears in the report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryEntry {
    /// 1-based position in the session.
    pub index: usize,
    pub question: String,
    pub scores: Vec<CriterionScore>,
    pub average: f64,
    pub notes: String,
}

/// Aggregate report for a completed session.
///
/// Read-only; rebuild it from the evaluations whenever it is needed.
/// `Display` renders the plain-text form handed to export sinks.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryReport {
    overall: f64,
    entries: Vec<SummaryEntry>,
}

impl SummaryReport {
    /// # Errors
    ///
    /// Returns `SummaryError::NoEvaluations` for an empty slice.
    pub fn from_evaluations(evaluations: &[Evaluation]) -> Result<Self, SummaryError> {
        if evaluations.is_empty() {
            return Err(SummaryError::NoEvaluations);
        }

        let total: f64 = evaluations.iter().map(Evaluation::average).sum();
        #[allow(clippy::cast_precision_loss)]
        let overall = total / evaluations.len() as f64;

        let entries = evaluations
            .iter()
            .enumerate()
            .map(|(i, eval)| SummaryEntry {
                index: i + 1,
                question: eval.question().to_string(),
                scores: eval.scores().to_vec(),
                average: eval.average(),
                notes: eval.notes().to_string(),
            })
            .collect();

        Ok(Self { overall, entries })
    }

    #[must_use]
    pub fn overall(&self) -> f64 {
        self.overall
    }

    #[must_use]
    pub fn entries(&self) -> &[SummaryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

/// Two decimals with ties rounded up, so 4.125 prints as "4.13".
/// Averages are always positive, where `f64::round` rounds half up.
fn two_decimals(value: f64) -> String {
    format!("{:.2}", (value * 100.0).round() / 100.0)
}

impl fmt::Display for SummaryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Q{}: {}", self.index, self.question)?;
        f.write_str("Scores: ")?;
        for (i, s) in self.scores.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", s.criterion, s.score)?;
        }
        writeln!(f)?;
        writeln!(f, "Average: {}", two_decimals(self.average))?;
        write!(f, "Notes: {}", self.notes)
    }
}

impl fmt::Display for SummaryReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Overall Score: {}", two_decimals(self.overall))?;
        for entry in &self.entries {
            write!(f, "\n\n{entry}")?;
        }
        Ok(())
    }
}
