mod evaluation;
mod ids;
mod question;
mod rubric;
mod score;
mod settings;
mod summary;

pub use evaluation::{CriterionScore, Evaluation, EvaluationError};
pub use ids::SessionId;
pub use question::{Category, CategoryError, CategoryFilter, Question};
pub use rubric::{Criterion, Rubric, RubricError, RubricRegistry};
pub use score::{RawScore, RawScores, Score};
pub use settings::{DEFAULT_QUESTION_COUNT, SessionSettings, SessionSettingsDraft, SettingsError};
pub use summary::{SummaryEntry, SummaryError, SummaryReport};
