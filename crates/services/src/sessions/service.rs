use chrono::{DateTime, Utc};
use std::fmt;

use interview_core::model::{Evaluation, Question, RawScores, Rubric, SessionId, SummaryReport};

use super::plan::{SessionPlan, SessionQuestion};
use super::progress::SessionProgress;
use crate::error::SessionError;

//
// ─── STAGE ─────────────────────────────────────────────────────────────────────
//

/// Where a session is in its lifecycle.
///
/// `Setup -> InProgress` on start, `InProgress -> Complete` after the last
/// submission, `Complete -> Setup` on restart. Nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionStage {
    #[default]
    Setup,
    InProgress,
    Complete,
}

impl fmt::Display for SessionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SessionStage::Setup => "in setup",
            SessionStage::InProgress => "in progress",
            SessionStage::Complete => "complete",
        })
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory practice session owned by the caller.
///
/// Steps through the planned questions in order, scoring each answer against the
/// rubric snapshotted into the plan. All state is dropped on `restart`.
#[derive(Default)]
pub struct SessionService {
    id: Option<SessionId>,
    stage: SessionStage,
    questions: Vec<SessionQuestion>,
    current: usize,
    evaluations: Vec<Evaluation>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl SessionService {
    /// A fresh session waiting in `Setup`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn require(&self, expected: SessionStage, operation: &'static str) -> Result<(), SessionError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                stage: self.stage,
            })
        }
    }

    /// Move from `Setup` to `InProgress` with the planned questions.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Setup` and
    /// `SessionError::EmptyQuestionPool` for an empty plan. Either way the
    /// session is left untouched.
    pub fn begin(&mut self, plan: SessionPlan, started_at: DateTime<Utc>) -> Result<(), SessionError> {
        self.require(SessionStage::Setup, "start")?;
        if plan.is_empty() {
            return Err(SessionError::EmptyQuestionPool {
                filter: plan.filter,
            });
        }

        *self = Self {
            id: Some(SessionId::new_random()),
            stage: SessionStage::InProgress,
            questions: plan.questions,
            current: 0,
            evaluations: Vec::new(),
            started_at: Some(started_at),
            completed_at: None,
        };
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> Option<SessionId> {
        self.id
    }

    #[must_use]
    pub fn stage(&self) -> SessionStage {
        self.stage
    }

    #[must_use]
    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn questions(&self) -> &[SessionQuestion] {
        &self.questions
    }

    #[must_use]
    pub fn evaluations(&self) -> &[Evaluation] {
        &self.evaluations
    }

    /// Zero-based index of the question being answered.
    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_in_setup(&self) -> bool {
        self.stage == SessionStage::Setup
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stage == SessionStage::Complete
    }

    #[must_use]
    pub fn progress(&self) -> SessionProgress {
        SessionProgress {
            total: self.total_questions(),
            answered: self.evaluations.len(),
            remaining: self.questions.len().saturating_sub(self.current),
            is_complete: self.is_complete(),
        }
    }

    fn current(&self, operation: &'static str) -> Result<&SessionQuestion, SessionError> {
        self.require(SessionStage::InProgress, operation)?;
        self.questions
            .get(self.current)
            .ok_or(SessionError::InvalidState {
                operation,
                stage: self.stage,
            })
    }

    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress`.
    pub fn current_question(&self) -> Result<&Question, SessionError> {
        self.current("read the current question")
            .map(|q| &q.question)
    }

    /// Rubric that the next submission is validated against.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress`.
    pub fn active_rubric(&self) -> Result<&Rubric, SessionError> {
        self.current("read the active rubric").map(|q| &q.rubric)
    }

    /// `"Question {n} of {total}"` for the current question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress`.
    pub fn progress_text(&self) -> Result<String, SessionError> {
        self.require(SessionStage::InProgress, "report progress")?;
        self.progress().label().ok_or(SessionError::InvalidState {
            operation: "report progress",
            stage: self.stage,
        })
    }

    /// Score the current question and advance.
    ///
    /// On the last question the session moves to `Complete` and `completed_at`
    /// is set to `submitted_at`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `InProgress` and
    /// `SessionError::InvalidScore` for bad input. Neither changes the session.
    pub fn submit(
        &mut self,
        raw: &RawScores,
        notes: impl Into<String>,
        submitted_at: DateTime<Utc>,
    ) -> Result<&Evaluation, SessionError> {
        let question = self.current("submit scores")?;
        let evaluation = Evaluation::score(question.text(), &question.rubric, raw, notes)?;

        self.evaluations.push(evaluation);
        self.current += 1;
        if self.current >= self.questions.len() {
            self.stage = SessionStage::Complete;
            self.completed_at = Some(submitted_at);
        }

        self.evaluations.last().ok_or(SessionError::InvalidState {
            operation: "submit scores",
            stage: self.stage,
        })
    }

    /// Build the report for a completed session.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` outside `Complete` and
    /// `SessionError::Summary` when there is nothing to average.
    pub fn summarize(&self) -> Result<SummaryReport, SessionError> {
        self.require(SessionStage::Complete, "summarize")?;
        Ok(SummaryReport::from_evaluations(&self.evaluations)?)
    }

    /// Drop everything and return to `Setup`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` unless the session is `Complete`.
    pub fn restart(&mut self) -> Result<(), SessionError> {
        self.require(SessionStage::Complete, "restart")?;
        *self = Self::new();
        Ok(())
    }
}

impl fmt::Debug for SessionService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionService")
            .field("id", &self.id)
            .field("stage", &self.stage)
            .field("questions_len", &self.questions.len())
            .field("current", &self.current)
            .field("evaluations_len", &self.evaluations.len())
            .field("started_at", &self.started_at)
            .field("completed_at", &self.completed_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::{Category, CategoryFilter, EvaluationError, RubricRegistry};
    use chrono::Duration;
    use interview_core::time::{fixed_clock, fixed_now};

    fn build_question(category: &str, text: &str) -> SessionQuestion {
        let category = Category::new(category).unwrap();
        let rubric = RubricRegistry::standard().criteria_for(&category).clone();
        SessionQuestion {
            question: Question::new(category, text),
            rubric,
        }
    }

    fn build_plan(questions: Vec<SessionQuestion>) -> SessionPlan {
        let pool_size = questions.len();
        SessionPlan {
            filter: CategoryFilter::Any,
            questions,
            pool_size,
        }
    }

    fn all(rubric: &Rubric, value: i64) -> RawScores {
        rubric.iter().map(|c| (c.to_string(), value)).collect()
    }

    fn started(questions: Vec<SessionQuestion>) -> SessionService {
        let mut session = SessionService::new();
        session.begin(build_plan(questions), fixed_now()).unwrap();
        session
    }

    #[test]
    fn new_session_is_in_setup() {
        let session = SessionService::new();
        assert_eq!(session.stage(), SessionStage::Setup);
        assert!(session.id().is_none());
        assert!(matches!(
            session.current_question(),
            Err(SessionError::InvalidState {
                stage: SessionStage::Setup,
                ..
            })
        ));
    }

    #[test]
    fn empty_plan_is_reported_and_stays_in_setup() {
        let mut session = SessionService::new();
        let err = session.begin(build_plan(Vec::new()), fixed_now()).unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuestionPool { .. }));
        assert_eq!(session.stage(), SessionStage::Setup);
    }

    #[test]
    fn begin_twice_is_rejected() {
        let mut session = started(vec![build_question("Technical", "Q1")]);
        let id = session.id();
        let err = session
            .begin(build_plan(vec![build_question("Technical", "Q2")]), fixed_now())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                operation: "start",
                stage: SessionStage::InProgress
            }
        ));
        assert_eq!(session.id(), id);
        assert_eq!(session.current_question().unwrap().text(), "Q1");
    }

    #[test]
    fn submit_before_last_advances_by_one() {
        let mut session = started(vec![
            build_question("Technical", "Q1"),
            build_question("Behavioral", "Q2"),
        ]);
        assert_eq!(session.progress_text().unwrap(), "Question 1 of 2");

        let rubric = session.active_rubric().unwrap().clone();
        let eval = session.submit(&all(&rubric, 3), "", fixed_now()).unwrap();
        assert_eq!(eval.question(), "Q1");

        assert_eq!(session.stage(), SessionStage::InProgress);
        assert_eq!(session.current_index(), 1);
        assert_eq!(session.evaluations().len(), session.current_index());
        assert_eq!(session.progress_text().unwrap(), "Question 2 of 2");
        assert_eq!(session.current_question().unwrap().text(), "Q2");
    }

    #[test]
    fn active_rubric_follows_current_question() {
        let mut session = started(vec![
            build_question("Technical", "Q1"),
            build_question("Behavioral", "Q2"),
        ]);
        assert!(session.active_rubric().unwrap().contains("Clarity"));
        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 3), "", fixed_now()).unwrap();
        assert!(session.active_rubric().unwrap().contains("Situation"));
    }

    #[test]
    fn submit_on_last_question_completes() {
        let mut session = started(vec![build_question("Technical", "Q1")]);
        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 5), "done", fixed_now()).unwrap();

        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.evaluations().len(), session.total_questions());
        assert!(session.progress().is_complete);
        assert!(session.progress_text().is_err());
    }

    #[test]
    fn completion_is_stamped_with_submit_time() {
        let mut clock = fixed_clock();
        let mut session = SessionService::new();
        session
            .begin(build_plan(vec![build_question("Technical", "Q1")]), clock.now())
            .unwrap();

        clock.advance(Duration::minutes(7));
        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 4), "", clock.now()).unwrap();

        let started = session.started_at().unwrap();
        let completed = session.completed_at().unwrap();
        assert_eq!(started, fixed_now());
        assert_eq!(completed - started, Duration::minutes(7));

        let err = session
            .begin(build_plan(vec![build_question("Technical", "Q2")]), clock.now())
            .unwrap_err();
        assert!(matches!(
            err,
            SessionError::InvalidState {
                operation: "start",
                stage: SessionStage::Complete
            }
        ));
        assert_eq!(session.completed_at(), Some(completed));
        assert_eq!(session.evaluations().len(), 1);
    }

    #[test]
    fn invalid_scores_leave_session_unchanged() {
        let mut session = started(vec![
            build_question("Technical", "Q1"),
            build_question("Technical", "Q2"),
        ]);
        let bad = RawScores::new()
            .with("Clarity", 4)
            .with("Structure", "nine")
            .with("Insight", 4)
            .with("Relevance", 4);

        let err = session.submit(&bad, "", fixed_now()).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(
            err,
            SessionError::InvalidScore(EvaluationError::NotANumber { .. })
        ));
        assert_eq!(session.current_index(), 0);
        assert!(session.evaluations().is_empty());

        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 4), "", fixed_now()).unwrap();
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn submit_after_complete_is_rejected() {
        let mut session = started(vec![build_question("Technical", "Q1")]);
        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 4), "", fixed_now()).unwrap();

        let err = session.submit(&all(&rubric, 4), "", fixed_now()).unwrap_err();
        assert!(!err.is_recoverable());
        assert!(matches!(
            err,
            SessionError::InvalidState {
                stage: SessionStage::Complete,
                ..
            }
        ));
        assert_eq!(session.evaluations().len(), 1);
    }

    #[test]
    fn summarize_requires_complete() {
        let session = started(vec![build_question("Technical", "Q1")]);
        assert!(matches!(
            session.summarize(),
            Err(SessionError::InvalidState {
                operation: "summarize",
                ..
            })
        ));
        assert!(matches!(
            SessionService::new().summarize(),
            Err(SessionError::InvalidState { .. })
        ));
    }

    #[test]
    fn summarize_averages_question_averages() {
        let mut session = started(vec![
            build_question("Technical", "Q1"),
            build_question("Technical", "Q2"),
        ]);
        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 4), "", fixed_now()).unwrap();
        session.submit(&all(&rubric, 5), "", fixed_now()).unwrap();

        let report = session.summarize().unwrap();
        assert_eq!(report.overall(), 4.5);
        assert!(report.to_text().starts_with("Overall Score: 4.50"));
    }

    #[test]
    fn restart_only_from_complete() {
        let mut session = started(vec![build_question("Technical", "Q1")]);
        assert!(session.restart().is_err());
        assert_eq!(session.stage(), SessionStage::InProgress);

        let rubric = session.active_rubric().unwrap().clone();
        session.submit(&all(&rubric, 4), "", fixed_now()).unwrap();
        session.restart().unwrap();

        assert_eq!(session.stage(), SessionStage::Setup);
        assert!(session.evaluations().is_empty());
        assert!(session.questions().is_empty());
        assert!(session.id().is_none());
    }
}
