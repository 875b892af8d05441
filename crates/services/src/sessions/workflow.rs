use rand::RngCore;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

use interview_core::model::{
    CategoryFilter, Evaluation, RawScores, RubricRegistry, SessionSettings, SummaryReport,
};
use storage::QuestionRepository;

use super::plan::SessionBuilder;
use super::progress::SessionProgress;
use super::service::SessionService;
use crate::Clock;
use crate::error::SessionError;

/// Result of submitting scores for a single question.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionAnswerResult {
    pub evaluation: Evaluation,
    pub progress: SessionProgress,
    pub is_complete: bool,
}

/// Orchestrates session start, scoring and restart against the catalog.
///
/// Owns the collaborators a session needs (question bank, rubrics, clock and
/// random source) while the `SessionService` itself stays with the caller.
pub struct SessionLoopService {
    clock: Clock,
    questions: Arc<dyn QuestionRepository>,
    rubrics: Arc<RubricRegistry>,
    rng: Box<dyn RngCore>,
}

impl SessionLoopService {
    /// Uses the thread-local generator; see [`Self::with_rng`] for tests.
    #[must_use]
    pub fn new(
        clock: Clock,
        questions: Arc<dyn QuestionRepository>,
        rubrics: Arc<RubricRegistry>,
    ) -> Self {
        Self {
            clock,
            questions,
            rubrics,
            rng: Box::new(rand::rng()),
        }
    }

    #[must_use]
    pub fn with_rng(mut self, rng: impl RngCore + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    #[must_use]
    pub fn rubrics(&self) -> &RubricRegistry {
        &self.rubrics
    }

    #[must_use]
    pub fn questions(&self) -> &dyn QuestionRepository {
        self.questions.as_ref()
    }

    /// Select questions and move `session` from `Setup` to `InProgress`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidState` if the session is not in `Setup`,
    /// `SessionError::InvalidQuestionCount` for a zero count and
    /// `SessionError::EmptyQuestionPool` when the filter matches nothing.
    pub fn start(
        &mut self,
        session: &mut SessionService,
        filter: &CategoryFilter,
        count: usize,
    ) -> Result<(), SessionError> {
        if !session.is_in_setup() {
            return Err(SessionError::InvalidState {
                operation: "start",
                stage: session.stage(),
            });
        }
        if count == 0 {
            return Err(SessionError::InvalidQuestionCount);
        }

        let plan = SessionBuilder::new(self.questions.as_ref(), &self.rubrics).build(
            filter,
            count,
            &mut *self.rng,
        );
        if plan.is_empty() {
            warn!(%filter, "no questions match filter");
        }
        session.begin(plan, self.clock.now())?;

        info!(
            session_id = ?session.id(),
            %filter,
            questions = session.total_questions(),
            "session started"
        );
        Ok(())
    }

    /// Same as [`Self::start`], reading filter and count from validated settings.
    ///
    /// # Errors
    ///
    /// See [`Self::start`].
    pub fn start_with_settings(
        &mut self,
        session: &mut SessionService,
        settings: &SessionSettings,
    ) -> Result<(), SessionError> {
        self.start(session, settings.filter(), settings.question_count())
    }

    /// Score the current question, stamping completion with the service clock.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidScore` for bad input (retryable) and
    /// `SessionError::InvalidState` outside `InProgress`.
    pub fn submit(
        &self,
        session: &mut SessionService,
        raw: &RawScores,
        notes: impl Into<String>,
    ) -> Result<SessionAnswerResult, SessionError> {
        let evaluation = match session.submit(raw, notes, self.clock.now()) {
            Ok(evaluation) => evaluation.clone(),
            Err(err) => {
                warn!(session_id = ?session.id(), error = %err, "submission rejected");
                return Err(err);
            }
        };

        if session.is_complete() {
            info!(
                session_id = ?session.id(),
                answered = session.evaluations().len(),
                "session complete"
            );
        }

        Ok(SessionAnswerResult {
            evaluation,
            progress: session.progress(),
            is_complete: session.is_complete(),
        })
    }

    /// # Errors
    ///
    /// See [`SessionService::summarize`].
    pub fn summarize(&self, session: &SessionService) -> Result<SummaryReport, SessionError> {
        session.summarize()
    }

    /// # Errors
    ///
    /// See [`SessionService::restart`].
    pub fn restart(&self, session: &mut SessionService) -> Result<(), SessionError> {
        let previous = session.id();
        session.restart()?;
        info!(previous_session_id = ?previous, "session restarted");
        Ok(())
    }
}

impl fmt::Debug for SessionLoopService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionLoopService")
            .field("clock", &self.clock)
            .field("rubrics", &self.rubrics)
            .finish_non_exhaustive()
    }
}
