use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use interview_core::model::{CategoryFilter, Question, Rubric, RubricRegistry};
use storage::QuestionRepository;

/// A catalog question drawn into a session, with the rubric it will be scored on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionQuestion {
    pub question: Question,
    pub rubric: Rubric,
}

impl SessionQuestion {
    #[must_use]
    pub fn text(&self) -> &str {
        self.question.text()
    }
}

/// Selection result for a session build.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionPlan {
    pub filter: CategoryFilter,
    pub questions: Vec<SessionQuestion>,
    /// Size of the candidate pool before truncation.
    pub pool_size: usize,
}

impl SessionPlan {
    #[must_use]
    pub fn total(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

/// Picks the questions for a session: filter the catalog, shuffle, truncate.
pub struct SessionBuilder<'a> {
    questions: &'a dyn QuestionRepository,
    rubrics: &'a RubricRegistry,
}

impl<'a> SessionBuilder<'a> {
    #[must_use]
    pub fn new(questions: &'a dyn QuestionRepository, rubrics: &'a RubricRegistry) -> Self {
        Self { questions, rubrics }
    }

    /// Build a plan of at most `count` questions.
    ///
    /// - The pool is the whole catalog for `CategoryFilter::Any`, else one category.
    /// - The pool is shuffled uniformly (Fisher-Yates via `SliceRandom::shuffle`).
    /// - The first `min(count, pool)` questions are kept; an empty pool yields an empty plan.
    pub fn build<R: Rng + ?Sized>(
        self,
        filter: &CategoryFilter,
        count: usize,
        rng: &mut R,
    ) -> SessionPlan {
        let mut pool = match filter {
            CategoryFilter::Any => self.questions.all_questions(),
            CategoryFilter::Only(category) => self.questions.by_category(category),
        };
        let pool_size = pool.len();

        pool.as_mut_slice().shuffle(rng);
        pool.truncate(count);

        let questions: Vec<SessionQuestion> = pool
            .into_iter()
            .map(|question| {
                let rubric = self.rubrics.criteria_for(question.category()).clone();
                SessionQuestion { question, rubric }
            })
            .collect();

        debug!(
            %filter,
            pool_size,
            requested = count,
            selected = questions.len(),
            "built session plan"
        );

        SessionPlan {
            filter: filter.clone(),
            questions,
            pool_size,
        }
    }
}
