use interview_core::model::{Category, Question};

/// Read-only access to the question catalog.
pub trait QuestionRepository: Send + Sync {
    /// Every question, in a stable order.
    fn all_questions(&self) -> Vec<Question>;

    /// Questions tagged with exactly `category`; empty for unknown categories.
    fn by_category(&self, category: &Category) -> Vec<Question> {
        self.all_questions()
            .into_iter()
            .filter(|q| q.category() == category)
            .collect()
    }

    /// Distinct categories in first-seen order.
    fn categories(&self) -> Vec<Category> {
        let mut seen: Vec<Category> = Vec::new();
        for question in self.all_questions() {
            if !seen.contains(question.category()) {
                seen.push(question.category().clone());
            }
        }
        seen
    }
}

/// Question bank held in memory. The only backend; there is no persistence.
#[derive(Debug, Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Vec<Question>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    /// Bank preloaded with [`crate::catalog::standard_questions`].
    #[must_use]
    pub fn standard() -> Self {
        Self::new(crate::catalog::standard_questions())
    }

    #[must_use]
    pub fn with_question(mut self, question: Question) -> Self {
        self.questions.push(question);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionRepository for InMemoryQuestionBank {
    fn all_questions(&self) -> Vec<Question> {
        self.questions.clone()
    }
}
