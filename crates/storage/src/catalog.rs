//! Built-in question catalog.

use interview_core::model::{Category, Question};

pub const BEHAVIORAL: &str = "Behavioral";
pub const ESTIMATION: &str = "Estimation";
pub const STRATEGY: &str = "Strategy";
pub const TECHNICAL: &str = "Technical";

const STANDARD: &[(&str, &str)] = &[
    (
        BEHAVIORAL,
        "Tell me about a time you led a team through a challenge.",
    ),
    (BEHAVIORAL, "Describe a conflict you handled at work."),
    (ESTIMATION, "How many umbrellas are sold each year in the US?"),
    (STRATEGY, "What should our company prioritize in the next year?"),
    (TECHNICAL, "Explain the concept of dependency injection."),
    (
        TECHNICAL,
        "What are the benefits of using a relational database?",
    ),
];

/// The standard questions, in catalog order.
#[must_use]
pub fn standard_questions() -> Vec<Question> {
    STANDARD
        .iter()
        .filter_map(|(category, text)| {
            Category::new(*category)
                .ok()
                .map(|category| Question::new(category, *text))
        })
        .collect()
}
