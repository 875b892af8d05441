#![forbid(unsafe_code)]

pub mod catalog;
pub mod repository;

pub use repository::{InMemoryQuestionBank, QuestionRepository};
