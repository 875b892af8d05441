use thiserror::Error;

use crate::model::{CategoryError, CategoryFilter};

/// Question count offered when nothing is configured.
pub const DEFAULT_QUESTION_COUNT: usize = 3;

/// Validated knobs for starting a session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSettings {
    filter: CategoryFilter,
    question_count: usize,
}

/// Unvalidated settings as read from flags or the environment.
#[derive(Clone, Debug, Default)]
pub struct SessionSettingsDraft {
    pub category: Option<String>,
    pub question_count: Option<String>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error(transparent)]
    Category(#[from] CategoryError),

    #[error("question count must be a positive whole number, got {raw:?}")]
    InvalidQuestionCount { raw: String },
}

impl SessionSettingsDraft {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and normalize the draft. Blank values fall back to the defaults.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` for a non-numeric or zero count.
    pub fn validate(self) -> Result<SessionSettings, SettingsError> {
        let filter = match normalize_optional(self.category) {
            Some(raw) => raw.parse::<CategoryFilter>()?,
            None => CategoryFilter::Any,
        };

        let question_count = match normalize_optional(self.question_count) {
            Some(raw) => match raw.parse::<usize>() {
                Ok(count) if count > 0 => count,
                _ => return Err(SettingsError::InvalidQuestionCount { raw }),
            },
            None => DEFAULT_QUESTION_COUNT,
        };

        Ok(SessionSettings {
            filter,
            question_count,
        })
    }
}

impl SessionSettings {
    /// # Errors
    ///
    /// Returns `SettingsError::InvalidQuestionCount` when `question_count` is zero.
    pub fn new(filter: CategoryFilter, question_count: usize) -> Result<Self, SettingsError> {
        if question_count == 0 {
            return Err(SettingsError::InvalidQuestionCount {
                raw: question_count.to_string(),
            });
        }
        Ok(Self {
            filter,
            question_count,
        })
    }

    #[must_use]
    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            filter: CategoryFilter::Any,
            question_count: DEFAULT_QUESTION_COUNT,
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|val| val.trim().to_string())
        .filter(|val| !val.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;

    #[test]
    fn empty_draft_uses_defaults() {
        let settings = SessionSettingsDraft::new().validate().unwrap();
        assert_eq!(settings, SessionSettings::default());
        assert_eq!(settings.question_count(), 3);
        assert_eq!(settings.filter(), &CategoryFilter::Any);
    }

    #[test]
    fn blank_values_are_treated_as_unset() {
        let settings = SessionSettingsDraft {
            category: Some("   ".into()),
            question_count: Some(String::new()),
        }
        .validate()
        .unwrap();
        assert_eq!(settings, SessionSettings::default());
    }

    #[test]
    fn draft_parses_category_and_count() {
        let settings = SessionSettingsDraft {
            category: Some(" Technical ".into()),
            question_count: Some("5".into()),
        }
        .validate()
        .unwrap();
        assert_eq!(
            settings.filter(),
            &CategoryFilter::Only(Category::new("Technical").unwrap())
        );
        assert_eq!(settings.question_count(), 5);
    }

    #[test]
    fn zero_or_garbage_count_is_rejected() {
        for raw in ["0", "-2", "three"] {
            let err = SessionSettingsDraft {
                category: None,
                question_count: Some(raw.into()),
            }
            .validate()
            .unwrap_err();
            assert_eq!(err, SettingsError::InvalidQuestionCount { raw: raw.into() });
        }
        assert!(SessionSettings::new(CategoryFilter::Any, 0).is_err());
    }
}
