/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

impl SessionProgress {
    /// `"Question N of M"` for the question currently being answered.
    ///
    /// Returns `None` once every question has been answered.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        (self.answered < self.total)
            .then(|| format!("Question {} of {}", self.answered + 1, self.total))
    }
}
