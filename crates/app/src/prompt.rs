//! Line-oriented terminal front end for a practice session.

use std::io::{self, BufRead, Write};
use std::str::FromStr;

use chrono::{DateTime, Utc};
use interview_core::model::{RawScores, SessionId, SessionSettings, SummaryReport};
use serde::Serialize;
use services::{SessionError, SessionLoopService, SessionService};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),

    #[error("input closed before the session finished")]
    InputClosed,

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error("could not encode summary: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON export envelope: the report plus when and which session produced it.
#[derive(Serialize)]
struct ReportExport<'a> {
    session_id: Option<SessionId>,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    report: &'a SummaryReport,
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W, format: OutputFormat) -> Self {
        Self {
            input,
            output,
            format,
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }

    fn ask(&mut self, label: &str) -> Result<String, PromptError> {
        write!(self.output, "{label}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(PromptError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    /// Run sessions until the user declines another one.
    ///
    /// # Errors
    ///
    /// Returns `PromptError` for terminal failures, closed input, or a session
    /// that cannot start (for example an empty category).
    pub fn run(
        &mut self,
        session_loop: &mut SessionLoopService,
        settings: &SessionSettings,
    ) -> Result<(), PromptError> {
        let mut session = SessionService::new();
        loop {
            session_loop.start_with_settings(&mut session, settings)?;
            self.answer_all(session_loop, &mut session)?;
            self.print_report(&session)?;

            let again = self.ask("Start a new session? [y/N]: ")?;
            if !matches!(again.trim().to_ascii_lowercase().as_str(), "y" | "yes") {
                return Ok(());
            }
            session_loop.restart(&mut session)?;
        }
    }

    fn answer_all(
        &mut self,
        session_loop: &SessionLoopService,
        session: &mut SessionService,
    ) -> Result<(), PromptError> {
        while !session.is_complete() {
            let heading = format!(
                "\n{}\nQ{}: {}",
                session.progress_text()?,
                session.current_index() + 1,
                session.current_question()?.text()
            );
            writeln!(self.output, "{heading}")?;

            let criteria: Vec<String> = session
                .active_rubric()?
                .iter()
                .map(ToString::to_string)
                .collect();
            let mut raw = RawScores::new();
            for criterion in criteria {
                let value = self.ask(&format!("  {criterion} (1-5): "))?;
                raw.insert(criterion, value);
            }
            let notes = self.ask("  Notes: ")?;

            match session_loop.submit(session, &raw, notes) {
                Ok(_) => {}
                Err(err) if err.is_recoverable() => {
                    writeln!(self.output, "  {err}; please score this question again.")?;
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    fn print_report(&mut self, session: &SessionService) -> Result<(), PromptError> {
        let report = session.summarize()?;
        match self.format {
            OutputFormat::Text => writeln!(self.output, "\n{report}")?,
            OutputFormat::Json => {
                let export = ReportExport {
                    session_id: session.id(),
                    started_at: session.started_at(),
                    completed_at: session.completed_at(),
                    report: &report,
                };
                writeln!(self.output, "{}", serde_json::to_string_pretty(&export)?)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use interview_core::model::{CategoryFilter, RubricRegistry};
    use interview_core::time::fixed_clock;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::io::Cursor;
    use std::sync::Arc;
    use storage::InMemoryQuestionBank;

    fn session_loop() -> SessionLoopService {
        SessionLoopService::new(
            fixed_clock(),
            Arc::new(InMemoryQuestionBank::standard()),
            Arc::new(RubricRegistry::standard()),
        )
        .with_rng(StdRng::seed_from_u64(3))
    }

    fn settings(category: &str, count: usize) -> SessionSettings {
        SessionSettings::new(category.parse::<CategoryFilter>().unwrap(), count).unwrap()
    }

    fn run(
        input: &str,
        format: OutputFormat,
        settings: &SessionSettings,
    ) -> (Result<(), PromptError>, String) {
        let mut prompter = Prompter::new(Cursor::new(input.to_string()), Vec::new(), format);
        let result = prompter.run(&mut session_loop(), settings);
        let output = String::from_utf8(prompter.into_output()).unwrap();
        (result, output)
    }

    #[test]
    fn single_question_session_prints_text_report() {
        let input = "4\n4\n4\n4\nsolid\nn\n";
        let (result, output) = run(input, OutputFormat::Text, &settings("Estimation", 1));
        result.unwrap();
        assert!(output.contains("Question 1 of 1"));
        assert!(output.contains("Q1: How many umbrellas are sold each year in the US?"));
        assert!(output.contains("Overall Score: 4.00"));
        assert!(output.contains("Notes: solid"));
    }

    #[test]
    fn invalid_scores_are_prompted_again() {
        let input = "9\n4\n4\n4\n\n5\n5\n5\n5\n\nn\n";
        let (result, output) = run(input, OutputFormat::Text, &settings("Estimation", 1));
        result.unwrap();
        assert!(output.contains("must be between 1 and 5"));
        assert!(output.contains("Overall Score: 5.00"));
    }

    #[test]
    fn json_report_includes_session_metadata() {
        let input = "3\n3\n3\n3\n\nno\n";
        let (result, output) = run(input, OutputFormat::Json, &settings("Strategy", 1));
        result.unwrap();
        let json_start = output.find('{').unwrap();
        // The restart prompt follows the JSON, so only read the first value.
        let value: serde_json::Value = serde_json::Deserializer::from_str(&output[json_start..])
            .into_iter()
            .next()
            .unwrap()
            .unwrap();
        assert_eq!(value["overall"], 3.0);
        assert!(value["session_id"].is_string());
        assert_eq!(value["entries"][0]["scores"][0]["criterion"], "Vision");
    }

    #[test]
    fn restart_runs_a_second_session() {
        let input = "2\n2\n2\n2\n\ny\n5\n5\n5\n5\n\nn\n";
        let (result, output) = run(input, OutputFormat::Text, &settings("Estimation", 1));
        result.unwrap();
        assert!(output.contains("Overall Score: 2.00"));
        assert!(output.contains("Overall Score: 5.00"));
    }

    #[test]
    fn empty_category_is_an_error() {
        let (result, _) = run("", OutputFormat::Text, &settings("Nope", 2));
        assert!(matches!(
            result,
            Err(PromptError::Session(SessionError::EmptyQuestionPool { .. }))
        ));
    }

    #[test]
    fn closed_input_is_reported() {
        let (result, _) = run("4\n", OutputFormat::Text, &settings("Technical", 1));
        assert!(matches!(result, Err(PromptError::InputClosed)));
    }

    #[test]
    fn errors_render_for_stderr() {
        assert_eq!(
            PromptError::InputClosed.to_string(),
            "input closed before the session finished"
        );
        let session: PromptError = SessionError::InvalidQuestionCount.into();
        assert_eq!(
            session.to_string(),
            SessionError::InvalidQuestionCount.to_string()
        );
        let io: PromptError = io::Error::other("broken pipe").into();
        assert_eq!(io.to_string(), "terminal error: broken pipe");
    }

    #[test]
    fn format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("text".parse::<OutputFormat>(), Ok(OutputFormat::Text));
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
