use std::fmt;
use std::io;
use std::sync::Arc;

use interview_core::model::{RubricRegistry, SessionSettings, SessionSettingsDraft, SettingsError};
use rand::SeedableRng;
use rand::rngs::StdRng;
use services::{Clock, SessionLoopService};
use storage::{InMemoryQuestionBank, QuestionRepository};
use tracing_subscriber::EnvFilter;

mod prompt;

use prompt::{OutputFormat, Prompter};

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidSeed { raw: String },
    InvalidFormat { raw: String },
    Settings(SettingsError),
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidSeed { raw } => write!(f, "invalid --seed value: {raw}"),
            ArgsError::InvalidFormat { raw } => {
                write!(f, "invalid --format value: {raw} (expected text or json)")
            }
            ArgsError::Settings(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for ArgsError {}

impl From<SettingsError> for ArgsError {
    fn from(err: SettingsError) -> Self {
        Self::Settings(err)
    }
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  interview-practice [--category <name|Any>] [--count <n>] [--seed <u64>] [--format text|json]");
    eprintln!("  interview-practice --list");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --category Any");
    eprintln!("  --count 3");
    eprintln!("  --format text");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  INTERVIEW_CATEGORY, INTERVIEW_QUESTIONS, INTERVIEW_SEED, RUST_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Help,
    List,
    Practice(Args),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Args {
    settings: SessionSettings,
    seed: Option<u64>,
    format: OutputFormat,
}

fn parse_seed(raw: String) -> Result<u64, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidSeed { raw })
}

impl Command {
    /// Flags win over the environment; `env` is injected so tests stay hermetic.
    fn parse(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ArgsError> {
        let mut draft = SessionSettingsDraft {
            category: env("INTERVIEW_CATEGORY"),
            question_count: env("INTERVIEW_QUESTIONS"),
        };
        let mut seed = env("INTERVIEW_SEED")
            .filter(|raw| !raw.trim().is_empty())
            .map(parse_seed)
            .transpose()?;
        let mut format = OutputFormat::Text;

        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--category" => draft.category = Some(require_value(&mut args, "--category")?),
                "--count" => draft.question_count = Some(require_value(&mut args, "--count")?),
                "--seed" => seed = Some(parse_seed(require_value(&mut args, "--seed")?)?),
                "--format" => {
                    let value = require_value(&mut args, "--format")?;
                    format = value
                        .parse()
                        .map_err(|()| ArgsError::InvalidFormat { raw: value.clone() })?;
                }
                "--list" => return Ok(Self::List),
                "--help" | "-h" => return Ok(Self::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Self::Practice(Args {
            settings: draft.validate()?,
            seed,
            format,
        }))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn list_categories(bank: &dyn QuestionRepository, rubrics: &RubricRegistry) {
    for category in bank.categories() {
        let criteria: Vec<_> = rubrics
            .criteria_for(&category)
            .iter()
            .map(ToString::to_string)
            .collect();
        println!(
            "{category} ({} questions): {}",
            bank.by_category(&category).len(),
            criteria.join(", ")
        );
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let command = Command::parse(std::env::args().skip(1), |key| std::env::var(key).ok())
        .map_err(|e| {
            eprintln!("{e}");
            print_usage();
            e
        })?;

    init_tracing();

    let bank = Arc::new(InMemoryQuestionBank::standard());
    let rubrics = Arc::new(RubricRegistry::standard());

    match command {
        Command::Help => {
            print_usage();
            Ok(())
        }
        Command::List => {
            list_categories(bank.as_ref(), &rubrics);
            Ok(())
        }
        Command::Practice(args) => {
            let mut session_loop = SessionLoopService::new(Clock::system(), bank, rubrics);
            if let Some(seed) = args.seed {
                session_loop = session_loop.with_rng(StdRng::seed_from_u64(seed));
            }

            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stdout().lock(), args.format);
            prompter.run(&mut session_loop, &args.settings)?;
            Ok(())
        }
    }
}

fn main() {
    if let Err(err) = run() {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
