#![forbid(unsafe_code)]

pub mod error;
pub mod sessions;

pub use interview_core::Clock;
pub use sessions as session;

pub use error::SessionError;

pub use sessions::{
    SessionAnswerResult, SessionBuilder, SessionLoopService, SessionPlan, SessionProgress,
    SessionQuestion, SessionService, SessionStage,
};
