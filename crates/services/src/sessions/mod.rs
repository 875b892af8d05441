mod plan;
mod progress;
mod service;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use plan::{SessionBuilder, SessionPlan, SessionQuestion};
pub use progress::SessionProgress;
pub use service::{SessionService, SessionStage};
pub use workflow::{SessionAnswerResult, SessionLoopService};
