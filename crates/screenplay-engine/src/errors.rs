use crate::counters::ChronometryError;
use crate::editing::EditError;
use crate::exchange::ExchangeError;
use crate::reports::ReportError;
use crate::template::TemplateError;

/// Any failure a session-level call can report.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Template(#[from] TemplateError),
    #[error(transparent)]
    Chronometry(#[from] ChronometryError),
    #[error(transparent)]
    Report(#[from] ReportError),
    #[error(transparent)]
    Exchange(#[from] ExchangeError),
    #[error("Background job panicked: {0}")]
    JobPanicked(String),
}
