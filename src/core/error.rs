use thiserror::Error;

/// Message shown to a visitor when the portfolio store keeps failing.
pub const TRANSIENT_USER_MESSAGE: &str =
    "Unable to load this portfolio right now. Please check your connection and try again.";

/// Failure taxonomy for portfolio operations.
///
/// `NotFound` is a definitive answer and is never retried. `Transient` is
/// only produced after the retry budget of the loader is exhausted.
/// Everything without a dedicated meaning flows through `Other`.
#[derive(Debug, Error)]
pub enum PortfolioError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("store unreachable after {attempts} attempts: {cause}")]
    Transient { attempts: u32, cause: anyhow::Error },

    #[error("{field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
