//! Classifier error types.

use jam3ya_shared::AppError;
use thiserror::Error;

/// Product classification errors.
#[derive(Debug, Error)]
pub enum ClassifierError {
    /// No API key configured.
    #[error("classifier is not configured")]
    NotConfigured,

    /// Nothing to choose from.
    #[error("no candidate categories")]
    NoCandidates,

    /// Transport failure or timeout.
    #[error("classifier request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status.
    #[error("classifier API returned {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly truncated.
        body: String,
    },

    /// The answer was not the expected JSON object.
    #[error("malformed classifier response: {0}")]
    MalformedResponse(String),

    /// The answer named a category outside the candidate list.
    #[error("classifier chose unknown category: {0}")]
    UnknownCategory(String),
}

impl From<ClassifierError> for AppError {
    fn from(err: ClassifierError) -> Self {
        match err {
            ClassifierError::NotConfigured => Self::Configuration(err.to_string()),
            ClassifierError::NoCandidates => Self::Validation(err.to_string()),
            _ => Self::ExternalService(err.to_string()),
        }
    }
}
