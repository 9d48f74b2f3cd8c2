//! Reminder error types.

use jam3ya_shared::AppError;
use thiserror::Error;

use crate::store::StoreError;

/// Reminder run errors. Individual send failures are not errors; they are
/// counted in the run summary.
#[derive(Debug, Error)]
pub enum ReminderError {
    /// Members or transactions could not be loaded.
    #[error("reminder store error: {0}")]
    Store(#[from] StoreError),

    /// No further reminder instant exists in the calendar.
    #[error("no reminder scheduled after {0}")]
    ScheduleExhausted(chrono::NaiveDateTime),
}

impl From<ReminderError> for AppError {
    fn from(err: ReminderError) -> Self {
        match err {
            ReminderError::Store(inner) => inner.into(),
            ReminderError::ScheduleExhausted(_) => Self::Internal(err.to_string()),
        }
    }
}
