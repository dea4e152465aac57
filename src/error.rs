use thiserror::Error;

use crate::store::entities::HabitId;

/// Outcomes of habit operations that are not a success.
///
/// Everything except [HabitError::Storage] is an expected rejection the caller is supposed to
/// handle, e.g. by telling the user the habit is already checked in.
#[derive(Debug, Error)]
pub enum HabitError {
    #[error("habit name can't be empty")]
    InvalidName,
    #[error("habit \"{0}\" already exists")]
    DuplicateName(String),
    #[error("habit \"{0}\" is already checked in today")]
    AlreadyCheckedIn(String),
    #[error("no habit with id {0}")]
    NotFound(HabitId),
    #[error("stored habits are malformed: {0}")]
    PersistenceReadFailure(#[from] serde_json::Error),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl HabitError {
    pub fn is_rejection(&self) -> bool {
        !matches!(self, HabitError::Storage(_))
    }
}
