use thiserror::Error;

use crate::ai::AiError;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Storage quota exceeded: {size} bytes (quota {quota})")]
    QuotaExceeded { size: usize, quota: usize },

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Rejected ingredient input. Shown next to the input field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Please enter at least {min} characters for ingredients.")]
    TooShort { min: usize },

    #[error("Ingredients list is too long, please keep it under {max} characters.")]
    TooLong { max: usize },

    #[error("Invalid recipe data provided for {0}.")]
    InvalidRecipe(&'static str),

    #[error("Please describe the change you want to make.")]
    EmptyModification,
}

/// Outcome of a failed action, split by where the caller should show it.
#[derive(Error, Debug)]
pub enum ActionError {
    /// Inline, next to the input.
    #[error(transparent)]
    InvalidInput(#[from] InputError),

    /// Transient notification.
    #[error("{0}")]
    GenerationFailed(String),
}

impl ActionError {
    pub fn is_input_error(&self) -> bool {
        matches!(self, ActionError::InvalidInput(_))
    }
}

impl From<AiError> for ActionError {
    fn from(e: AiError) -> Self {
        ActionError::GenerationFailed(e.to_string())
    }
}
