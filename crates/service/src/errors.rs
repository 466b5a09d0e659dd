use thiserror::Error;

/// Failures surfaced by the persistence adapter and the stores built on it.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage unavailable: {op} {key}: {reason}")]
    Storage { op: &'static str, key: String, reason: String },
    #[error("stored data for {key} is not valid: {reason}")]
    Deserialize { key: String, reason: String },
    #[error("{0} used outside of its provider")]
    MissingProvider(&'static str),
    #[error("validation error: {0}")]
    Validation(String),
}

impl StoreError {
    pub fn storage(op: &'static str, key: &str, reason: impl ToString) -> Self {
        Self::Storage { op, key: key.to_string(), reason: reason.to_string() }
    }

    pub fn deserialize(key: &str, reason: impl ToString) -> Self {
        Self::Deserialize { key: key.to_string(), reason: reason.to_string() }
    }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            StoreError::Storage { .. } => 2001,
            StoreError::Deserialize { .. } => 2002,
            StoreError::MissingProvider(_) => 2101,
            StoreError::Validation(_) => 2201,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, StoreError::Storage { .. })
    }
}

impl From<common::UnknownLanguage> for StoreError {
    fn from(e: common::UnknownLanguage) -> Self {
        StoreError::Validation(e.to_string())
    }
}
