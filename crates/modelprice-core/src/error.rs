use thiserror::Error;

use crate::scenario::UsageField;

/// A usage field value that had to be corrected. The corrected value is
/// stored anyway; callers decide whether to surface the diagnostic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field} must be at least {min} (got {given})")]
    BelowMinimum { field: UsageField, min: u64, given: f64 },

    #[error("{field} must be at most {max} (got {given})")]
    AboveMaximum { field: UsageField, max: u64, given: f64 },

    #[error("{field} is not a number: {raw:?}")]
    NotANumber { field: UsageField, raw: String },
}

impl ValidationError {
    pub fn field(&self) -> UsageField {
        match self {
            ValidationError::BelowMinimum { field, .. }
            | ValidationError::AboveMaximum { field, .. }
            | ValidationError::NotANumber { field, .. } => *field,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScenarioError {
    #[error("unknown usage field: {0}")]
    UnknownField(String),

    #[error("unknown preset: {0} (expected small, medium, large or enterprise)")]
    UnknownPreset(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("selection is limited to {limit} models")]
    CapacityReached { limit: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("unknown model status: {0}")]
    UnknownStatus(String),

    #[error("unknown sort key: {0} (expected name, price-asc, price-desc, context or release)")]
    UnknownSortKey(String),
}
