// src/error.rs
use std::fmt;

/// Rejection raised before any metric is derived.
#[derive(Debug, Clone, PartialEq)]
pub enum CalcError {
    InvalidInput { field: &'static str, reason: String },
}

impl CalcError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { field, .. } => field,
        }
    }
}

impl fmt::Display for CalcError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CalcError::InvalidInput { field, reason } => {
                write!(f, "invalid input for {}: {}", field, reason)
            }
        }
    }
}

impl std::error::Error for CalcError {}
