//! Fill pass error and warning types

use std::fmt;
use thiserror::Error;

/// Conditions that abort a fill pass. No body is produced when one of these is returned.
#[derive(Debug, Error, PartialEq)]
pub enum FillError {
    /// The expected nested structure is absent
    #[error("Malformed schema at {path}: {reason}")]
    MalformedSchema { path: String, reason: String },

    /// A question that takes input has no entry id, usually a form behind account verification
    #[error("Entry ID missing for question type {type_code}; the form is most likely protected by account verification")]
    MissingEntryId { type_code: i64 },

    /// Question type without a handler
    #[error("Unsupported question type: {code}")]
    UnsupportedQuestionType { code: i64 },

    /// A choice question whose choice list is empty
    #[error("Question entry.{entry_id} has no choices to pick from")]
    NoChoices { entry_id: String },

    /// Session token missing from the input
    #[error("Session token is empty")]
    EmptySessionToken,
}

impl FillError {
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedSchema {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Recoverable conditions. Synthesis continues with the unconstrained answer.
#[derive(Debug, Clone, PartialEq)]
pub enum Warning {
    /// Validation category/subcategory with no decoder (regular expressions among them)
    UnsupportedValidation {
        entry_id: String,
        category: i64,
        subcategory: i64,
    },
    /// A decoded constraint that does not apply to the question's type
    ConstraintMismatch { entry_id: String, type_code: i64 },
    /// Numeric rule whose answer would overflow the integer range
    NumberOutOfRange { entry_id: String, bound: String },
    /// Checkbox count rule asking for more choices than exist
    CheckboxCountExceedsChoices {
        entry_id: String,
        requested: usize,
        available: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedValidation {
                entry_id,
                category,
                subcategory,
            } => write!(
                f,
                "entry.{}: no handling for validation {}.{}, using unconstrained answer",
                entry_id, category, subcategory
            ),
            Self::ConstraintMismatch { entry_id, type_code } => write!(
                f,
                "entry.{}: validation does not apply to question type {}, ignored",
                entry_id, type_code
            ),
            Self::NumberOutOfRange { entry_id, bound } => write!(
                f,
                "entry.{}: no integer answer satisfies bound {}, using unconstrained answer",
                entry_id, bound
            ),
            Self::CheckboxCountExceedsChoices {
                entry_id,
                requested,
                available,
            } => write!(
                f,
                "entry.{}: validation asks for {} selections but only {} choices exist",
                entry_id, requested, available
            ),
        }
    }
}
