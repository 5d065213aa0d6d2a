//! Error types for the diária ledger engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure the registries, the rate resolver, the ledger and the
//! persistence adapters can report.

use chrono::{NaiveDateTime, Weekday};
use thiserror::Error;

/// The main error type for the diária ledger engine.
///
/// All operations in the engine return this error type, so the calling
/// layer can map each kind to its own response.
///
/// # Example
///
/// ```
/// use diaria_ledger::error::EngineError;
///
/// let error = EngineError::NotFound {
///     entity: "company".to_string(),
///     name: "Rapido Express".to_string(),
/// };
/// assert_eq!(error.to_string(), "company not found: Rapido Express");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A user-supplied field could not be parsed or violated a constraint.
    #[error("Invalid field '{field}': {message}")]
    InvalidField {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A referenced company, driver or user does not exist.
    #[error("{entity} not found: {name}")]
    NotFound {
        /// The kind of entity that was looked up.
        entity: String,
        /// The name that was not found.
        name: String,
    },

    /// An entity with the same name is already registered.
    #[error("{entity} already registered: {name}")]
    DuplicateName {
        /// The kind of entity.
        entity: String,
        /// The conflicting name.
        name: String,
    },

    /// The acting user is outside the scope required by the operation.
    #[error("Access denied for '{username}': {message}")]
    AccessDenied {
        /// The acting user.
        username: String,
        /// What the user attempted.
        message: String,
    },

    /// The shift does not end strictly after it starts.
    #[error("Invalid shift interval: {start} to {end}")]
    InvalidShiftInterval {
        /// The shift start.
        start: NaiveDateTime,
        /// The shift end.
        end: NaiveDateTime,
    },

    /// An override weekday was hit but the company has no weekend rate pair.
    #[error("Company '{company}' has {weekday} as an override day but no weekend rates")]
    MissingRateConfiguration {
        /// The company whose plan is incomplete.
        company: String,
        /// The weekday of the shift start.
        weekday: Weekday,
    },

    /// A monetary amount exceeded the representable decimal range.
    #[error("Amount overflow computing {amount}")]
    AmountOverflow {
        /// The amount being computed (e.g. "amount_charged", "total_paid").
        amount: String,
    },

    /// The backing store could not be read or written.
    #[error("Persistence failure during {operation}: {message}")]
    Persistence {
        /// The store operation that failed (e.g. "persist_shift_ledger").
        operation: String,
        /// The underlying failure.
        message: String,
    },

    /// The export could not be serialized.
    #[error("Export failed: {message}")]
    Export {
        /// The underlying failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl EngineError {
    pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Self {
        EngineError::InvalidField {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn not_found(entity: &str, name: &str) -> Self {
        EngineError::NotFound {
            entity: entity.to_string(),
            name: name.to_string(),
        }
    }

    pub(crate) fn amount_overflow(amount: &str) -> Self {
        EngineError::AmountOverflow {
            amount: amount.to_string(),
        }
    }

    pub(crate) fn persistence(operation: &str, err: impl std::fmt::Display) -> Self {
        EngineError::Persistence {
            operation: operation.to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
