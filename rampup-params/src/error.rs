use rampup_core::{TimeSeriesError, constraint::ConstraintError, interpolation::InterpError};
use thiserror::Error;

use crate::spatial_field::ProfileError;

/// Errors in the configuration itself.
///
/// These are fatal: the configuration cannot be used until it is fixed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("`{field}` has a malformed time series")]
    TimeSeries {
        field: &'static str,
        #[source]
        source: TimeSeriesError,
    },

    #[error("`{field}` has a malformed profile")]
    Profile {
        field: &'static str,
        #[source]
        source: ProfileError,
    },

    #[error("`{field}` cannot be resolved before a grid is attached")]
    MissingGrid { field: &'static str },

    #[error("invalid grid: {reason}")]
    InvalidGrid { reason: &'static str },

    #[error("`{field}` has {actual} nodes but the grid has {expected}")]
    NodeCountMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("`{field}` is declared more than once")]
    DuplicateField { field: &'static str },

    #[error("`{field}` depends on `{depends_on}`, which cannot be resolved")]
    UnresolvedDependency {
        field: &'static str,
        depends_on: &'static str,
    },

    #[error("invalid numerics: {reason}")]
    InvalidNumerics { reason: &'static str },
}

/// A sampled value that violates a physical bound.
///
/// Raised only when the offending time is actually queried, so a
/// configuration can be valid over part of its time range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`{section}.{field}` = {value} at t = {time} is invalid: {reason}")]
pub struct ValidationError {
    pub section: &'static str,
    pub field: &'static str,
    pub value: f64,
    pub time: f64,
    #[source]
    pub reason: ConstraintError,
}

/// Errors that can occur while resolving parameters at a query time.
#[derive(Debug, Error)]
pub enum ParamsError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("`{field}` could not be evaluated at t = {time}")]
    Interpolation {
        field: &'static str,
        time: f64,
        #[source]
        source: InterpError,
    },
}

impl ParamsError {
    /// Returns the validation failure, if that is what this error is.
    #[must_use]
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ParamsError::Validation(err) => Some(err),
            _ => None,
        }
    }
}
