//! Planner error types

use thiserror::Error;

/// Errors raised while planning a topology.
///
/// Both variants are fatal: no partial topology is ever returned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Insufficient availability zones: at least one zone is required")]
    InsufficientZones,
}

impl PlanError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        PlanError::InvalidConfiguration(message.into())
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
