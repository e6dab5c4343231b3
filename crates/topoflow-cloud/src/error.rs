//! Resource graph and provisioning error types

use thiserror::Error;

/// Resource graph, provisioning and template errors
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("Resource already exists in graph: {0}")]
    DuplicateResource(String),

    #[error("Resource {resource} depends on unknown resource {dependency}")]
    UnknownDependency {
        resource: String,
        dependency: String,
    },

    #[error("Circular dependency between: {0}")]
    CircularDependency(String),

    #[error("Reference not resolved yet: {0}")]
    UnresolvedReference(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Provisioning failed: {0}")]
    Provisioning(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CloudError>;
