//! Provisioner seam
//!
//! A [`Provisioner`] creates one resource from fully resolved properties.
//! Real provider clients live outside this crate; [`DryRunProvisioner`]
//! fabricates identifiers so a whole topology can be simulated offline.

use crate::error::Result;
use crate::graph::{ResourceKey, ResourceKind};
use crate::state::ResourceState;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Request to create one resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateRequest {
    pub key: ResourceKey,

    /// Properties with every reference replaced by its live value
    pub properties: serde_json::Map<String, serde_json::Value>,
}

impl CreateRequest {
    pub fn kind(&self) -> ResourceKind {
        self.key.kind
    }
}

/// Creates resources on a provider
#[async_trait]
pub trait Provisioner: Send + Sync {
    /// Returns the provisioner name (e.g., "dry-run", "aws")
    fn name(&self) -> &str;

    /// Create a resource and report its live state
    async fn create(&self, request: &CreateRequest) -> Result<ResourceState>;
}

/// Offline provisioner with deterministic identifiers
///
/// Ids are `<prefix>-<8 digit counter>`, e.g. `vpc-00000001`. Request
/// properties are echoed back as attributes.
#[derive(Debug, Default)]
pub struct DryRunProvisioner {
    counter: AtomicU64,
}

impl DryRunProvisioner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of resources created so far
    pub fn created(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provisioner for DryRunProvisioner {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn create(&self, request: &CreateRequest) -> Result<ResourceState> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        let id = format!("{}-{:08}", request.kind().id_prefix(), n);
        tracing::debug!(key = %request.key, id = %id, "Dry-run create");

        let state = request
            .properties
            .iter()
            .fold(ResourceState::new(id, request.key.clone()), |state, (k, v)| {
                state.with_attribute(k.clone(), v.clone())
            });
        Ok(state)
    }
}
