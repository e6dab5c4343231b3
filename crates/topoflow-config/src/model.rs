//! Typed configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use topoflow_core::{PlanError, TopologyDescriptor, plan_from_parts};

pub const DEFAULT_PROVIDER: &str = "aws";
pub const DEFAULT_PROJECT: &str = "topoflow";

/// Whole configuration file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Project name, used as the `Name` tag prefix
    pub project: Option<String>,

    pub provider: ProviderConfig,

    pub network: NetworkConfig,

    /// Tags applied to every resource
    pub tags: BTreeMap<String, String>,
}

impl TopologyConfig {
    pub fn project_name(&self) -> &str {
        self.project.as_deref().unwrap_or(DEFAULT_PROJECT)
    }

    /// Run the planner on the configured network
    ///
    /// A missing `vpcCidrBlock` is an invalid configuration.
    pub fn plan(&self) -> Result<TopologyDescriptor, PlanError> {
        let cidr = self.network.vpc_cidr_block.as_deref().ok_or_else(|| {
            PlanError::InvalidConfiguration("vpcCidrBlock is required".to_string())
        })?;
        plan_from_parts(cidr, &self.network.zones, self.network.zone_cap)
    }
}

/// Provider client settings
///
/// Passed through untouched; the planner never reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider name (aws, ...)
    pub name: String,

    pub region: Option<String>,

    pub profile: Option<String>,

    /// Provider-specific extras
    pub extra: BTreeMap<String, String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER.to_string(),
            region: None,
            profile: None,
            extra: BTreeMap::new(),
        }
    }
}

/// Planner inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    pub vpc_cidr_block: Option<String>,

    /// Zones in provider order
    pub zones: Vec<String>,

    pub zone_cap: usize,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            vpc_cidr_block: None,
            zones: Vec::new(),
            zone_cap: topoflow_core::DEFAULT_ZONE_CAP,
        }
    }
}
