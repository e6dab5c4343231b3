use anyhow::Context;
use std::path::{Path, PathBuf};
use topoflow_cloud::{GraphOptions, ResourceGraph};
use topoflow_config::{ConfigError, TopologyConfig};
use topoflow_core::TopologyDescriptor;

/// Planner inputs gathered from the command line
#[derive(Debug, Clone, Default)]
pub struct Inputs {
    pub config: Option<PathBuf>,
    pub vpc_cidr: Option<String>,
    pub zones: Vec<String>,
    pub zone_cap: Option<usize>,
}

impl Inputs {
    /// CIDR and zones are both given on the command line
    fn is_complete(&self) -> bool {
        self.vpc_cidr.is_some() && !self.zones.is_empty()
    }
}

/// Configuration the command runs with
pub struct Loaded {
    pub config: TopologyConfig,

    /// None when everything came from the command line
    pub source: Option<PathBuf>,
}

/// Load the configuration file and apply command-line overrides
///
/// Without a config file, the command line must supply both the CIDR and
/// the zones.
pub fn load(inputs: &Inputs) -> anyhow::Result<Loaded> {
    let source = match &inputs.config {
        Some(path) => Some(path.clone()),
        None => match topoflow_config::find_config_file() {
            Ok(path) => Some(path),
            Err(ConfigError::ConfigFileNotFound) if inputs.is_complete() => {
                tracing::debug!("No configuration file, using command-line inputs only");
                None
            }
            Err(e) => return Err(e.into()),
        },
    };

    let mut config = match &source {
        Some(path) => read_config(path)?,
        None => TopologyConfig::default(),
    };

    if let Some(cidr) = &inputs.vpc_cidr {
        config.network.vpc_cidr_block = Some(cidr.clone());
    }
    if !inputs.zones.is_empty() {
        // `--zones ""` means no zones, not one unnamed zone
        config.network.zones = inputs
            .zones
            .iter()
            .map(|zone| zone.trim())
            .filter(|zone| !zone.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(cap) = inputs.zone_cap {
        config.network.zone_cap = cap;
    }

    Ok(Loaded { config, source })
}

fn read_config(path: &Path) -> anyhow::Result<TopologyConfig> {
    tracing::debug!(path = %path.display(), "Loading configuration");
    topoflow_config::load_config(path)
        .with_context(|| format!("Failed to load {}", path.display()))
}

pub fn plan(config: &TopologyConfig) -> anyhow::Result<TopologyDescriptor> {
    config.plan().context("Failed to plan topology")
}

pub fn graph_options(config: &TopologyConfig) -> GraphOptions {
    GraphOptions {
        project: config.project_name().to_string(),
        tags: config.tags.clone(),
    }
}

pub fn build_graph(
    config: &TopologyConfig,
    topology: &TopologyDescriptor,
) -> anyhow::Result<ResourceGraph> {
    ResourceGraph::from_topology(topology, &graph_options(config))
        .context("Failed to build resource graph")
}

/// Parse `KEY=VALUE`
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
