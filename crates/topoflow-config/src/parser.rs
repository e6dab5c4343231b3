//! KDL configuration parser
//!
//! ```kdl
//! project "pulumicloud"
//! provider "aws" {
//!     region "us-east-1"
//!     profile "default"
//! }
//! network {
//!     vpc-cidr-block "10.0.0.0/16"
//!     zones "us-east-1a" "us-east-1b" "us-east-1c"
//!     zone-cap 3
//! }
//! tags {
//!     Environment "dev"
//! }
//! ```

use crate::error::{ConfigError, Result};
use crate::model::{NetworkConfig, ProviderConfig, TopologyConfig};
use kdl::{KdlDocument, KdlNode, KdlValue};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Read and parse a configuration file
pub fn load_config(path: &Path) -> Result<TopologyConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!(path = %path.display(), "Parsing configuration");
    parse_config_str(&content)
}

/// Parse a configuration document
pub fn parse_config_str(content: &str) -> Result<TopologyConfig> {
    let doc: KdlDocument = content.parse()?;
    let mut config = TopologyConfig::default();

    for node in doc.nodes() {
        match node.name().value() {
            "project" => {
                config.project = first_string(node);
            }
            "provider" => {
                config.provider = parse_provider(node)?;
            }
            "network" => {
                config.network = parse_network(node)?;
            }
            "tags" => {
                config.tags = parse_string_map(node)?;
            }
            other => {
                warn!(node = %other, "Ignoring unknown configuration node");
            }
        }
    }

    Ok(config)
}

fn parse_provider(node: &KdlNode) -> Result<ProviderConfig> {
    let mut provider = ProviderConfig::default();
    if let Some(name) = first_string(node) {
        provider.name = name;
    }

    if let Some(children) = node.children() {
        for child in children.nodes() {
            match child.name().value() {
                "region" => provider.region = first_string(child),
                "profile" => provider.profile = first_string(child),
                other => {
                    if let Some(value) = first_string(child) {
                        provider.extra.insert(other.to_string(), value);
                    }
                }
            }
        }
    }

    Ok(provider)
}

fn parse_network(node: &KdlNode) -> Result<NetworkConfig> {
    let mut network = NetworkConfig::default();

    let Some(children) = node.children() else {
        return Ok(network);
    };

    for child in children.nodes() {
        match child.name().value() {
            "vpc-cidr-block" | "vpc_cidr_block" | "vpcCidrBlock" => {
                network.vpc_cidr_block = Some(require_string(child)?);
            }
            "zones" => {
                network.zones = all_strings(child)?;
            }
            "zone-cap" | "zone_cap" | "zoneCap" => {
                network.zone_cap = parse_zone_cap(child)?;
            }
            other => {
                warn!(node = %other, "Ignoring unknown network setting");
            }
        }
    }

    Ok(network)
}

fn parse_zone_cap(node: &KdlNode) -> Result<usize> {
    let key = node.name().value();
    let value = node
        .entries()
        .first()
        .map(|e| e.value())
        .ok_or_else(|| invalid(key, "expected an integer"))?;

    let cap = value
        .as_integer()
        .ok_or_else(|| invalid(key, format!("expected an integer, got {}", value)))?;

    usize::try_from(cap).map_err(|_| invalid(key, format!("must not be negative, got {}", cap)))
}

fn parse_string_map(node: &KdlNode) -> Result<BTreeMap<String, String>> {
    let mut map = BTreeMap::new();
    if let Some(children) = node.children() {
        for child in children.nodes() {
            map.insert(child.name().value().to_string(), require_string(child)?);
        }
    }
    Ok(map)
}

fn first_string(node: &KdlNode) -> Option<String> {
    node.entries()
        .first()
        .and_then(|e| e.value().as_string())
        .map(|s| s.to_string())
}

fn require_string(node: &KdlNode) -> Result<String> {
    first_string(node).ok_or_else(|| invalid(node.name().value(), "expected a string"))
}

fn all_strings(node: &KdlNode) -> Result<Vec<String>> {
    node.entries()
        .iter()
        .filter(|e| e.name().is_none())
        .map(|e| match e.value() {
            KdlValue::String(s) => Ok(s.clone()),
            other => Err(invalid(
                node.name().value(),
                format!("expected strings, got {}", other),
            )),
        })
        .collect()
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        message: message.into(),
    }
}
