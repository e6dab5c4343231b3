//! Workload placement onto planned subnets
//!
//! Instances, load balancers and auto-scaling groups are not planned here,
//! but they need subnets. Callers pick the subnets through an explicit
//! [`Placement`] rather than indexing the subnet list directly.

use crate::error::PlanError;
use crate::model::{SubnetSpec, Tier, TopologyDescriptor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a workload is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "tier")]
pub enum Placement {
    /// First subnet of the tier (zone slot 0)
    Single(Tier),
    /// Every subnet of the tier, in index order
    Spread(Tier),
}

impl Placement {
    pub fn tier(&self) -> Tier {
        match self {
            Placement::Single(tier) | Placement::Spread(tier) => *tier,
        }
    }

    /// Subnets selected by this placement
    ///
    /// Never empty for a descriptor produced by the planner.
    pub fn select<'a>(&self, topology: &'a TopologyDescriptor) -> Vec<&'a SubnetSpec> {
        match self {
            Placement::Single(tier) => topology
                .subnets_in(*tier)
                .filter(|s| s.index == 0)
                .take(1)
                .collect(),
            Placement::Spread(tier) => {
                let mut subnets: Vec<&SubnetSpec> = topology.subnets_in(*tier).collect();
                subnets.sort_by_key(|s| s.index);
                subnets
            }
        }
    }
}

impl fmt::Display for Placement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Placement::Single(tier) => write!(f, "single:{}", tier),
            Placement::Spread(tier) => write!(f, "spread:{}", tier),
        }
    }
}

/// `<mode>:<tier>`, e.g. `single:public` or `spread:private`
impl FromStr for Placement {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            PlanError::invalid(format!(
                "invalid placement '{}' (expected single|spread:public|private)",
                s
            ))
        };

        let (mode, tier) = s.trim().split_once(':').ok_or_else(invalid)?;
        let tier = match tier {
            "public" => Tier::Public,
            "private" => Tier::Private,
            _ => return Err(invalid()),
        };

        match mode {
            "single" => Ok(Placement::Single(tier)),
            "spread" => Ok(Placement::Spread(tier)),
            _ => Err(invalid()),
        }
    }
}
