//! Topology descriptor types
//!
//! Everything here is plain, immutable planner output. Consumers turn each
//! entry into one resource-creation call.

use super::{AvailabilityZone, NetworkBlock};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Subnet tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Internet-reachable
    Public,
    /// Internal only
    Private,
}

impl Tier {
    pub const ALL: [Tier; 2] = [Tier::Public, Tier::Private];

    /// Third octet of the `index`-th subnet of this tier
    pub fn third_octet(self, index: usize) -> usize {
        match self {
            Tier::Public => 2 * index,
            Tier::Private => 2 * index + 1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Public => "public",
            Tier::Private => "private",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a subnet: `(tier, index)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SubnetKey {
    pub tier: Tier,
    pub index: usize,
}

impl fmt::Display for SubnetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-subnet-{}", self.tier, self.index)
    }
}

/// The VPC itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcSpec {
    pub cidr: NetworkBlock,
}

/// The internet gateway attached to the VPC
///
/// Provisioned externally; the descriptor only records that one is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternetGatewaySpec {}

/// One subnet to allocate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubnetSpec {
    /// 0-based index within the tier
    pub index: usize,
    pub tier: Tier,
    pub zone: AvailabilityZone,
    pub cidr: NetworkBlock,
    pub auto_assign_public_ip: bool,
}

impl SubnetSpec {
    pub fn key(&self) -> SubnetKey {
        SubnetKey {
            tier: self.tier,
            index: self.index,
        }
    }

    /// Idempotent resource name, e.g. `public-subnet-0`
    pub fn name(&self) -> String {
        self.key().to_string()
    }
}

/// Where a route sends traffic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTarget {
    InternetGateway,
}

/// A single route entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSpec {
    pub destination: NetworkBlock,
    pub target: RouteTarget,
}

impl RouteSpec {
    /// `0.0.0.0/0 -> internet gateway`
    pub fn default_to_internet() -> Self {
        Self {
            destination: NetworkBlock::any(),
            target: RouteTarget::InternetGateway,
        }
    }
}

/// One route table per tier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTableSpec {
    pub tier: Tier,
    pub default_route: Option<RouteSpec>,
}

impl RouteTableSpec {
    pub fn for_tier(tier: Tier) -> Self {
        let default_route = match tier {
            Tier::Public => Some(RouteSpec::default_to_internet()),
            Tier::Private => None,
        };
        Self {
            tier,
            default_route,
        }
    }

    /// All routes of the table
    pub fn routes(&self) -> Vec<&RouteSpec> {
        self.default_route.iter().collect()
    }

    /// Idempotent resource name, e.g. `public-route-table`
    pub fn name(&self) -> String {
        format!("{}-route-table", self.tier)
    }
}

/// Binding of a subnet to its tier's route table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSpec {
    pub subnet_index: usize,
    pub subnet_tier: Tier,
    pub table_tier: Tier,
}

impl AssociationSpec {
    pub fn subnet_key(&self) -> SubnetKey {
        SubnetKey {
            tier: self.subnet_tier,
            index: self.subnet_index,
        }
    }

    pub fn name(&self) -> String {
        format!("{}-association", self.subnet_key())
    }
}

/// Aggregate planner output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyDescriptor {
    pub vpc: VpcSpec,
    pub internet_gateway: InternetGatewaySpec,

    /// Zones actually used, in input order
    pub zones: Vec<AvailabilityZone>,

    /// `public-0, private-0, public-1, private-1, ...`
    pub subnets: Vec<SubnetSpec>,

    pub public_route_table: RouteTableSpec,
    pub private_route_table: RouteTableSpec,

    /// Same order as `subnets`
    pub associations: Vec<AssociationSpec>,
}

impl TopologyDescriptor {
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    pub fn route_table(&self, tier: Tier) -> &RouteTableSpec {
        match tier {
            Tier::Public => &self.public_route_table,
            Tier::Private => &self.private_route_table,
        }
    }

    pub fn route_tables(&self) -> [&RouteTableSpec; 2] {
        [&self.public_route_table, &self.private_route_table]
    }

    pub fn subnets_in(&self, tier: Tier) -> impl Iterator<Item = &SubnetSpec> {
        self.subnets.iter().filter(move |s| s.tier == tier)
    }

    pub fn public_subnets(&self) -> Vec<&SubnetSpec> {
        self.subnets_in(Tier::Public).collect()
    }

    pub fn private_subnets(&self) -> Vec<&SubnetSpec> {
        self.subnets_in(Tier::Private).collect()
    }

    pub fn subnet(&self, key: SubnetKey) -> Option<&SubnetSpec> {
        self.subnets.iter().find(|s| s.key() == key)
    }

    /// Every association bound to the given subnet
    pub fn associations_for(&self, key: SubnetKey) -> Vec<&AssociationSpec> {
        self.associations
            .iter()
            .filter(|a| a.subnet_key() == key)
            .collect()
    }

    /// Canonical JSON form; identical inputs give identical bytes
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
