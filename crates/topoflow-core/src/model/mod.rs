//! Topology data model
//!
//! Address blocks, zones and the descriptor the planner produces.

mod network;
mod topology;
mod zone;

pub use network::{NetworkBlock, SUBNET_MASK};
pub use topology::{
    AssociationSpec, InternetGatewaySpec, RouteSpec, RouteTableSpec, RouteTarget, SubnetKey,
    SubnetSpec, Tier, TopologyDescriptor, VpcSpec,
};
pub use zone::AvailabilityZone;
