//! Stack outputs exported to consumers

use crate::error::Result;
use crate::graph::{Property, Reference, ResourceKey};
use crate::state::ResolvedResources;
use topoflow_core::{Tier, TopologyDescriptor};

/// Named values other stacks read after apply
#[derive(Debug, Clone, PartialEq)]
pub struct StackOutputs {
    outputs: Vec<(String, Property)>,
}

impl StackOutputs {
    /// `vpcId`, `publicSubnetIds`, `privateSubnetIds`, `internetGatewayId`,
    /// `publicRouteTableId`, `privateRouteTableId`
    pub fn from_topology(topology: &TopologyDescriptor) -> Self {
        let subnet_ids = |tier: Tier| {
            Property::List(
                topology
                    .subnets_in(tier)
                    .map(|s| Property::id_of(ResourceKey::subnet(s.key())))
                    .collect(),
            )
        };

        Self {
            outputs: vec![
                ("vpcId".to_string(), Property::id_of(ResourceKey::vpc())),
                ("publicSubnetIds".to_string(), subnet_ids(Tier::Public)),
                ("privateSubnetIds".to_string(), subnet_ids(Tier::Private)),
                (
                    "internetGatewayId".to_string(),
                    Property::id_of(ResourceKey::internet_gateway()),
                ),
                (
                    "publicRouteTableId".to_string(),
                    Property::id_of(ResourceKey::route_table(Tier::Public)),
                ),
                (
                    "privateRouteTableId".to_string(),
                    Property::id_of(ResourceKey::route_table(Tier::Private)),
                ),
            ],
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.outputs.iter().map(|(name, _)| name.as_str()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.outputs.iter().find(|(n, _)| n == name).map(|(_, p)| p)
    }

    pub fn references(&self) -> Vec<&Reference> {
        self.outputs.iter().flat_map(|(_, p)| p.references()).collect()
    }

    /// Outputs with references shown as `${kind:name.attribute}`
    pub fn preview(&self) -> serde_json::Map<String, serde_json::Value> {
        self.outputs
            .iter()
            .map(|(name, p)| (name.clone(), p.preview()))
            .collect()
    }

    /// Concrete output values; every referenced resource must exist
    pub fn resolve(
        &self,
        resolved: &ResolvedResources,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let mut values = serde_json::Map::new();
        for (name, property) in &self.outputs {
            values.insert(name.clone(), property.resolve(resolved)?);
        }
        Ok(values)
    }
}
