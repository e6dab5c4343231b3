//! Explicit resource dependency graph
//!
//! Every provider resource the topology needs becomes a [`ResourceNode`].
//! Properties that need another resource's live attribute hold a typed
//! [`Reference`]; the edges of the graph are exactly those references.
//! Ordering is a deterministic topological sort, so re-planning the same
//! topology always yields the same creation order.

use crate::error::{CloudError, Result};
use crate::state::ResolvedResources;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt;
use topoflow_core::{AssociationSpec, SubnetKey, SubnetSpec, Tier, TopologyDescriptor};
use tracing::debug;

/// Kind of provider resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    Vpc,
    InternetGateway,
    Subnet,
    RouteTable,
    RouteTableAssociation,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::InternetGateway => "internet-gateway",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTable => "route-table",
            ResourceKind::RouteTableAssociation => "route-table-association",
        }
    }

    /// Prefix of provider identifiers for this kind
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ResourceKind::Vpc => "vpc",
            ResourceKind::InternetGateway => "igw",
            ResourceKind::Subnet => "subnet",
            ResourceKind::RouteTable => "rtb",
            ResourceKind::RouteTableAssociation => "rtbassoc",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable identity of a resource: kind plus positional name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    pub kind: ResourceKind,
    pub name: String,
}

impl ResourceKey {
    pub fn new(kind: ResourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    pub fn vpc() -> Self {
        Self::new(ResourceKind::Vpc, "vpc")
    }

    pub fn internet_gateway() -> Self {
        Self::new(ResourceKind::InternetGateway, "internet-gateway")
    }

    pub fn subnet(key: SubnetKey) -> Self {
        Self::new(ResourceKind::Subnet, key.to_string())
    }

    pub fn route_table(tier: Tier) -> Self {
        Self::new(ResourceKind::RouteTable, format!("{}-route-table", tier))
    }

    pub fn association(key: SubnetKey) -> Self {
        Self::new(
            ResourceKind::RouteTableAssociation,
            format!("{}-association", key),
        )
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.name)
    }
}

/// A live attribute of another resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Reference {
    pub key: ResourceKey,
    pub attribute: String,
}

impl Reference {
    pub fn new(key: ResourceKey, attribute: impl Into<String>) -> Self {
        Self {
            key,
            attribute: attribute.into(),
        }
    }

    /// Reference to the provider id of `key`
    pub fn id(key: ResourceKey) -> Self {
        Self::new(key, "id")
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${{{}.{}}}", self.key, self.attribute)
    }
}

/// Resource property value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Literal(serde_json::Value),
    Reference(Reference),
    Object(BTreeMap<String, Property>),
    List(Vec<Property>),
}

impl Property {
    pub fn literal(value: impl Into<serde_json::Value>) -> Self {
        Property::Literal(value.into())
    }

    pub fn id_of(key: ResourceKey) -> Self {
        Property::Reference(Reference::id(key))
    }

    pub fn tags(tags: &BTreeMap<String, String>) -> Self {
        Property::Object(
            tags.iter()
                .map(|(k, v)| (k.clone(), Property::literal(v.as_str())))
                .collect(),
        )
    }

    /// Every reference inside this property, depth first
    pub fn references(&self) -> Vec<&Reference> {
        let mut found = Vec::new();
        self.collect_references(&mut found);
        found
    }

    fn collect_references<'a>(&'a self, found: &mut Vec<&'a Reference>) {
        match self {
            Property::Literal(_) => {}
            Property::Reference(r) => found.push(r),
            Property::Object(map) => map.values().for_each(|p| p.collect_references(found)),
            Property::List(items) => items.iter().for_each(|p| p.collect_references(found)),
        }
    }

    /// Replace every reference by its live value
    pub fn resolve(&self, resolved: &ResolvedResources) -> Result<serde_json::Value> {
        match self {
            Property::Literal(value) => Ok(value.clone()),
            Property::Reference(r) => resolved
                .attribute(r)
                .ok_or_else(|| CloudError::UnresolvedReference(r.to_string())),
            Property::Object(map) => {
                let mut object = serde_json::Map::new();
                for (key, value) in map {
                    object.insert(key.clone(), value.resolve(resolved)?);
                }
                Ok(serde_json::Value::Object(object))
            }
            Property::List(items) => items
                .iter()
                .map(|p| p.resolve(resolved))
                .collect::<Result<Vec<_>>>()
                .map(serde_json::Value::Array),
        }
    }

    /// JSON view with references rendered as `${kind:name.attribute}`
    pub fn preview(&self) -> serde_json::Value {
        match self {
            Property::Literal(value) => value.clone(),
            Property::Reference(r) => serde_json::Value::String(r.to_string()),
            Property::Object(map) => serde_json::Value::Object(
                map.iter().map(|(k, v)| (k.clone(), v.preview())).collect(),
            ),
            Property::List(items) => {
                serde_json::Value::Array(items.iter().map(Property::preview).collect())
            }
        }
    }
}

/// Typed dependency edge: `dependent.property` needs `dependency.attribute`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub dependent: ResourceKey,
    pub property: String,
    pub dependency: ResourceKey,
    pub attribute: String,
}

/// One resource to create
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceNode {
    pub key: ResourceKey,
    pub properties: BTreeMap<String, Property>,
}

impl ResourceNode {
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            properties: BTreeMap::new(),
        }
    }

    pub fn with(mut self, name: impl Into<String>, property: Property) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.key.kind
    }

    pub fn edges(&self) -> Vec<Edge> {
        self.properties
            .iter()
            .flat_map(|(property, value)| {
                value.references().into_iter().map(move |r| Edge {
                    dependent: self.key.clone(),
                    property: property.clone(),
                    dependency: r.key.clone(),
                    attribute: r.attribute.clone(),
                })
            })
            .collect()
    }

    /// Distinct resources this node depends on, sorted
    pub fn dependencies(&self) -> Vec<ResourceKey> {
        let unique: BTreeSet<ResourceKey> = self.edges().into_iter().map(|e| e.dependency).collect();
        unique.into_iter().collect()
    }

    /// Properties with references replaced by live values
    pub fn resolve_properties(
        &self,
        resolved: &ResolvedResources,
    ) -> Result<serde_json::Map<String, serde_json::Value>> {
        let mut object = serde_json::Map::new();
        for (name, property) in &self.properties {
            object.insert(name.clone(), property.resolve(resolved)?);
        }
        Ok(object)
    }
}

/// Naming and tagging options for [`ResourceGraph::from_topology`]
#[derive(Debug, Clone)]
pub struct GraphOptions {
    /// Prefix of every `Name` tag
    pub project: String,

    /// Tags added to every taggable resource
    pub tags: BTreeMap<String, String>,
}

impl Default for GraphOptions {
    fn default() -> Self {
        Self {
            project: "topoflow".to_string(),
            tags: BTreeMap::new(),
        }
    }
}

impl GraphOptions {
    fn tags_for(&self, name: &str, extra: &[(&str, &str)]) -> Property {
        let mut tags = self.tags.clone();
        for (k, v) in extra {
            tags.insert(k.to_string(), v.to_string());
        }
        tags.insert("Name".to_string(), format!("{}-{}", self.project, name));
        Property::tags(&tags)
    }
}

/// Directed acyclic graph of resources, in insertion order
#[derive(Debug, Clone, Default)]
pub struct ResourceGraph {
    nodes: Vec<ResourceNode>,
    index: HashMap<ResourceKey, usize>,
}

impl ResourceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the network graph for a planned topology
    pub fn from_topology(topology: &TopologyDescriptor, options: &GraphOptions) -> Result<Self> {
        let mut graph = Self::new();
        let vpc = ResourceKey::vpc();
        let igw = ResourceKey::internet_gateway();

        graph.add(
            ResourceNode::new(vpc.clone())
                .with("cidr_block", Property::literal(topology.vpc.cidr.to_string()))
                .with("tags", options.tags_for("vpc", &[])),
        )?;

        graph.add(
            ResourceNode::new(igw.clone())
                .with("vpc_id", Property::id_of(vpc.clone()))
                .with("tags", options.tags_for("internet-gateway", &[])),
        )?;

        for subnet in &topology.subnets {
            graph.add(subnet_node(subnet, &vpc, options))?;
        }

        for table in topology.route_tables() {
            let key = ResourceKey::route_table(table.tier);
            let routes: Vec<Property> = table
                .routes()
                .into_iter()
                .map(|route| {
                    Property::Object(BTreeMap::from([
                        (
                            "cidr_block".to_string(),
                            Property::literal(route.destination.to_string()),
                        ),
                        ("gateway_id".to_string(), Property::id_of(igw.clone())),
                    ]))
                })
                .collect();

            graph.add(
                ResourceNode::new(key)
                    .with("vpc_id", Property::id_of(vpc.clone()))
                    .with("routes", Property::List(routes))
                    .with(
                        "tags",
                        options.tags_for(&table.name(), &[("Tier", table.tier.as_str())]),
                    ),
            )?;
        }

        for association in &topology.associations {
            graph.add(association_node(association))?;
        }

        debug!(nodes = graph.len(), "Built resource graph");
        Ok(graph)
    }

    /// Add a node; keys must be unique
    pub fn add(&mut self, node: ResourceNode) -> Result<()> {
        if self.index.contains_key(&node.key) {
            return Err(CloudError::DuplicateResource(node.key.to_string()));
        }
        self.index.insert(node.key.clone(), self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&ResourceNode> {
        self.index.get(key).map(|&i| &self.nodes[i])
    }

    pub fn nodes(&self) -> &[ResourceNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn by_kind(&self, kind: ResourceKind) -> Vec<&ResourceNode> {
        self.nodes.iter().filter(|n| n.kind() == kind).collect()
    }

    /// All typed edges of the graph
    pub fn edges(&self) -> Vec<Edge> {
        self.nodes.iter().flat_map(|n| n.edges()).collect()
    }

    /// Nodes ordered so that every node follows its dependencies
    ///
    /// Ties are broken by insertion order.
    pub fn topological_order(&self) -> Result<Vec<&ResourceNode>> {
        let dependencies = self.dependency_indices()?;

        let mut remaining: Vec<usize> = dependencies.iter().map(|d| d.len()).collect();
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for (node, deps) in dependencies.iter().enumerate() {
            for &dep in deps {
                dependents[dep].push(node);
            }
        }

        let mut ready: BTreeSet<usize> = remaining
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(i, _)| i)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(next) = ready.pop_first() {
            order.push(&self.nodes[next]);
            for &dependent in &dependents[next] {
                remaining[dependent] -= 1;
                if remaining[dependent] == 0 {
                    ready.insert(dependent);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let stuck: Vec<String> = remaining
                .iter()
                .enumerate()
                .filter(|(_, count)| **count > 0)
                .map(|(i, _)| self.nodes[i].key.to_string())
                .collect();
            return Err(CloudError::CircularDependency(stuck.join(", ")));
        }

        Ok(order)
    }

    /// Nodes grouped by dependency depth
    ///
    /// Layer `n` only depends on layers `< n`, so the nodes of one layer can
    /// be created concurrently.
    ///
    /// For a planned topology this gives four layers: the VPC; then the
    /// gateway, every subnet and the private route table (it has no routes,
    /// so it waits for nothing but the VPC); then the public route table,
    /// whose default route needs the gateway; then the associations.
    pub fn layers(&self) -> Result<Vec<Vec<&ResourceNode>>> {
        let order = self.topological_order()?;
        let mut depth: HashMap<&ResourceKey, usize> = HashMap::new();
        let mut layers: Vec<Vec<&ResourceNode>> = Vec::new();

        for node in order {
            let level = node
                .dependencies()
                .iter()
                .filter_map(|dep| depth.get(dep))
                .map(|d| d + 1)
                .max()
                .unwrap_or(0);
            depth.insert(&node.key, level);

            if layers.len() <= level {
                layers.resize_with(level + 1, Vec::new);
            }
            layers[level].push(node);
        }

        for layer in &mut layers {
            layer.sort_by_key(|n| self.index[&n.key]);
        }

        Ok(layers)
    }

    fn dependency_indices(&self) -> Result<Vec<Vec<usize>>> {
        self.nodes
            .iter()
            .map(|node| {
                node.dependencies()
                    .into_iter()
                    .map(|dep| {
                        self.index
                            .get(&dep)
                            .copied()
                            .ok_or_else(|| CloudError::UnknownDependency {
                                resource: node.key.to_string(),
                                dependency: dep.to_string(),
                            })
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .collect()
    }
}

fn subnet_node(subnet: &SubnetSpec, vpc: &ResourceKey, options: &GraphOptions) -> ResourceNode {
    ResourceNode::new(ResourceKey::subnet(subnet.key()))
        .with("vpc_id", Property::id_of(vpc.clone()))
        .with("cidr_block", Property::literal(subnet.cidr.to_string()))
        .with("availability_zone", Property::literal(subnet.zone.name()))
        .with(
            "map_public_ip_on_launch",
            Property::literal(subnet.auto_assign_public_ip),
        )
        .with(
            "tags",
            options.tags_for(&subnet.name(), &[("Tier", subnet.tier.as_str())]),
        )
}

fn association_node(association: &AssociationSpec) -> ResourceNode {
    let subnet = association.subnet_key();
    ResourceNode::new(ResourceKey::association(subnet))
        .with("subnet_id", Property::id_of(ResourceKey::subnet(subnet)))
        .with(
            "route_table_id",
            Property::id_of(ResourceKey::route_table(association.table_tier)),
        )
}
