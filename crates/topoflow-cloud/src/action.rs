//! Creation plan and apply results

use crate::error::Result;
use crate::graph::{Property, ResourceGraph, ResourceKey, ResourceKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One planned resource creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Action {
    /// Step (dependency layer) the action runs in, starting at 1
    pub step: usize,

    pub key: ResourceKey,

    pub depends_on: Vec<ResourceKey>,

    pub description: String,

    /// Properties with references shown as `${kind:name.attribute}`
    pub details: BTreeMap<String, serde_json::Value>,
}

impl Action {
    pub fn kind(&self) -> ResourceKind {
        self.key.kind
    }
}

/// Ordered list of creations for a resource graph
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Actions in topological order
    pub actions: Vec<Action>,

    pub steps: usize,
}

impl Plan {
    pub fn from_graph(graph: &ResourceGraph) -> Result<Self> {
        let layers = graph.layers()?;
        let mut actions = Vec::with_capacity(graph.len());

        for (i, layer) in layers.iter().enumerate() {
            for node in layer {
                actions.push(Action {
                    step: i + 1,
                    key: node.key.clone(),
                    depends_on: node.dependencies(),
                    description: describe(node.kind(), &node.key.name, &node.properties),
                    details: node
                        .properties
                        .iter()
                        .map(|(k, v)| (k.clone(), v.preview()))
                        .collect(),
                });
            }
        }

        Ok(Self {
            actions,
            steps: layers.len(),
        })
    }

    pub fn actions_by_kind(&self, kind: ResourceKind) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.kind() == kind).collect()
    }

    pub fn step(&self, step: usize) -> Vec<&Action> {
        self.actions.iter().filter(|a| a.step == step).collect()
    }

    pub fn summary(&self) -> PlanSummary {
        let mut per_kind = BTreeMap::new();
        for action in &self.actions {
            *per_kind.entry(action.kind()).or_insert(0) += 1;
        }
        PlanSummary {
            total: self.actions.len(),
            steps: self.steps,
            per_kind,
        }
    }
}

fn describe(kind: ResourceKind, name: &str, properties: &BTreeMap<String, Property>) -> String {
    let literal = |key: &str| {
        properties
            .get(key)
            .map(|p| p.preview())
            .and_then(|v| v.as_str().map(str::to_string))
    };

    match kind {
        ResourceKind::Subnet => match (literal("cidr_block"), literal("availability_zone")) {
            (Some(cidr), Some(zone)) => format!("Create subnet {} ({} in {})", name, cidr, zone),
            _ => format!("Create subnet {}", name),
        },
        ResourceKind::Vpc => match literal("cidr_block") {
            Some(cidr) => format!("Create vpc ({})", cidr),
            None => "Create vpc".to_string(),
        },
        other => format!("Create {} {}", other, name),
    }
}

/// Counts of a plan
#[derive(Debug, Clone)]
pub struct PlanSummary {
    pub total: usize,
    pub steps: usize,
    pub per_kind: BTreeMap<ResourceKind, usize>,
}

impl std::fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kinds: Vec<String> = self
            .per_kind
            .iter()
            .map(|(kind, count)| format!("{} {}", count, kind))
            .collect();
        write!(
            f,
            "{} resources in {} steps ({})",
            self.total,
            self.steps,
            kinds.join(", ")
        )
    }
}

/// Result of applying a plan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApplyResult {
    pub succeeded: Vec<ActionResult>,

    /// Failed and skipped actions
    pub failed: Vec<ActionResult>,

    /// Total execution time in milliseconds
    pub duration_ms: u64,
}

impl ApplyResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn add_success(&mut self, key: ResourceKey, message: String) {
        self.succeeded.push(ActionResult {
            key,
            success: true,
            message,
            error: None,
        });
    }

    pub fn add_failure(&mut self, key: ResourceKey, error: String) {
        self.failed.push(ActionResult {
            key,
            success: false,
            message: String::new(),
            error: Some(error),
        });
    }

    pub fn failure(&self, key: &ResourceKey) -> Option<&ActionResult> {
        self.failed.iter().find(|r| &r.key == key)
    }
}

/// Result of a single action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub key: ResourceKey,

    pub success: bool,

    pub message: String,

    pub error: Option<String>,
}
