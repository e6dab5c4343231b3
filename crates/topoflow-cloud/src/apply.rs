//! Layered apply of a resource graph

use crate::action::ApplyResult;
use crate::error::Result;
use crate::graph::{ResourceGraph, ResourceKey};
use crate::provisioner::{CreateRequest, Provisioner};
use crate::state::ResolvedResources;
use futures_util::future::join_all;
use std::collections::HashSet;
use tracing::{info, warn};

/// Outcome of [`apply`]
#[derive(Debug, Clone)]
pub struct ApplyOutcome {
    pub result: ApplyResult,
    pub resolved: ResolvedResources,
}

/// Create every resource of `graph`, one dependency layer at a time
///
/// Nodes within a layer are created concurrently. A failed node is not
/// retried; everything depending on it is skipped. Only graph errors
/// (unknown dependency, cycle) abort the run.
pub async fn apply<P>(graph: &ResourceGraph, provisioner: &P) -> Result<ApplyOutcome>
where
    P: Provisioner + ?Sized,
{
    let start = std::time::Instant::now();
    let layers = graph.layers()?;

    let mut result = ApplyResult::new();
    let mut resolved = ResolvedResources::new();
    let mut failed: HashSet<ResourceKey> = HashSet::new();

    info!(
        provisioner = provisioner.name(),
        resources = graph.len(),
        steps = layers.len(),
        "Applying resource graph"
    );

    for (step, layer) in layers.iter().enumerate() {
        let mut requests = Vec::with_capacity(layer.len());

        for node in layer {
            if let Some(dep) = node.dependencies().into_iter().find(|d| failed.contains(d)) {
                warn!(key = %node.key, dependency = %dep, "Skipping resource");
                result.add_failure(
                    node.key.clone(),
                    format!("skipped: dependency {} failed", dep),
                );
                failed.insert(node.key.clone());
                continue;
            }

            match node.resolve_properties(&resolved) {
                Ok(properties) => requests.push(CreateRequest {
                    key: node.key.clone(),
                    properties,
                }),
                Err(e) => {
                    result.add_failure(node.key.clone(), e.to_string());
                    failed.insert(node.key.clone());
                }
            }
        }

        let outcomes = join_all(requests.iter().map(|r| provisioner.create(r))).await;

        for (request, outcome) in requests.iter().zip(outcomes) {
            match outcome {
                Ok(state) => {
                    info!(step = step + 1, key = %request.key, id = %state.id, "Created");
                    result.add_success(request.key.clone(), format!("created {}", state.id));
                    resolved.insert(state);
                }
                Err(e) => {
                    warn!(key = %request.key, error = %e, "Create failed");
                    result.add_failure(request.key.clone(), e.to_string());
                    failed.insert(request.key.clone());
                }
            }
        }
    }

    result.duration_ms = start.elapsed().as_millis() as u64;
    Ok(ApplyOutcome { result, resolved })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CloudError;
    use crate::graph::{GraphOptions, ResourceKind, Reference};
    use crate::provisioner::DryRunProvisioner;
    use crate::state::ResourceState;
    use async_trait::async_trait;
    use serde_json::json;
    use topoflow_core::{Tier, plan_from_parts};

    fn graph_for(zones: &[&str]) -> ResourceGraph {
        let topology = plan_from_parts("10.0.0.0/16", zones, 3).unwrap();
        ResourceGraph::from_topology(&topology, &GraphOptions::default()).unwrap()
    }

    /// Delegates to dry-run but fails for one kind
    struct FailingProvisioner {
        inner: DryRunProvisioner,
        fail: ResourceKind,
    }

    #[async_trait]
    impl Provisioner for FailingProvisioner {
        fn name(&self) -> &str {
            "failing"
        }

        async fn create(&self, request: &CreateRequest) -> Result<ResourceState> {
            if request.kind() == self.fail {
                return Err(CloudError::Provisioning(format!("{} quota exceeded", request.key)));
            }
            self.inner.create(request).await
        }
    }

    #[tokio::test]
    async fn test_dry_run_apply() {
        let graph = graph_for(&["a", "b", "c"]);
        let outcome = apply(&graph, &DryRunProvisioner::new()).await.unwrap();

        assert!(outcome.result.is_success());
        assert_eq!(outcome.result.succeeded.len(), 16);
        assert_eq!(outcome.resolved.len(), 16);
        assert_eq!(
            outcome.resolved.get(&ResourceKey::vpc()).unwrap().id,
            "vpc-00000001"
        );
    }

    #[tokio::test]
    async fn test_references_resolved_before_create() {
        let graph = graph_for(&["a"]);
        let outcome = apply(&graph, &DryRunProvisioner::new()).await.unwrap();
        let resolved = &outcome.resolved;

        let vpc_id = resolved.get(&ResourceKey::vpc()).unwrap().id.clone();
        let igw_id = resolved.get(&ResourceKey::internet_gateway()).unwrap().id.clone();

        let table = resolved.get(&ResourceKey::route_table(Tier::Public)).unwrap();
        assert_eq!(table.attribute("vpc_id"), Some(json!(vpc_id)));
        assert_eq!(
            table.attribute("routes"),
            Some(json!([{ "cidr_block": "0.0.0.0/0", "gateway_id": igw_id }]))
        );

        let association = resolved
            .get(&ResourceKey::new(
                ResourceKind::RouteTableAssociation,
                "public-subnet-0-association",
            ))
            .unwrap();
        assert_eq!(
            association.attribute("route_table_id"),
            resolved.attribute(&Reference::id(ResourceKey::route_table(Tier::Public)))
        );
    }

    #[tokio::test]
    async fn test_failure_skips_dependents() {
        let graph = graph_for(&["a", "b"]);
        let provisioner = FailingProvisioner {
            inner: DryRunProvisioner::new(),
            fail: ResourceKind::InternetGateway,
        };
        let outcome = apply(&graph, &provisioner).await.unwrap();
        let result = &outcome.result;

        assert!(!result.is_success());

        let igw = result.failure(&ResourceKey::internet_gateway()).unwrap();
        assert!(igw.error.as_ref().unwrap().contains("quota exceeded"));

        let public_table = result
            .failure(&ResourceKey::route_table(Tier::Public))
            .unwrap();
        assert_eq!(
            public_table.error.as_deref(),
            Some("skipped: dependency internet-gateway:internet-gateway failed")
        );

        // public associations are skipped, private ones still created
        let public_assoc = ResourceKey::new(
            ResourceKind::RouteTableAssociation,
            "public-subnet-1-association",
        );
        let private_assoc = ResourceKey::new(
            ResourceKind::RouteTableAssociation,
            "private-subnet-1-association",
        );
        assert!(result.failure(&public_assoc).is_some());
        assert!(outcome.resolved.contains(&private_assoc));

        // 1 igw + 1 table + 2 associations
        assert_eq!(result.failed.len(), 4);
        assert_eq!(result.succeeded.len(), 8);
    }

    #[tokio::test]
    async fn test_cycle_aborts() {
        use crate::graph::{Property, ResourceNode};

        let a = ResourceKey::new(ResourceKind::Subnet, "a");
        let b = ResourceKey::new(ResourceKind::Subnet, "b");
        let mut graph = ResourceGraph::new();
        graph
            .add(ResourceNode::new(a.clone()).with("peer", Property::id_of(b.clone())))
            .unwrap();
        graph
            .add(ResourceNode::new(b).with("peer", Property::id_of(a)))
            .unwrap();

        let err = apply(&graph, &DryRunProvisioner::new()).await.unwrap_err();
        assert!(matches!(err, CloudError::CircularDependency(_)));
    }
}
