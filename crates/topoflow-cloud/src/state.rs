//! Live state of created resources
//!
//! Nothing here is persisted. A [`ResolvedResources`] only lives for one
//! apply run and is what turns graph references into concrete values.

use crate::graph::{Reference, ResourceKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// State of a single created resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceState {
    /// Provider-assigned identifier
    pub id: String,

    pub key: ResourceKey,

    /// Attributes reported by the provisioner
    pub attributes: BTreeMap<String, serde_json::Value>,

    pub created_at: DateTime<Utc>,
}

impl ResourceState {
    pub fn new(id: impl Into<String>, key: ResourceKey) -> Self {
        Self {
            id: id.into(),
            key,
            attributes: BTreeMap::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(key.into(), value);
        self
    }

    /// Attribute value; `id` is always available
    pub fn attribute(&self, name: &str) -> Option<serde_json::Value> {
        if name == "id" {
            return Some(serde_json::Value::String(self.id.clone()));
        }
        self.attributes.get(name).cloned()
    }
}

/// Resources created so far, by key
#[derive(Debug, Clone, Default)]
pub struct ResolvedResources {
    resources: BTreeMap<ResourceKey, ResourceState>,
}

impl ResolvedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, state: ResourceState) {
        self.resources.insert(state.key.clone(), state);
    }

    pub fn get(&self, key: &ResourceKey) -> Option<&ResourceState> {
        self.resources.get(key)
    }

    pub fn contains(&self, key: &ResourceKey) -> bool {
        self.resources.contains_key(key)
    }

    /// Live value behind a reference, if its resource exists
    pub fn attribute(&self, reference: &Reference) -> Option<serde_json::Value> {
        self.get(&reference.key)
            .and_then(|state| state.attribute(&reference.attribute))
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ResourceKey, &ResourceState)> {
        self.resources.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_attribute() {
        let state = ResourceState::new("vpc-00000001", ResourceKey::vpc())
            .with_attribute("cidr_block", json!("10.0.0.0/16"));

        assert_eq!(state.attribute("id"), Some(json!("vpc-00000001")));
        assert_eq!(state.attribute("cidr_block"), Some(json!("10.0.0.0/16")));
        assert_eq!(state.attribute("arn"), None);
    }

    #[test]
    fn test_resolve_reference() {
        let mut resolved = ResolvedResources::new();
        assert!(resolved.attribute(&Reference::id(ResourceKey::vpc())).is_none());

        resolved.insert(ResourceState::new("vpc-00000001", ResourceKey::vpc()));
        assert_eq!(
            resolved.attribute(&Reference::id(ResourceKey::vpc())),
            Some(json!("vpc-00000001"))
        );
        assert_eq!(resolved.len(), 1);
    }
}
