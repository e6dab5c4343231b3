use crate::error::{PlanError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Availability zone identifier (e.g. `us-east-1a`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AvailabilityZone {
    name: String,
}

impl AvailabilityZone {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PlanError::invalid("availability zone name is empty"));
        }
        Ok(Self {
            name: trimmed.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse a list of zone names, keeping their order
    pub fn parse_list<S: AsRef<str>>(names: &[S]) -> Result<Vec<Self>> {
        names.iter().map(|n| Self::new(n.as_ref())).collect()
    }
}

impl fmt::Display for AvailabilityZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl AsRef<str> for AvailabilityZone {
    fn as_ref(&self) -> &str {
        &self.name
    }
}
