//! TopoFlow Cloud
//!
//! Turns a planned topology into an explicit resource graph and drives its
//! creation through a pluggable provisioner.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │            topo CLI (plan/simulate)          │
//! └─────────────────┬────────────────────────────┘
//!                   │ TopologyDescriptor
//! ┌─────────────────▼────────────────────────────┐
//! │               topoflow-cloud                 │
//! │  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │ResourceGraph │─▶│ Plan (ordered steps) │  │
//! │  └──────┬───────┘  └──────────────────────┘  │
//! │         │ apply (layer by layer)             │
//! │  ┌──────▼───────────────────────────────┐    │
//! │  │   trait Provisioner { create(..) }   │    │
//! │  └──────────────────────────────────────┘    │
//! │  ┌──────────────┐  ┌──────────────────────┐  │
//! │  │ StackOutputs │  │  BootstrapTemplate   │  │
//! │  └──────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────┘
//! ```

pub mod action;
pub mod apply;
pub mod error;
pub mod graph;
pub mod outputs;
pub mod provisioner;
pub mod state;
pub mod template;

// Re-exports
pub use action::{Action, ActionResult, ApplyResult, Plan, PlanSummary};
pub use apply::{ApplyOutcome, apply};
pub use error::{CloudError, Result};
pub use graph::{
    Edge, GraphOptions, Property, Reference, ResourceGraph, ResourceKey, ResourceKind,
    ResourceNode,
};
pub use outputs::StackOutputs;
pub use provisioner::{CreateRequest, DryRunProvisioner, Provisioner};
pub use state::{ResolvedResources, ResourceState};
pub use template::BootstrapTemplate;
