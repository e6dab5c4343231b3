//! TopoFlow Core
//!
//! Deterministic planning of a dual-tier (public/private) VPC network.
//!
//! Given a VPC block and an ordered list of availability zones, the planner
//! produces one VPC, up to `zone_cap` public and private subnet pairs, one
//! internet gateway, a public route table with a default route, a private
//! route table without one, and one route-table association per subnet.
//!
//! The planner performs no I/O. Provisioning the result is left to an
//! external engine (see `topoflow-cloud` for the resource graph).
//!
//! # Example
//!
//! ```
//! use topoflow_core::{plan_from_parts, Tier, DEFAULT_ZONE_CAP};
//!
//! let topology = plan_from_parts(
//!     "10.0.0.0/16",
//!     &["us-east-1a", "us-east-1b"],
//!     DEFAULT_ZONE_CAP,
//! )
//! .unwrap();
//!
//! assert_eq!(topology.subnets.len(), 4);
//! assert_eq!(topology.subnets[1].tier, Tier::Private);
//! assert_eq!(topology.subnets[1].cidr.to_string(), "10.0.1.0/24");
//! ```

pub mod error;
pub mod model;
pub mod placement;
pub mod planner;

pub use error::{PlanError, Result};
pub use model::*;
pub use placement::Placement;
pub use planner::{DEFAULT_ZONE_CAP, MAX_ZONE_CAP, plan_from_parts, plan_topology};
