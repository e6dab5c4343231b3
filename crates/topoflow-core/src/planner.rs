//! Topology planner
//!
//! Turns a VPC block and an ordered zone list into a dual-tier subnet layout.
//!
//! Allocation is a closed scheme: the `index`-th zone gets
//! `{A}.{B}.{2*index}.0/24` (public) and `{A}.{B}.{2*index+1}.0/24` (private).
//! There is no packing search and no collision detection. Reserved or
//! non-contiguous ranges are not supported; in exchange the same inputs
//! always produce the same layout.

use crate::error::{PlanError, Result};
use crate::model::{
    AssociationSpec, AvailabilityZone, InternetGatewaySpec, NetworkBlock, RouteTableSpec,
    SubnetSpec, Tier, TopologyDescriptor, VpcSpec,
};
use tracing::{debug, instrument};

/// Default number of zones a topology spans
pub const DEFAULT_ZONE_CAP: usize = 3;

/// Largest cap whose private block (`2*index+1`) still fits in one octet
pub const MAX_ZONE_CAP: usize = 128;

/// Plan a topology for `vpc_cidr` across at most `zone_cap` of `zones`
#[instrument(skip(vpc_cidr, zones), fields(vpc_cidr = %vpc_cidr, zones = zones.len()))]
pub fn plan_topology(
    vpc_cidr: &NetworkBlock,
    zones: &[AvailabilityZone],
    zone_cap: usize,
) -> Result<TopologyDescriptor> {
    if zones.is_empty() {
        return Err(PlanError::InsufficientZones);
    }
    if zone_cap == 0 {
        return Err(PlanError::invalid("zone cap must be at least 1"));
    }
    if zone_cap > MAX_ZONE_CAP {
        return Err(PlanError::invalid(format!(
            "zone cap {} exceeds the maximum of {}",
            zone_cap, MAX_ZONE_CAP
        )));
    }

    let effective_zones = &zones[..zones.len().min(zone_cap)];
    debug!(
        used = effective_zones.len(),
        dropped = zones.len() - effective_zones.len(),
        "Selected availability zones"
    );

    let mut subnets = Vec::with_capacity(effective_zones.len() * 2);
    for (index, zone) in effective_zones.iter().enumerate() {
        for tier in Tier::ALL {
            subnets.push(build_subnet(vpc_cidr, zone, tier, index)?);
        }
    }

    let associations = subnets
        .iter()
        .map(|subnet| AssociationSpec {
            subnet_index: subnet.index,
            subnet_tier: subnet.tier,
            table_tier: subnet.tier,
        })
        .collect();

    debug!(subnets = subnets.len(), "Topology planned");

    Ok(TopologyDescriptor {
        vpc: VpcSpec { cidr: *vpc_cidr },
        internet_gateway: InternetGatewaySpec::default(),
        zones: effective_zones.to_vec(),
        subnets,
        public_route_table: RouteTableSpec::for_tier(Tier::Public),
        private_route_table: RouteTableSpec::for_tier(Tier::Private),
        associations,
    })
}

/// Parse raw inputs and plan
///
/// The CIDR is validated before the zone list.
pub fn plan_from_parts<S: AsRef<str>>(
    vpc_cidr: &str,
    zones: &[S],
    zone_cap: usize,
) -> Result<TopologyDescriptor> {
    let block = NetworkBlock::parse(vpc_cidr)?;
    let zones = AvailabilityZone::parse_list(zones)?;
    plan_topology(&block, &zones, zone_cap)
}

fn build_subnet(
    vpc_cidr: &NetworkBlock,
    zone: &AvailabilityZone,
    tier: Tier,
    index: usize,
) -> Result<SubnetSpec> {
    let octet = u8::try_from(tier.third_octet(index)).map_err(|_| {
        PlanError::invalid(format!("{} subnet {} does not fit in the VPC block", tier, index))
    })?;
    let cidr = vpc_cidr.subnet(octet);

    // Blocks narrower than /16 cannot hold the A.B.x.0/24 layout
    if !vpc_cidr.contains(&cidr) {
        return Err(PlanError::invalid(format!(
            "VPC prefix /{} of {} is too small: {} subnet {} would be {}, outside the block \
             (use a /16 or wider VPC block)",
            vpc_cidr.mask(),
            vpc_cidr,
            tier,
            index,
            cidr
        )));
    }

    Ok(SubnetSpec {
        index,
        tier,
        zone: zone.clone(),
        cidr,
        auto_assign_public_ip: tier == Tier::Public,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{RouteTarget, SubnetKey};

    fn zones(names: &[&str]) -> Vec<AvailabilityZone> {
        AvailabilityZone::parse_list(names).unwrap()
    }

    fn vpc() -> NetworkBlock {
        NetworkBlock::parse("10.0.0.0/16").unwrap()
    }

    #[test]
    fn test_two_zone_cidr_formula() {
        let topo = plan_topology(&vpc(), &zones(&["a", "b"]), DEFAULT_ZONE_CAP).unwrap();

        let layout: Vec<(String, Tier, &str)> = topo
            .subnets
            .iter()
            .map(|s| (s.cidr.to_string(), s.tier, s.zone.name()))
            .collect();

        assert_eq!(
            layout,
            vec![
                ("10.0.0.0/24".to_string(), Tier::Public, "a"),
                ("10.0.1.0/24".to_string(), Tier::Private, "a"),
                ("10.0.2.0/24".to_string(), Tier::Public, "b"),
                ("10.0.3.0/24".to_string(), Tier::Private, "b"),
            ]
        );
    }

    #[test]
    fn test_zone_cap_limits_subnets() {
        let five = zones(&["z1", "z2", "z3", "z4", "z5"]);
        let topo = plan_topology(&vpc(), &five, 3).unwrap();

        assert_eq!(topo.zone_count(), 3);
        assert_eq!(topo.subnets.len(), 6);
        assert_eq!(topo.public_subnets().len(), 3);
        assert_eq!(topo.private_subnets().len(), 3);
    }

    #[test]
    fn test_end_to_end_four_zones() {
        let topo = plan_from_parts(
            "10.0.0.0/16",
            &["us-east-1a", "us-east-1b", "us-east-1c", "us-east-1d"],
            DEFAULT_ZONE_CAP,
        )
        .unwrap();

        let cidrs: Vec<String> = topo.subnets.iter().map(|s| s.cidr.to_string()).collect();
        assert_eq!(
            cidrs,
            vec![
                "10.0.0.0/24",
                "10.0.1.0/24",
                "10.0.2.0/24",
                "10.0.3.0/24",
                "10.0.4.0/24",
                "10.0.5.0/24",
            ]
        );
        assert!(topo.subnets.iter().all(|s| s.zone.name() != "us-east-1d"));
        assert!(!topo.zones.iter().any(|z| z.name() == "us-east-1d"));
    }

    #[test]
    fn test_tier_assignment() {
        let topo = plan_topology(&vpc(), &zones(&["a", "b", "c"]), 3).unwrap();

        for (position, subnet) in topo.subnets.iter().enumerate() {
            if position % 2 == 0 {
                assert_eq!(subnet.tier, Tier::Public);
                assert!(subnet.auto_assign_public_ip);
                assert_eq!(subnet.cidr.third_octet() as usize, 2 * subnet.index);
            } else {
                assert_eq!(subnet.tier, Tier::Private);
                assert!(!subnet.auto_assign_public_ip);
                assert_eq!(subnet.cidr.third_octet() as usize, 2 * subnet.index + 1);
            }
        }
    }

    #[test]
    fn test_every_subnet_has_one_matching_association() {
        let topo = plan_topology(&vpc(), &zones(&["a", "b", "c", "d"]), 3).unwrap();

        assert_eq!(topo.associations.len(), topo.subnets.len());
        for subnet in &topo.subnets {
            let found = topo.associations_for(subnet.key());
            assert_eq!(found.len(), 1, "{}", subnet.name());
            assert_eq!(found[0].table_tier, subnet.tier);
        }
    }

    #[test]
    fn test_route_table_shape() {
        let topo = plan_topology(&vpc(), &zones(&["a"]), 3).unwrap();

        let public = topo.route_table(Tier::Public).routes();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].destination.to_string(), "0.0.0.0/0");
        assert_eq!(public[0].target, RouteTarget::InternetGateway);

        assert!(topo.route_table(Tier::Private).routes().is_empty());
    }

    #[test]
    fn test_deterministic_output() {
        let input = zones(&["us-west-2a", "us-west-2b", "us-west-2c"]);
        let first = plan_topology(&vpc(), &input, 3).unwrap();
        let second = plan_topology(&vpc(), &input, 3).unwrap();

        assert_eq!(first, second);
        assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
    }

    #[test]
    fn test_zone_order_decides_slot_zero() {
        let topo = plan_topology(&vpc(), &zones(&["b", "a"]), 3).unwrap();
        let first = topo
            .subnet(SubnetKey {
                tier: Tier::Public,
                index: 0,
            })
            .unwrap();
        assert_eq!(first.zone.name(), "b");
        assert_eq!(first.cidr.to_string(), "10.0.0.0/24");
    }

    #[test]
    fn test_empty_zones_fail() {
        let err = plan_topology(&vpc(), &[], 3).unwrap_err();
        assert_eq!(err, PlanError::InsufficientZones);
    }

    #[test]
    fn test_malformed_cidr_fails() {
        let err = plan_from_parts("not-a-cidr", &["a"], 3).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_cidr_checked_before_zones() {
        let none: [&str; 0] = [];
        let err = plan_from_parts("not-a-cidr", &none, 3).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_zero_cap_rejected() {
        let err = plan_topology(&vpc(), &zones(&["a"]), 0).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_oversized_cap_rejected() {
        let err = plan_topology(&vpc(), &zones(&["a"]), MAX_ZONE_CAP + 1).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_subnet_outside_narrow_vpc_rejected() {
        let narrow = NetworkBlock::parse("10.0.8.0/22").unwrap();
        let err = plan_topology(&narrow, &zones(&["a"]), 3).unwrap_err();
        assert!(matches!(err, PlanError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_narrow_prefix_error_names_prefix_size() {
        let err = plan_from_parts("10.0.0.0/24", &["a"], 3).unwrap_err();
        let message = match err {
            PlanError::InvalidConfiguration(message) => message,
            other => panic!("expected InvalidConfiguration, got {other:?}"),
        };
        assert!(message.contains("VPC prefix /24"), "{message}");
        assert!(message.contains("too small"), "{message}");
        assert!(message.contains("10.0.1.0/24"), "{message}");
    }

    #[test]
    fn test_non_default_prefix() {
        let topo = plan_from_parts("172.16.0.0/12", &["a", "b"], 3).unwrap();
        assert_eq!(topo.subnets[3].cidr.to_string(), "172.16.3.0/24");
        assert_eq!(topo.vpc.cidr.to_string(), "172.16.0.0/12");
    }
}
