use crate::OutputFormat;
use crate::utils::{self, Inputs};
use colored::Colorize;
use topoflow_core::{Placement, Tier, TopologyDescriptor};

pub fn handle(
    inputs: &Inputs,
    format: OutputFormat,
    placement: Option<Placement>,
) -> anyhow::Result<()> {
    let loaded = utils::load(inputs)?;
    let topology = utils::plan(&loaded.config)?;

    if let Some(placement) = placement {
        return print_placement(&topology, placement, format);
    }

    match format {
        OutputFormat::Json => println!("{}", topology.to_json()?),
        OutputFormat::Text => print_text(&topology, loaded.config.network.zones.len()),
    }

    Ok(())
}

/// Only the subnets a workload with this placement would land in
fn print_placement(
    topology: &TopologyDescriptor,
    placement: Placement,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let subnets = placement.select(topology);
    tracing::debug!(%placement, count = subnets.len(), "Selected subnets");

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&subnets)?),
        OutputFormat::Text => {
            println!("{} {}", "Placement".bold(), placement.to_string().cyan());
            for subnet in subnets {
                println!(
                    "  {:<18} {:<15} {}",
                    subnet.name(),
                    subnet.cidr.to_string(),
                    subnet.zone.name()
                );
            }
        }
    }

    Ok(())
}

fn print_text(topology: &TopologyDescriptor, requested_zones: usize) {
    println!("{} {}", "VPC".bold(), topology.vpc.cidr.to_string().cyan());

    let zones: Vec<&str> = topology.zones.iter().map(|z| z.name()).collect();
    let unused = requested_zones.saturating_sub(topology.zone_count());
    if unused > 0 {
        println!("Zones: {} ({} unused)", zones.join(", "), unused);
    } else {
        println!("Zones: {}", zones.join(", "));
    }

    println!();
    println!("{}", "Subnets:".bold());
    for subnet in &topology.subnets {
        let tier = match subnet.tier {
            Tier::Public => "public (auto-assign public IP)".green(),
            Tier::Private => "private".yellow(),
        };
        println!(
            "  {:<18} {:<15} {:<14} {}",
            subnet.name(),
            subnet.cidr.to_string(),
            subnet.zone.name(),
            tier
        );
    }

    println!();
    println!("{}", "Route tables:".bold());
    for table in topology.route_tables() {
        let routes: Vec<String> = table
            .routes()
            .iter()
            .map(|r| format!("{} -> internet-gateway", r.destination))
            .collect();
        let routes = if routes.is_empty() {
            "(no routes)".to_string()
        } else {
            routes.join(", ")
        };
        println!("  {:<20} {}", table.name(), routes);
    }

    println!();
    println!("{}", "Associations:".bold());
    for association in &topology.associations {
        println!(
            "  {} -> {}",
            association.subnet_key(),
            topology.route_table(association.table_tier).name()
        );
    }
}
