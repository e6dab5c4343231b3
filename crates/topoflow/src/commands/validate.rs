use crate::utils::{self, Inputs};
use colored::Colorize;
use topoflow_cloud::Plan;

pub fn handle(inputs: &Inputs) -> anyhow::Result<()> {
    println!("{}", "Validating configuration...".blue());

    let loaded = match utils::load(inputs) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Configuration error".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    };

    match &loaded.source {
        Some(path) => println!("Configuration: {}", path.display().to_string().cyan()),
        None => println!("Configuration: {}", "(command line only)".cyan()),
    }

    let topology = match utils::plan(&loaded.config) {
        Ok(topology) => topology,
        Err(e) => {
            eprintln!();
            eprintln!("{}", "✗ Planning failed".red().bold());
            eprintln!("  {:#}", e);
            std::process::exit(1);
        }
    };

    let graph = utils::build_graph(&loaded.config, &topology)?;
    let plan = Plan::from_graph(&graph)?;

    println!("{}", "✓ Topology is valid".green().bold());
    println!();
    println!("Summary:");
    println!("  Project: {}", loaded.config.project_name().cyan());
    println!("  VPC: {}", topology.vpc.cidr);
    println!(
        "  Zones: {} of {}",
        topology.zone_count(),
        loaded.config.network.zones.len()
    );
    println!(
        "  Subnets: {} public, {} private",
        topology.public_subnets().len(),
        topology.private_subnets().len()
    );
    println!("  {}", plan.summary());

    Ok(())
}
