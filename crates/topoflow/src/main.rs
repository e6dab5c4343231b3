mod commands;
mod utils;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use topoflow_core::Placement;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "topo")]
#[command(about = "Plan dual-tier VPC topologies from a KDL description", long_about = None)]
struct Cli {
    /// Configuration file (default: topo.kdl discovery)
    #[arg(short, long, global = true, env = "TOPO_CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Override network.vpc-cidr-block
    #[arg(long, global = true, env = "TOPO_VPC_CIDR_BLOCK")]
    vpc_cidr: Option<String>,

    /// Override network.zones (comma separated, provider order)
    #[arg(long, global = true, value_delimiter = ',')]
    zones: Vec<String>,

    /// Override network.zone-cap
    #[arg(long, global = true, env = "TOPO_ZONE_CAP")]
    zone_cap: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the planned topology
    Plan {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Only show the subnets selected by a placement (e.g. spread:private)
        #[arg(long, value_name = "MODE:TIER")]
        placement: Option<Placement>,
    },
    /// Print the resource creation plan, step by step
    Graph {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Apply the graph with the dry-run provisioner and print the stack outputs
    Simulate,
    /// Render a bootstrap script template
    Render {
        /// Template file
        template: PathBuf,
        /// Template value (repeatable)
        #[arg(long = "var", value_name = "KEY=VALUE", value_parser = utils::parse_key_val)]
        vars: Vec<(String, String)>,
        /// Bind `<resource>_id` placeholders to ids from a dry-run apply
        #[arg(long)]
        simulate: bool,
    },
    /// Validate the configuration and the planned topology
    Validate,
    /// Show version information
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries plan output, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let inputs = utils::Inputs {
        config: cli.config,
        vpc_cidr: cli.vpc_cidr,
        zones: cli.zones,
        zone_cap: cli.zone_cap,
    };

    match cli.command {
        Commands::Plan { format, placement } => {
            commands::plan::handle(&inputs, format, placement)?;
        }
        Commands::Graph { format } => {
            commands::graph::handle(&inputs, format)?;
        }
        Commands::Simulate => {
            commands::simulate::handle(&inputs).await?;
        }
        Commands::Render {
            template,
            vars,
            simulate,
        } => {
            commands::render::handle(&inputs, &template, vars, simulate).await?;
        }
        Commands::Validate => {
            commands::validate::handle(&inputs)?;
        }
        Commands::Version => {
            println!("topoflow {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
