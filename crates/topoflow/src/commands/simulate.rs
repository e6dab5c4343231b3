use crate::utils::{self, Inputs};
use colored::Colorize;
use topoflow_cloud::{DryRunProvisioner, StackOutputs, apply};

pub async fn handle(inputs: &Inputs) -> anyhow::Result<()> {
    let loaded = utils::load(inputs)?;
    let topology = utils::plan(&loaded.config)?;
    let graph = utils::build_graph(&loaded.config, &topology)?;

    let outcome = apply(&graph, &DryRunProvisioner::new()).await?;
    let result = &outcome.result;

    if !result.is_success() {
        for failure in &result.failed {
            eprintln!(
                "{} {}: {}",
                "✗".red(),
                failure.key,
                failure.error.as_deref().unwrap_or("unknown error")
            );
        }
        anyhow::bail!("{} resources failed to apply", result.failed.len());
    }

    eprintln!(
        "{} {} resources created in {}ms (dry-run)",
        "✓".green(),
        result.succeeded.len(),
        result.duration_ms
    );

    let outputs = StackOutputs::from_topology(&topology).resolve(&outcome.resolved)?;
    println!("{}", serde_json::to_string_pretty(&outputs)?);

    Ok(())
}
