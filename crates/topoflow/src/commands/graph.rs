use crate::OutputFormat;
use crate::utils::{self, Inputs};
use colored::Colorize;
use topoflow_cloud::{Plan, StackOutputs};

pub fn handle(inputs: &Inputs, format: OutputFormat) -> anyhow::Result<()> {
    let loaded = utils::load(inputs)?;
    let topology = utils::plan(&loaded.config)?;
    let graph = utils::build_graph(&loaded.config, &topology)?;
    let plan = Plan::from_graph(&graph)?;
    let outputs = StackOutputs::from_topology(&topology);

    match format {
        OutputFormat::Json => {
            let report = serde_json::json!({
                "summary": plan.summary().to_string(),
                "steps": plan.steps,
                "actions": plan.actions,
                "outputs": outputs.preview(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Text => {
            println!("{}", plan.summary().to_string().bold());
            for step in 1..=plan.steps {
                println!();
                println!("{}", format!("Step {}", step).cyan().bold());
                for action in plan.step(step) {
                    println!("  {} {}", "+".green(), action.description);
                    if !action.depends_on.is_empty() {
                        let deps: Vec<String> =
                            action.depends_on.iter().map(|d| d.to_string()).collect();
                        println!("      after {}", deps.join(", ").dimmed());
                    }
                }
            }

            println!();
            println!("{}", "Outputs:".bold());
            for (name, value) in outputs.preview() {
                println!("  {} = {}", name, value);
            }
        }
    }

    Ok(())
}
