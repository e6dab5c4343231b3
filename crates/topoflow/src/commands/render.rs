use crate::utils::{self, Inputs};
use std::collections::BTreeMap;
use std::path::Path;
use topoflow_cloud::{BootstrapTemplate, DryRunProvisioner, Reference, ResourceGraph, apply};

pub async fn handle(
    inputs: &Inputs,
    template_path: &Path,
    vars: Vec<(String, String)>,
    simulate: bool,
) -> anyhow::Result<()> {
    let template = BootstrapTemplate::from_file(template_path)?;
    let values: BTreeMap<String, String> = vars.into_iter().collect();

    let rendered = if simulate {
        let loaded = utils::load(inputs)?;
        let topology = utils::plan(&loaded.config)?;
        let graph = utils::build_graph(&loaded.config, &topology)?;
        let outcome = apply(&graph, &DryRunProvisioner::new()).await?;

        let placeholders = template.placeholders()?;
        let bindings: BTreeMap<String, Reference> = id_bindings(&graph)
            .into_iter()
            .filter(|(name, _)| placeholders.contains(name))
            .collect();
        tracing::debug!(bound = bindings.len(), "Binding resource ids");

        template.render_resolved(&bindings, &outcome.resolved, &values)?
    } else {
        template.render(&values)?
    };

    print!("{}", rendered);
    Ok(())
}

/// `vpc_id`, `internet_gateway_id`, `public_subnet_0_id`, ...
fn id_bindings(graph: &ResourceGraph) -> BTreeMap<String, Reference> {
    graph
        .nodes()
        .iter()
        .map(|node| {
            (
                format!("{}_id", node.key.name.replace('-', "_")),
                Reference::id(node.key.clone()),
            )
        })
        .collect()
}
