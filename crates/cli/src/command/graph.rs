use super::resolve::resolve_manifest;
use crate::{print_stdout, GraphArgs, GraphFormat};
use anyhow::Result;
use config_graph::ImportGraph;
use config_protocol::{serialize_json, GraphReport};

pub fn run_graph(args: &GraphArgs) -> Result<()> {
    let (classes, _) = resolve_manifest(&args.manifest)?;
    let graph = ImportGraph::from_classes(classes.values());

    let output = match args.format {
        GraphFormat::Dot => graph.to_dot(),
        GraphFormat::Json => serialize_json(&GraphReport::from_graph(&graph))?,
        GraphFormat::Text => GraphReport::from_graph(&graph).render_text(),
    };
    print_stdout(&output)
}
