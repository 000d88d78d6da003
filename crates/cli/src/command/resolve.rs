use crate::{print_stdout, ResolveArgs};
use anyhow::{bail, Context as AnyhowContext, Result};
use config_graph::{
    CollectingProblemReporter, ConfigurationClassParser, ConfigurationClasses,
    LoggingProblemReporter,
};
use config_protocol::{serialize_json, Manifest, ResolutionReport};
use std::path::Path;

/// Parse every root of the manifest in order, then validate the resolved set.
pub fn resolve_manifest(path: &Path) -> Result<(ConfigurationClasses, CollectingProblemReporter)> {
    let manifest = Manifest::load(path)?;
    let registry = manifest.registry();
    log::debug!(
        "Loaded manifest {}: {} types, {} roots",
        path.display(),
        registry.len(),
        manifest.roots.len()
    );

    let mut parser = ConfigurationClassParser::new(
        &registry,
        (CollectingProblemReporter::new(), LoggingProblemReporter),
    );
    for (type_name, explicit_name) in manifest.root_registrations() {
        parser
            .parse(type_name.clone(), explicit_name)
            .with_context(|| format!("Failed to resolve root {type_name}"))?;
    }
    parser.validate_all();

    let (classes, (collected, _)) = parser.into_parts();
    log::info!(
        "Resolved {} configuration classes with {} problems",
        classes.len(),
        collected.problems().len()
    );
    Ok((classes, collected))
}

pub fn run_resolve(args: &ResolveArgs) -> Result<()> {
    let (classes, reporter) = resolve_manifest(&args.manifest)?;
    let report = ResolutionReport::build(&classes, reporter.problems());

    if args.json {
        print_stdout(&serialize_json(&report)?)?;
    } else {
        print_stdout(&report.render_text())?;
    }

    if args.strict && report.has_errors() {
        bail!(
            "{} configuration problem(s) reported in {}",
            report.summary.errors,
            args.manifest.display()
        );
    }
    Ok(())
}
