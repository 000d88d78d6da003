use config_graph::{ConfigurationClasses, ImportGraph, Problem, Severity};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Outcome of one resolution pass, ready for printing
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResolutionReport {
    pub classes: Vec<ClassReport>,
    pub problems: Vec<ProblemReport>,
    pub summary: ReportSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ClassReport {
    #[serde(rename = "type")]
    pub type_name: String,
    pub explicit_name: Option<String>,
    pub source: Option<String>,
    pub definitions: Vec<String>,
    pub resources: Vec<ResourceReport>,
    pub imported_by: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceReport {
    pub locator: String,
    pub loader: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ProblemReport {
    pub severity: String,
    pub kind: String,
    pub message: String,
    pub source: String,
    pub resource: Option<String>,
    /// Import chain closing the cycle, for circular imports
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub classes: usize,
    pub definitions: usize,
    pub resources: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl ResolutionReport {
    pub fn build(classes: &ConfigurationClasses, problems: &[Problem]) -> Self {
        let mut class_reports: Vec<ClassReport> = classes
            .values()
            .map(|class| ClassReport {
                type_name: class.declaring_type().to_string(),
                explicit_name: class.explicit_name().map(str::to_string),
                source: class.resource().map(str::to_string),
                definitions: class
                    .definition_members()
                    .iter()
                    .map(|m| m.name().to_string())
                    .collect(),
                resources: class
                    .imported_resources()
                    .iter()
                    .map(|r| ResourceReport {
                        locator: r.locator.clone(),
                        loader: r.loader.to_string(),
                    })
                    .collect(),
                imported_by: class.imported_by().iter().map(|t| t.to_string()).collect(),
            })
            .collect();
        class_reports.sort_by(|a, b| a.type_name.cmp(&b.type_name));

        let problem_reports: Vec<ProblemReport> = problems.iter().map(ProblemReport::from).collect();

        let summary = ReportSummary {
            classes: class_reports.len(),
            definitions: class_reports.iter().map(|c| c.definitions.len()).sum(),
            resources: class_reports.iter().map(|c| c.resources.len()).sum(),
            errors: problems.iter().filter(|p| p.severity == Severity::Error).count(),
            warnings: problems
                .iter()
                .filter(|p| p.severity == Severity::Warning)
                .count(),
        };

        Self {
            classes: class_reports,
            problems: problem_reports,
            summary,
        }
    }

    pub fn has_errors(&self) -> bool {
        self.summary.errors > 0
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for class in &self.classes {
            match &class.explicit_name {
                Some(name) => {
                    let _ = writeln!(out, "{} (as '{name}')", class.type_name);
                }
                None => {
                    let _ = writeln!(out, "{}", class.type_name);
                }
            }
            if !class.definitions.is_empty() {
                let _ = writeln!(out, "  definitions: {}", class.definitions.join(", "));
            }
            for resource in &class.resources {
                let _ = writeln!(out, "  resource: {} [{}]", resource.locator, resource.loader);
            }
            if !class.imported_by.is_empty() {
                let _ = writeln!(out, "  imported by: {}", class.imported_by.join(", "));
            }
        }
        for problem in &self.problems {
            let _ = writeln!(out, "{}: {}", problem.severity, problem.message);
        }
        let _ = write!(
            out,
            "{} classes, {} definitions, {} resources, {} errors, {} warnings",
            self.summary.classes,
            self.summary.definitions,
            self.summary.resources,
            self.summary.errors,
            self.summary.warnings
        );
        out
    }
}

impl From<&Problem> for ProblemReport {
    fn from(problem: &Problem) -> Self {
        let severity = match problem.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        Self {
            severity: severity.to_string(),
            kind: problem.kind.code().to_string(),
            message: problem.message.clone(),
            source: problem.location.source.to_string(),
            resource: problem.location.resource.clone(),
            trace: problem
                .kind
                .trace()
                .map(|trace| trace.into_iter().map(|t| t.to_string()).collect()),
        }
    }
}

/// Serializable view of an [`ImportGraph`]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GraphReport {
    pub nodes: Vec<String>,
    pub edges: Vec<(String, String)>,
    pub roots: Vec<String>,
    pub cycles: Vec<Vec<String>>,
    pub materialization_order: Vec<Vec<String>>,
}

impl GraphReport {
    pub fn from_graph(graph: &ImportGraph) -> Self {
        let strings = |types: Vec<&config_graph::TypeName>| -> Vec<String> {
            types.into_iter().map(|t| t.to_string()).collect()
        };
        Self {
            nodes: strings(graph.nodes()),
            edges: graph
                .edges()
                .into_iter()
                .map(|(from, to)| (from.to_string(), to.to_string()))
                .collect(),
            roots: strings(graph.roots()),
            cycles: graph.cycles().into_iter().map(strings).collect(),
            materialization_order: graph
                .materialization_order()
                .into_iter()
                .map(strings)
                .collect(),
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for (from, to) in &self.edges {
            let _ = writeln!(out, "{from} -> {to}");
        }
        let _ = writeln!(out, "roots: {}", self.roots.join(", "));
        for cycle in &self.cycles {
            let _ = writeln!(out, "cycle: {}", cycle.join(", "));
        }
        let order: Vec<String> = self
            .materialization_order
            .iter()
            .map(|group| group.join(" + "))
            .collect();
        let _ = write!(out, "order: {}", order.join(" | "));
        out
    }
}
