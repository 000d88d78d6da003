use crate::types::TypeName;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

/// Where a problem was detected
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Resource the offending type was declared in, if known
    pub resource: Option<String>,

    /// Offending type
    pub source: TypeName,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.resource {
            Some(resource) => write!(f, "{} ({})", self.source, resource),
            None => write!(f, "{}", self.source),
        }
    }
}

/// Structured reason for a problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProblemKind {
    /// `offender` was imported by `importer` while already being expanded
    CircularImport {
        importer: TypeName,
        offender: TypeName,
        /// Active-import stack, bottom to top
        import_stack: Vec<TypeName>,
    },
    SealedClass,
    LocalClass,
    MissingDefaultConstructor,
    OverloadedDefinition { member: String },
    NonOverridableDefinition { member: String },
}

impl ProblemKind {
    /// Stable identifier used in reports
    pub fn code(&self) -> &'static str {
        match self {
            Self::CircularImport { .. } => "circular_import",
            Self::SealedClass => "sealed_class",
            Self::LocalClass => "local_class",
            Self::MissingDefaultConstructor => "missing_default_constructor",
            Self::OverloadedDefinition { .. } => "overloaded_definition",
            Self::NonOverridableDefinition { .. } => "non_overridable_definition",
        }
    }

    /// Import chain that closes the cycle, e.g. `A, B, A`.
    pub fn trace(&self) -> Option<Vec<&TypeName>> {
        match self {
            Self::CircularImport {
                offender,
                import_stack,
                ..
            } => Some(import_stack.iter().chain(std::iter::once(offender)).collect()),
            _ => None,
        }
    }
}

/// Diagnostic record handed to a [`ProblemReporter`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub severity: Severity,
    pub kind: ProblemKind,
    pub message: String,
    pub location: Location,
}

impl Problem {
    pub fn error(kind: ProblemKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            message: message.into(),
            location,
        }
    }

    pub fn warning(kind: ProblemKind, message: impl Into<String>, location: Location) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            message: message.into(),
            location,
        }
    }

    pub(crate) fn circular_import(
        importer: &TypeName,
        importer_resource: Option<String>,
        offender: &TypeName,
        import_stack: &[TypeName],
    ) -> Self {
        let rendered_stack = import_stack
            .iter()
            .map(TypeName::simple_name)
            .collect::<Vec<_>>()
            .join("->");
        let message = format!(
            "A circular import has been detected: illegal attempt by configuration class '{}' \
             to import class '{}' as '{}' is already present in the current import stack [{}].",
            importer.simple_name(),
            offender.simple_name(),
            offender.simple_name(),
            rendered_stack,
        );
        Self::error(
            ProblemKind::CircularImport {
                importer: importer.clone(),
                offender: offender.clone(),
                import_stack: import_stack.to_vec(),
            },
            message,
            Location {
                resource: importer_resource,
                source: offender.clone(),
            },
        )
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Problem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{level}: {} [{}]", self.message, self.location)
    }
}

/// Sink for structural problems. Reporting never fails and never blocks.
pub trait ProblemReporter {
    fn report(&mut self, problem: Problem);
}

impl<R: ProblemReporter + ?Sized> ProblemReporter for &mut R {
    fn report(&mut self, problem: Problem) {
        (**self).report(problem);
    }
}

/// Fan-out: both reporters see every problem
impl<A: ProblemReporter, B: ProblemReporter> ProblemReporter for (A, B) {
    fn report(&mut self, problem: Problem) {
        self.0.report(problem.clone());
        self.1.report(problem);
    }
}

impl ProblemReporter for Vec<Problem> {
    fn report(&mut self, problem: Problem) {
        self.push(problem);
    }
}

/// Accumulates every reported problem in order
#[derive(Debug, Default, Clone)]
pub struct CollectingProblemReporter {
    problems: Vec<Problem>,
}

impl CollectingProblemReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    pub fn errors(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(|p| p.severity == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Problem> {
        self.problems.iter().filter(|p| p.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn into_problems(self) -> Vec<Problem> {
        self.problems
    }
}

impl ProblemReporter for CollectingProblemReporter {
    fn report(&mut self, problem: Problem) {
        self.problems.push(problem);
    }
}

/// Forwards problems to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingProblemReporter;

impl ProblemReporter for LoggingProblemReporter {
    fn report(&mut self, problem: Problem) {
        match problem.severity {
            Severity::Error => log::error!("{} [{}]", problem.message, problem.location),
            Severity::Warning => log::warn!("{} [{}]", problem.message, problem.location),
        }
    }
}
