//! # Config Graph
//!
//! Resolves configuration declarations into the complete, deduplicated set
//! reachable through import directives.
//!
//! ## Features
//!
//! - **Recursive import expansion** - every imported type is discovered and expanded
//! - **Identity-based dedup** - one class per declaring type, explicit names win
//! - **Cycle detection** - circular imports are reported, not fatal
//! - **Structural validation** - per-class shape checks funneled to a problem reporter
//!
//! ## Architecture
//!
//! ```text
//! (type, name?) roots
//!     │
//!     ├──> ConfigurationClassParser
//!     │      ├─ MetadataQuery: imports, resources, definition members
//!     │      ├─ Active-import stack (cycle detection)
//!     │      └─ Resolved set (declaring type -> ConfigurationClass)
//!     │
//!     ├──> validate_all
//!     │      └─ ConfigurationClass::validate -> ProblemReporter
//!     │
//!     └──> ImportGraph (petgraph)
//!            ├─ Edges: importer -> imported
//!            └─ Cycles, roots, materialization order
//! ```

mod class;
mod error;
mod graph;
mod metadata;
mod parser;
mod problem;
mod registry;
mod types;

pub use class::ConfigurationClass;
pub use error::{GraphError, MetadataError, Result};
pub use graph::ImportGraph;
pub use metadata::{MetadataQuery, MetadataResult};
pub use parser::{ConfigurationClassParser, ConfigurationClasses};
pub use problem::{
    CollectingProblemReporter, Location, LoggingProblemReporter, Problem, ProblemKind,
    ProblemReporter, Severity,
};
pub use registry::{TypeRegistry, TypeSpec};
pub use types::{
    DefinitionMember, ImportDirective, ImportedResource, LoaderKind, MemberInfo,
    ResourceImportDirective, TypeDescriptor, TypeName,
};
