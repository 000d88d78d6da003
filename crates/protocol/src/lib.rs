//! Wire model for config graph hosts: the declarative manifest that feeds
//! the type registry, and the reports printed after resolution.

use anyhow::Result;
use serde::Serialize;

mod manifest;
mod report;

pub use manifest::{
    DefinitionEntry, Manifest, ResourceEntry, RootEntry, TypeEntry, MANIFEST_SCHEMA_VERSION,
};
pub use report::{
    ClassReport, GraphReport, ProblemReport, ReportSummary, ResolutionReport, ResourceReport,
};

pub fn serialize_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value).map_err(Into::into)
}

pub fn serialize_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).map_err(Into::into)
}

/// JSON schema describing the manifest format
pub fn manifest_schema() -> Result<String> {
    serialize_json_pretty(&schemars::schema_for!(Manifest))
}
