use crate::types::TypeName;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, GraphError>;

/// Failure raised by a metadata source.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("Unknown configuration type: {0}")]
    UnknownType(TypeName),

    #[error("Metadata unavailable for {type_name}: {reason}")]
    Unavailable { type_name: TypeName, reason: String },
}

/// Fatal resolution error. Structural problems are reported, never returned.
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Metadata query failed: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),
}
