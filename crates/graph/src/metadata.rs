use crate::error::MetadataError;
use crate::types::{ImportDirective, MemberInfo, ResourceImportDirective, TypeDescriptor, TypeName};

pub type MetadataResult<T> = std::result::Result<T, MetadataError>;

/// Read-only view over the declarations attached to configuration types.
///
/// Answers must be deterministic for a given type within one resolution
/// pass. Implementations may cache internally but never observe parser state.
pub trait MetadataQuery {
    /// Structural facts used by class validation
    fn describe(&self, type_name: &TypeName) -> MetadataResult<TypeDescriptor>;

    /// Types imported by `type_name`, in declaration order
    fn import_directive(&self, type_name: &TypeName) -> MetadataResult<Option<ImportDirective>>;

    /// External resources imported by `type_name`, in declaration order
    fn resource_import_directive(
        &self,
        type_name: &TypeName,
    ) -> MetadataResult<Option<ResourceImportDirective>>;

    /// Members annotated as definition producers
    fn definition_members(&self, type_name: &TypeName) -> MetadataResult<Vec<MemberInfo>>;
}

impl<M: MetadataQuery + ?Sized> MetadataQuery for &M {
    fn describe(&self, type_name: &TypeName) -> MetadataResult<TypeDescriptor> {
        (**self).describe(type_name)
    }

    fn import_directive(&self, type_name: &TypeName) -> MetadataResult<Option<ImportDirective>> {
        (**self).import_directive(type_name)
    }

    fn resource_import_directive(
        &self,
        type_name: &TypeName,
    ) -> MetadataResult<Option<ResourceImportDirective>> {
        (**self).resource_import_directive(type_name)
    }

    fn definition_members(&self, type_name: &TypeName) -> MetadataResult<Vec<MemberInfo>> {
        (**self).definition_members(type_name)
    }
}
