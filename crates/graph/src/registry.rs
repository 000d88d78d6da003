use crate::error::MetadataError;
use crate::metadata::{MetadataQuery, MetadataResult};
use crate::types::{
    ImportDirective, LoaderKind, MemberInfo, ResourceImportDirective, TypeDescriptor, TypeName,
};
use std::collections::HashMap;

/// Declarations registered for one configuration type
#[derive(Debug, Clone, Default)]
pub struct TypeSpec {
    pub name: TypeName,
    pub descriptor: TypeDescriptor,
    pub imports: Option<Vec<TypeName>>,
    pub resources: Option<ResourceImportDirective>,
    pub definitions: Vec<MemberInfo>,
}

impl TypeSpec {
    pub fn new(name: impl Into<TypeName>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn imports<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TypeName>,
    {
        self.imports
            .get_or_insert_with(Vec::new)
            .extend(types.into_iter().map(Into::into));
        self
    }

    pub fn resources<I, S>(mut self, locations: I, loader: LoaderKind) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.resources = Some(ResourceImportDirective {
            locations: locations.into_iter().map(Into::into).collect(),
            loader,
        });
        self
    }

    pub fn definition(mut self, member: MemberInfo) -> Self {
        self.definitions.push(member);
        self
    }

    pub fn descriptor(mut self, descriptor: TypeDescriptor) -> Self {
        self.descriptor = descriptor;
        self
    }
}

/// In-memory metadata source populated by explicit registration.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<TypeName, TypeSpec>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a type, replacing any previous registration under the same name
    pub fn register(&mut self, spec: TypeSpec) -> &mut Self {
        if self.types.insert(spec.name.clone(), spec).is_some() {
            log::debug!("Replaced existing type registration");
        }
        self
    }

    pub fn with(mut self, spec: TypeSpec) -> Self {
        self.register(spec);
        self
    }

    pub fn contains(&self, type_name: &TypeName) -> bool {
        self.types.contains_key(type_name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn lookup(&self, type_name: &TypeName) -> MetadataResult<&TypeSpec> {
        self.types
            .get(type_name)
            .ok_or_else(|| MetadataError::UnknownType(type_name.clone()))
    }
}

impl MetadataQuery for TypeRegistry {
    fn describe(&self, type_name: &TypeName) -> MetadataResult<TypeDescriptor> {
        Ok(self.lookup(type_name)?.descriptor.clone())
    }

    fn import_directive(&self, type_name: &TypeName) -> MetadataResult<Option<ImportDirective>> {
        Ok(self
            .lookup(type_name)?
            .imports
            .as_ref()
            .map(|types| ImportDirective {
                types: types.clone(),
            }))
    }

    fn resource_import_directive(
        &self,
        type_name: &TypeName,
    ) -> MetadataResult<Option<ResourceImportDirective>> {
        Ok(self.lookup(type_name)?.resources.clone())
    }

    fn definition_members(&self, type_name: &TypeName) -> MetadataResult<Vec<MemberInfo>> {
        Ok(self.lookup(type_name)?.definitions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_type_is_a_metadata_error() {
        let registry = TypeRegistry::new();
        let err = registry.describe(&TypeName::from("Missing")).unwrap_err();
        assert!(matches!(err, MetadataError::UnknownType(name) if name.as_str() == "Missing"));
    }

    #[test]
    fn type_without_imports_has_no_directive() {
        let registry = TypeRegistry::new().with(TypeSpec::new("App.Leaf"));
        let leaf = TypeName::from("App.Leaf");

        assert!(registry.import_directive(&leaf).unwrap().is_none());
        assert!(registry.resource_import_directive(&leaf).unwrap().is_none());
        assert!(registry.definition_members(&leaf).unwrap().is_empty());
    }

    #[test]
    fn directives_preserve_declaration_order() {
        let registry = TypeRegistry::new().with(
            TypeSpec::new("App.Root")
                .imports(["App.B", "App.A"])
                .resources(["r2.xml", "r1.xml"], LoaderKind::default()),
        );
        let root = TypeName::from("App.Root");

        let imports = registry.import_directive(&root).unwrap().unwrap();
        assert_eq!(imports.types, vec![TypeName::from("App.B"), TypeName::from("App.A")]);

        let resources = registry.resource_import_directive(&root).unwrap().unwrap();
        assert_eq!(resources.locations, vec!["r2.xml", "r1.xml"]);
        assert_eq!(resources.loader.as_str(), "xml");
    }
}
