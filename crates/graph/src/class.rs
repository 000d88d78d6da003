use crate::problem::{Location, Problem, ProblemKind, ProblemReporter};
use crate::types::{
    DefinitionMember, ImportedResource, LoaderKind, MemberInfo, TypeDescriptor, TypeName,
};
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

/// One configuration declaration discovered by the parser.
///
/// Identity is the declaring type alone: equality and hashing ignore the
/// explicit name and everything discovered during expansion.
#[derive(Debug, Clone)]
pub struct ConfigurationClass {
    declaring_type: TypeName,
    explicit_name: Option<String>,
    descriptor: TypeDescriptor,
    definition_members: BTreeSet<DefinitionMember>,
    imported_resources: Vec<ImportedResource>,
    imported_by: BTreeSet<TypeName>,
}

impl ConfigurationClass {
    /// Pure construction; nothing is looked up until the parser expands it.
    pub fn new(declaring_type: TypeName, explicit_name: Option<String>) -> Self {
        Self {
            declaring_type,
            explicit_name,
            descriptor: TypeDescriptor::default(),
            definition_members: BTreeSet::new(),
            imported_resources: Vec::new(),
            imported_by: BTreeSet::new(),
        }
    }

    pub fn declaring_type(&self) -> &TypeName {
        &self.declaring_type
    }

    pub fn explicit_name(&self) -> Option<&str> {
        self.explicit_name.as_deref()
    }

    pub fn simple_name(&self) -> &str {
        self.declaring_type.simple_name()
    }

    pub fn descriptor(&self) -> &TypeDescriptor {
        &self.descriptor
    }

    /// Resource the declaring type came from, if the metadata source knows it
    pub fn resource(&self) -> Option<&str> {
        self.descriptor.resource.as_deref()
    }

    pub fn definition_members(&self) -> &BTreeSet<DefinitionMember> {
        &self.definition_members
    }

    pub fn imported_resources(&self) -> &[ImportedResource] {
        &self.imported_resources
    }

    /// Types that imported this class directly. Diagnostic only.
    pub fn imported_by(&self) -> &BTreeSet<TypeName> {
        &self.imported_by
    }

    /// Appends without dedup; the same resource may be read by different loaders.
    pub fn add_imported_resource(&mut self, locator: impl Into<String>, loader: LoaderKind) {
        self.imported_resources.push(ImportedResource {
            locator: locator.into(),
            loader,
        });
    }

    pub(crate) fn set_descriptor(&mut self, descriptor: TypeDescriptor) {
        self.descriptor = descriptor;
    }

    pub(crate) fn add_definition_member(&mut self, member: MemberInfo) -> bool {
        let declaring_type = self.declaring_type.clone();
        self.definition_members
            .insert(DefinitionMember::new(member, declaring_type))
    }

    pub(crate) fn record_importer(&mut self, importer: TypeName) {
        self.imported_by.insert(importer);
    }

    pub(crate) fn absorb_importers(&mut self, importers: BTreeSet<TypeName>) {
        self.imported_by.extend(importers);
    }

    pub(crate) fn take_importers(&mut self) -> BTreeSet<TypeName> {
        std::mem::take(&mut self.imported_by)
    }

    fn location(&self) -> Location {
        Location {
            resource: self.descriptor.resource.clone(),
            source: self.declaring_type.clone(),
        }
    }

    /// Report structural problems. Never fails; every check runs.
    pub fn validate<R: ProblemReporter + ?Sized>(&self, reporter: &mut R) {
        let name = self.simple_name();

        if self.descriptor.sealed {
            reporter.report(Problem::error(
                ProblemKind::SealedClass,
                format!(
                    "Configuration class '{name}' may not be sealed; remove the sealed modifier to continue."
                ),
                self.location(),
            ));
        }

        if self.descriptor.local {
            reporter.report(Problem::error(
                ProblemKind::LocalClass,
                format!("Configuration class '{name}' may not be declared inside a function body."),
                self.location(),
            ));
        }

        if !self.descriptor.has_default_constructor {
            reporter.report(Problem::error(
                ProblemKind::MissingDefaultConstructor,
                format!("Configuration class '{name}' must declare a visible no-arg constructor."),
                self.location(),
            ));
        }

        let mut name_counts: BTreeMap<&str, usize> = BTreeMap::new();
        for member in &self.definition_members {
            *name_counts.entry(member.name()).or_default() += 1;
        }
        for (member, count) in name_counts {
            if count > 1 {
                reporter.report(Problem::error(
                    ProblemKind::OverloadedDefinition {
                        member: member.to_string(),
                    },
                    format!(
                        "Only one definition method with name '{member}' is allowed in configuration class '{name}'; overloaded definition methods are not supported."
                    ),
                    self.location(),
                ));
            }
        }

        for member in &self.definition_members {
            if !member.member.is_static && !member.member.overridable {
                reporter.report(Problem::error(
                    ProblemKind::NonOverridableDefinition {
                        member: member.name().to_string(),
                    },
                    format!(
                        "Definition method '{}' in configuration class '{name}' must be overridable; remove the sealed or private modifier to continue.",
                        member.name()
                    ),
                    self.location(),
                ));
            }
        }
    }
}

impl PartialEq for ConfigurationClass {
    fn eq(&self, other: &Self) -> bool {
        self.declaring_type == other.declaring_type
    }
}

impl Eq for ConfigurationClass {}

impl Hash for ConfigurationClass {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.declaring_type.hash(state);
    }
}
