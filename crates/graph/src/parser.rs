use crate::class::ConfigurationClass;
use crate::error::Result;
use crate::graph::ImportGraph;
use crate::metadata::MetadataQuery;
use crate::problem::{Problem, ProblemReporter};
use crate::types::TypeName;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Resolved set: one configuration class per declaring type
pub type ConfigurationClasses = HashMap<TypeName, ConfigurationClass>;

/// Entry on the active-import stack
#[derive(Debug, Clone)]
struct ImportFrame {
    type_name: TypeName,
    resource: Option<String>,
}

/// Expands root configuration classes into the full set reachable through
/// import directives.
///
/// Circular imports are reported through the [`ProblemReporter`] and cut the
/// offending subtree only; the rest of the graph still resolves. Metadata
/// failures are the only fatal condition.
///
/// One parser owns its resolved set and import stack exclusively; callers
/// that parse from several threads must serialize access.
pub struct ConfigurationClassParser<M, R> {
    metadata: M,
    reporter: R,
    configuration_classes: ConfigurationClasses,
    import_stack: Vec<ImportFrame>,
}

impl<M: MetadataQuery, R: ProblemReporter> ConfigurationClassParser<M, R> {
    pub fn new(metadata: M, reporter: R) -> Self {
        Self {
            metadata,
            reporter,
            configuration_classes: HashMap::new(),
            import_stack: Vec::new(),
        }
    }

    /// Resolve one root declaration and everything it imports
    pub fn parse(
        &mut self,
        declaring_type: impl Into<TypeName>,
        explicit_name: Option<String>,
    ) -> Result<()> {
        let class = ConfigurationClass::new(declaring_type.into(), explicit_name);
        self.process(class, None)
    }

    /// Ask every resolved class to self-validate. Problems are reported, never returned.
    pub fn validate_all(&mut self) {
        for class in self.configuration_classes.values() {
            class.validate(&mut self.reporter);
        }
        log::info!(
            "Validated {} configuration classes",
            self.configuration_classes.len()
        );
    }

    pub fn configuration_classes(&self) -> &ConfigurationClasses {
        &self.configuration_classes
    }

    pub fn get(&self, type_name: &str) -> Option<&ConfigurationClass> {
        self.configuration_classes.get(type_name)
    }

    pub fn len(&self) -> usize {
        self.configuration_classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configuration_classes.is_empty()
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    pub fn import_graph(&self) -> ImportGraph {
        ImportGraph::from_classes(self.configuration_classes.values())
    }

    pub fn into_parts(self) -> (ConfigurationClasses, R) {
        (self.configuration_classes, self.reporter)
    }

    fn process(&mut self, mut class: ConfigurationClass, importer: Option<TypeName>) -> Result<()> {
        self.expand(&mut class)?;
        self.merge(class, importer);
        Ok(())
    }

    fn expand(&mut self, class: &mut ConfigurationClass) -> Result<()> {
        let type_name = class.declaring_type().clone();
        log::debug!("Expanding configuration class {type_name}");

        class.set_descriptor(self.metadata.describe(&type_name)?);

        if let Some(directive) = self.metadata.import_directive(&type_name)? {
            self.process_imports(class, directive.types)?;
        }

        if let Some(directive) = self.metadata.resource_import_directive(&type_name)? {
            for locator in directive.locations {
                class.add_imported_resource(locator, directive.loader.clone());
            }
        }

        for member in self.metadata.definition_members(&type_name)? {
            class.add_definition_member(member);
        }

        Ok(())
    }

    fn process_imports(&mut self, class: &ConfigurationClass, imports: Vec<TypeName>) -> Result<()> {
        let type_name = class.declaring_type();

        if self
            .import_stack
            .iter()
            .any(|frame| &frame.type_name == type_name)
        {
            if let Some(importer) = self.import_stack.last() {
                let stack: Vec<TypeName> = self
                    .import_stack
                    .iter()
                    .map(|frame| frame.type_name.clone())
                    .collect();
                let problem = Problem::circular_import(
                    &importer.type_name,
                    importer.resource.clone(),
                    type_name,
                    &stack,
                );
                log::debug!("{}", problem.message);
                self.reporter.report(problem);
            }
            return Ok(());
        }

        self.import_stack.push(ImportFrame {
            type_name: type_name.clone(),
            resource: class.resource().map(str::to_string),
        });
        let outcome = imports.into_iter().try_for_each(|imported| {
            self.process(
                ConfigurationClass::new(imported, None),
                Some(type_name.clone()),
            )
        });
        self.import_stack.pop();
        outcome
    }

    fn merge(&mut self, mut class: ConfigurationClass, importer: Option<TypeName>) {
        let resolved = match self
            .configuration_classes
            .entry(class.declaring_type().clone())
        {
            Entry::Occupied(mut entry) => {
                if class.explicit_name().is_some() {
                    log::debug!(
                        "Explicit registration of {} replaces the previously resolved entry",
                        class.declaring_type()
                    );
                    class.absorb_importers(entry.get_mut().take_importers());
                    entry.insert(class);
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(class),
        };

        if let Some(importer) = importer {
            resolved.record_importer(importer);
        }
    }
}
