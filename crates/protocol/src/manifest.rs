use anyhow::{anyhow, Context, Result};
use config_graph::{LoaderKind, MemberInfo, TypeDescriptor, TypeName, TypeRegistry, TypeSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// Declarative description of configuration types and the roots to resolve.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Manifest {
    pub schema_version: u32,

    /// Root registrations, parsed in order
    #[serde(default)]
    pub roots: Vec<RootEntry>,

    /// Type declarations keyed by fully qualified name
    #[serde(default)]
    pub types: BTreeMap<String, TypeEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RootEntry {
    #[serde(rename = "type")]
    pub type_name: String,

    /// Explicit object name; absent roots behave like imports
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TypeEntry {
    /// Absent means no import directive; an empty list is still a directive
    #[serde(default)]
    pub imports: Option<Vec<String>>,

    #[serde(default)]
    pub resources: Option<ResourceEntry>,

    #[serde(default)]
    pub sealed: bool,

    #[serde(default)]
    pub local: bool,

    #[serde(default = "default_true")]
    pub default_constructor: bool,

    /// Where the type is declared; surfaces in problem locations
    #[serde(default)]
    pub source: Option<String>,

    #[serde(default)]
    pub definitions: Vec<DefinitionEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ResourceEntry {
    pub locations: Vec<String>,

    /// Loader kind, `xml` when omitted
    #[serde(default)]
    pub reader: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct DefinitionEntry {
    pub name: String,

    #[serde(default)]
    pub signature: Vec<String>,

    #[serde(default = "default_true")]
    pub overridable: bool,

    #[serde(default, rename = "static")]
    pub is_static: bool,
}

const fn default_true() -> bool {
    true
}

impl Manifest {
    /// Parse JSON, falling back to TOML
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: serde_json::Value = match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(json_err) => {
                let utf8 =
                    std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
                let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                    anyhow!(
                        "Manifest is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                    )
                })?;
                serde_json::to_value(toml_value)
                    .map_err(|err| anyhow!("Failed to convert TOML manifest to JSON: {err}"))?
            }
        };

        validate_manifest_value(&value)?;
        let manifest: Self =
            serde_json::from_value(value).map_err(|err| anyhow!("Manifest parse error: {err}"))?;

        if manifest.schema_version != MANIFEST_SCHEMA_VERSION {
            return Err(anyhow!(
                "schema_version {} is not supported (expected {MANIFEST_SCHEMA_VERSION})",
                manifest.schema_version
            ));
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read manifest {}", path.display()))?;
        Self::from_slice(&bytes).with_context(|| format!("Invalid manifest {}", path.display()))
    }

    /// Build the metadata source for the declared types
    pub fn registry(&self) -> TypeRegistry {
        let mut registry = TypeRegistry::new();
        for (name, entry) in &self.types {
            registry.register(entry.to_spec(name));
        }
        registry
    }

    pub fn root_registrations(&self) -> impl Iterator<Item = (TypeName, Option<String>)> + '_ {
        self.roots
            .iter()
            .map(|root| (TypeName::new(root.type_name.clone()), root.name.clone()))
    }
}

impl TypeEntry {
    fn to_spec(&self, name: &str) -> TypeSpec {
        let mut spec = TypeSpec::new(name).descriptor(TypeDescriptor {
            sealed: self.sealed,
            local: self.local,
            has_default_constructor: self.default_constructor,
            resource: self.source.clone(),
        });

        if let Some(imports) = &self.imports {
            spec = spec.imports(imports.iter().map(String::as_str));
        }

        if let Some(resources) = &self.resources {
            let loader = resources
                .reader
                .as_deref()
                .map(LoaderKind::new)
                .unwrap_or_default();
            spec = spec.resources(resources.locations.iter().cloned(), loader);
        }

        for definition in &self.definitions {
            let mut member = MemberInfo::new(definition.name.clone())
                .with_signature(definition.signature.iter().cloned());
            member.overridable = definition.overridable;
            member.is_static = definition.is_static;
            spec = spec.definition(member);
        }

        spec
    }
}

fn validate_manifest_value(value: &serde_json::Value) -> Result<()> {
    fn push_unknown(unknown: &mut Vec<String>, base: &str, key: &str) {
        if base.is_empty() {
            unknown.push(key.to_string());
        } else {
            unknown.push(format!("{base}.{key}"));
        }
    }

    fn validate_object_keys(
        unknown: &mut Vec<String>,
        obj: &serde_json::Map<String, serde_json::Value>,
        base: &str,
        allowed: &[&str],
    ) {
        for key in obj.keys() {
            if !allowed.iter().any(|a| a == &key.as_str()) {
                push_unknown(unknown, base, key);
            }
        }
    }

    const fn object_at(
        value: &serde_json::Value,
    ) -> Option<&serde_json::Map<String, serde_json::Value>> {
        match value {
            serde_json::Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    let root = object_at(value).ok_or_else(|| anyhow!("Manifest must be an object"))?;
    let mut unknown = Vec::new();
    validate_object_keys(&mut unknown, root, "", &["schema_version", "roots", "types"]);

    if let Some(serde_json::Value::Array(roots)) = root.get("roots") {
        for (idx, entry) in roots.iter().enumerate() {
            if let Some(obj) = object_at(entry) {
                validate_object_keys(
                    &mut unknown,
                    obj,
                    &format!("roots[{idx}]"),
                    &["type", "name"],
                );
            }
        }
    }

    if let Some(types) = root.get("types").and_then(object_at) {
        for (name, entry) in types {
            let Some(obj) = object_at(entry) else {
                continue;
            };
            let base = format!("types.{name}");
            validate_object_keys(
                &mut unknown,
                obj,
                &base,
                &[
                    "imports",
                    "resources",
                    "sealed",
                    "local",
                    "default_constructor",
                    "source",
                    "definitions",
                ],
            );
            if let Some(resources) = obj.get("resources").and_then(object_at) {
                validate_object_keys(
                    &mut unknown,
                    resources,
                    &format!("{base}.resources"),
                    &["locations", "reader"],
                );
            }
            if let Some(serde_json::Value::Array(definitions)) = obj.get("definitions") {
                for (idx, definition) in definitions.iter().enumerate() {
                    if let Some(def) = object_at(definition) {
                        validate_object_keys(
                            &mut unknown,
                            def,
                            &format!("{base}.definitions[{idx}]"),
                            &["name", "signature", "overridable", "static"],
                        );
                    }
                }
            }
        }
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        Err(anyhow!("Unknown manifest keys: {}", unknown.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config_graph::MetadataQuery;

    const TOML_MANIFEST: &str = r#"
schema_version = 1

[[roots]]
type = "App.AppConfig"
name = "appConfig"

[types."App.AppConfig"]
imports = ["App.DataConfig"]
resources = { locations = ["assembly://App/defs.xml", "file://extra.xml"] }
source = "App/AppConfig.cs"
definitions = [{ name = "service" }, { name = "clock", static = true, overridable = false }]

[types."App.DataConfig"]
sealed = true
"#;

    #[test]
    fn toml_manifest_builds_registry() {
        let manifest = Manifest::from_slice(TOML_MANIFEST.as_bytes()).unwrap();
        let roots: Vec<_> = manifest.root_registrations().collect();
        assert_eq!(
            roots,
            vec![(TypeName::from("App.AppConfig"), Some("appConfig".to_string()))]
        );

        let registry = manifest.registry();
        let app = TypeName::from("App.AppConfig");
        let imports = registry.import_directive(&app).unwrap().unwrap();
        assert_eq!(imports.types, vec![TypeName::from("App.DataConfig")]);

        let resources = registry.resource_import_directive(&app).unwrap().unwrap();
        assert_eq!(resources.locations.len(), 2);
        assert_eq!(resources.loader.as_str(), "xml");

        let members = registry.definition_members(&app).unwrap();
        assert_eq!(members.len(), 2);
        assert!(members[1].is_static && !members[1].overridable);

        let descriptor = registry.describe(&app).unwrap();
        assert_eq!(descriptor.resource.as_deref(), Some("App/AppConfig.cs"));
        assert!(descriptor.has_default_constructor);

        let data = TypeName::from("App.DataConfig");
        assert!(registry.describe(&data).unwrap().sealed);
        assert!(registry.import_directive(&data).unwrap().is_none());
    }

    #[test]
    fn json_manifest_is_accepted() {
        let json = r#"{
            "schema_version": 1,
            "roots": [{"type": "App.Root"}],
            "types": {"App.Root": {"imports": [], "resources": {"locations": ["a.yaml"], "reader": "yaml"}}}
        }"#;
        let manifest = Manifest::from_slice(json.as_bytes()).unwrap();
        let registry = manifest.registry();
        let root = TypeName::from("App.Root");

        assert!(registry.import_directive(&root).unwrap().unwrap().types.is_empty());
        assert_eq!(
            registry
                .resource_import_directive(&root)
                .unwrap()
                .unwrap()
                .loader
                .as_str(),
            "yaml"
        );
        assert_eq!(manifest.root_registrations().next().unwrap().1, None);
    }

    #[test]
    fn unknown_keys_are_listed() {
        let toml = r#"
schema_version = 1
extra = true

[[roots]]
type = "App.A"
alias = "a"

[types."App.A"]
imprts = ["App.B"]
definitions = [{ name = "x", virtual = true }]
"#;
        let err = Manifest::from_slice(toml.as_bytes()).unwrap_err().to_string();
        assert!(err.contains("extra"), "{err}");
        assert!(err.contains("roots[0].alias"), "{err}");
        assert!(err.contains("types.App.A.imprts"), "{err}");
        assert!(err.contains("types.App.A.definitions[0].virtual"), "{err}");
    }

    #[test]
    fn unsupported_schema_version_is_rejected() {
        let err = Manifest::from_slice(br#"{"schema_version": 2}"#)
            .unwrap_err()
            .to_string();
        assert!(err.contains("schema_version 2"), "{err}");
    }

    #[test]
    fn garbage_is_neither_json_nor_toml() {
        let err = Manifest::from_slice(b"this is = = not valid")
            .unwrap_err()
            .to_string();
        assert!(err.contains("not valid JSON or TOML"), "{err}");
    }
}
