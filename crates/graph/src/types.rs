use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Fully qualified name of a declaring type (e.g. "App.Config.DataConfig").
///
/// This is the identity of a configuration class: two classes with the same
/// `TypeName` are the same graph node.
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TypeName(String);

impl TypeName {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Last path segment, used when rendering diagnostics.
    pub fn simple_name(&self) -> &str {
        let tail = self.0.rsplit("::").next().unwrap_or(&self.0);
        tail.rsplit('.').next().unwrap_or(tail)
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeName {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for TypeName {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for TypeName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Structural facts about a declaring type, captured during expansion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDescriptor {
    /// Type cannot be subclassed
    pub sealed: bool,

    /// Type is declared inside a function body
    pub local: bool,

    /// Type exposes a visible no-arg constructor
    pub has_default_constructor: bool,

    /// Where the type is declared (file, assembly, ...), if known
    pub resource: Option<String>,
}

impl Default for TypeDescriptor {
    fn default() -> Self {
        Self {
            sealed: false,
            local: false,
            has_default_constructor: true,
            resource: None,
        }
    }
}

/// A member annotated as a definition producer, as reported by metadata.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MemberInfo {
    /// Member name (also the default object name)
    pub name: String,

    /// Parameter type list; distinguishes overloads sharing a name
    #[serde(default)]
    pub signature: Vec<String>,

    /// Member can be overridden by a generated subclass
    pub overridable: bool,

    pub is_static: bool,
}

impl MemberInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: Vec::new(),
            overridable: true,
            is_static: false,
        }
    }

    pub fn with_signature<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.signature = params.into_iter().map(Into::into).collect();
        self
    }

    pub fn sealed(mut self) -> Self {
        self.overridable = false;
        self
    }

    pub fn static_member(mut self) -> Self {
        self.is_static = true;
        self
    }
}

/// Definition-producing member bound to the configuration class that declares it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DefinitionMember {
    pub member: MemberInfo,
    pub declaring_type: TypeName,
}

impl DefinitionMember {
    pub fn new(member: MemberInfo, declaring_type: TypeName) -> Self {
        Self {
            member,
            declaring_type,
        }
    }

    pub fn name(&self) -> &str {
        &self.member.name
    }
}

/// Loader responsible for reading an imported resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoaderKind(String);

impl LoaderKind {
    pub const DEFAULT: &'static str = "xml";

    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for LoaderKind {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

impl fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportedResource {
    pub locator: String,
    pub loader: LoaderKind,
}

/// Ordered list of further configuration types to import
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportDirective {
    pub types: Vec<TypeName>,
}

/// Ordered list of external resources plus the loader that reads them
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResourceImportDirective {
    pub locations: Vec<String>,
    pub loader: LoaderKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_name_strips_namespaces() {
        assert_eq!(TypeName::from("App.Config.DataConfig").simple_name(), "DataConfig");
        assert_eq!(TypeName::from("app::config::Data").simple_name(), "Data");
        assert_eq!(TypeName::from("Plain").simple_name(), "Plain");
    }

    #[test]
    fn member_builders_flip_flags() {
        let member = MemberInfo::new("dataSource").sealed();
        assert!(!member.overridable);
        assert!(!member.is_static);

        let member = MemberInfo::new("clock").static_member();
        assert!(member.overridable);
        assert!(member.is_static);
    }
}
