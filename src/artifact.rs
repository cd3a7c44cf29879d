//! Artifact coordinates and the typed registry used to look them up.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Dependency scope of an artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    System,
}

impl Scope {
    /// Returns true if dependencies in this scope are inherited transitively.
    pub fn is_transitive(self) -> bool {
        matches!(self, Scope::Compile | Scope::Runtime)
    }
}

fn default_type() -> String {
    "jar".to_string()
}

/// Fully qualified artifact coordinate.
///
/// Opaque to planning; handed to the dependency resolver as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactCoordinate {
    pub group: String,
    pub name: String,
    pub version: String,
    #[serde(rename = "type", default = "default_type")]
    pub kind: String,
    #[serde(default)]
    pub scope: Scope,
}

impl ArtifactCoordinate {
    /// Creates a `jar` coordinate in compile scope.
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version: version.into(),
            kind: default_type(),
            scope: Scope::default(),
        }
    }

    /// Sets the scope.
    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns the versionless key for this coordinate.
    pub fn key(&self) -> ArtifactKey {
        ArtifactKey::new(&self.group, &self.name)
    }
}

impl fmt::Display for ArtifactCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}:{}", self.group, self.name, self.version, self.kind)
    }
}

/// Versionless `group:name` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ArtifactKey {
    pub group: String,
    pub name: String,
}

impl ArtifactKey {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

/// Registry of declared artifacts keyed by `group:name`.
///
/// Deserializes from a plain list of coordinates; a later entry with the same
/// key replaces an earlier one.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<ArtifactCoordinate>", into = "Vec<ArtifactCoordinate>")]
pub struct ArtifactRegistry {
    artifacts: BTreeMap<ArtifactKey, ArtifactCoordinate>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an artifact, returning the one it replaced.
    pub fn insert(&mut self, artifact: ArtifactCoordinate) -> Option<ArtifactCoordinate> {
        self.artifacts.insert(artifact.key(), artifact)
    }

    /// Looks up an artifact by key.
    pub fn get(&self, key: &ArtifactKey) -> Option<&ArtifactCoordinate> {
        self.artifacts.get(key)
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.artifacts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ArtifactCoordinate> {
        self.artifacts.values()
    }
}

impl From<Vec<ArtifactCoordinate>> for ArtifactRegistry {
    fn from(artifacts: Vec<ArtifactCoordinate>) -> Self {
        artifacts.into_iter().collect()
    }
}

impl From<ArtifactRegistry> for Vec<ArtifactCoordinate> {
    fn from(registry: ArtifactRegistry) -> Self {
        registry.artifacts.into_values().collect()
    }
}

impl FromIterator<ArtifactCoordinate> for ArtifactRegistry {
    fn from_iter<I: IntoIterator<Item = ArtifactCoordinate>>(iter: I) -> Self {
        let mut registry = Self::new();
        for artifact in iter {
            registry.insert(artifact);
        }
        registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_defaults_to_jar_in_compile_scope() {
        let junit = ArtifactCoordinate::new("junit", "junit", "3.8.1");
        assert_eq!(junit.kind, "jar");
        assert_eq!(junit.scope, Scope::Compile);
        assert_eq!(junit.to_string(), "junit:junit:3.8.1:jar");
        assert_eq!(junit.key().to_string(), "junit:junit");
    }

    #[test]
    fn registry_looks_up_by_versionless_key() {
        let registry: ArtifactRegistry = vec![
            ArtifactCoordinate::new("junit", "junit", "3.8.1"),
            ArtifactCoordinate::new("org.testng", "testng", "5.1"),
        ]
        .into();

        let testng = registry.get(&ArtifactKey::new("org.testng", "testng"));
        assert_eq!(testng.map(|a| a.version.as_str()), Some("5.1"));
        assert!(registry.get(&ArtifactKey::new("org.testng", "other")).is_none());
    }

    #[test]
    fn registry_later_entry_replaces_earlier() {
        let mut registry = ArtifactRegistry::new();
        registry.insert(ArtifactCoordinate::new("junit", "junit", "3.8.1"));
        let replaced = registry.insert(ArtifactCoordinate::new("junit", "junit", "4.0"));

        assert_eq!(replaced.map(|a| a.version), Some("3.8.1".to_string()));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn registry_deserializes_from_coordinate_list() {
        let json = r#"[{"group": "junit", "name": "junit", "version": "3.8.1", "scope": "test"}]"#;
        let registry: ArtifactRegistry = serde_json::from_str(json).unwrap();

        let junit = registry.get(&ArtifactKey::new("junit", "junit")).unwrap();
        assert_eq!(junit.scope, Scope::Test);
        assert_eq!(junit.kind, "jar");
    }

    #[test]
    fn only_compile_and_runtime_are_transitive() {
        assert!(Scope::Compile.is_transitive());
        assert!(Scope::Runtime.is_transitive());
        assert!(!Scope::Test.is_transitive());
        assert!(!Scope::Provided.is_transitive());
        assert!(!Scope::System.is_transitive());
    }
}
