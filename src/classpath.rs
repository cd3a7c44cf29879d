//! Classpath assembly for the booter and the tests.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactCoordinate;
use crate::config::ProjectContext;
use crate::error::{Error, Result};
use crate::provider::{booter_key, Provider};
use crate::resolver::DependencyResolver;

/// Test and runner classpaths for a run.
///
/// Entries keep their order and duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClasspathSet {
    /// Test classes, main classes, then project classpath elements.
    pub test_classpath: Vec<String>,
    /// Booter and provider artifacts, in resolver order.
    pub runner_classpath: Vec<String>,
}

/// Resolves the runner classpath and assembles the test classpath.
pub fn build_classpath<R: DependencyResolver + ?Sized>(
    project: &ProjectContext,
    provider: Provider,
    resolver: &R,
) -> Result<ClasspathSet> {
    let booter = project
        .plugin_artifacts
        .get(&booter_key())
        .ok_or_else(|| Error::BooterNotFound(booter_key()))?;

    let mut runner_classpath = Vec::new();
    resolve_into(&mut runner_classpath, booter, project, resolver)?;
    let adapter = provider.adapter_artifact(&booter.version);
    resolve_into(&mut runner_classpath, &adapter, project, resolver)?;

    tracing::debug!("Test Classpath :");
    let mut test_classpath = Vec::with_capacity(project.classpath_elements.len() + 2);
    for entry in [&project.test_classes_directory, &project.classes_directory] {
        let entry = entry.display().to_string();
        tracing::debug!("  {}", entry);
        test_classpath.push(entry);
    }
    for element in &project.classpath_elements {
        tracing::debug!("  {}", element);
        test_classpath.push(element.clone());
    }

    Ok(ClasspathSet {
        test_classpath,
        runner_classpath,
    })
}

fn resolve_into<R: DependencyResolver + ?Sized>(
    classpath: &mut Vec<String>,
    artifact: &ArtifactCoordinate,
    project: &ProjectContext,
    resolver: &R,
) -> Result<()> {
    let paths = resolver
        .resolve_transitively(artifact, &project.local_repository, &project.remote_repositories)
        .map_err(|source| Error::ProviderResolutionFailed {
            artifact: artifact.clone(),
            source,
        })?;

    for path in paths {
        let path = absolute_display(&path);
        tracing::debug!("Adding to surefire test classpath: {}", path);
        classpath.push(path);
    }
    Ok(())
}

fn absolute_display(path: &Path) -> String {
    std::path::absolute(path)
        .unwrap_or_else(|_| path.to_path_buf())
        .display()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::{LocalRepository, RemoteRepository, ResolutionError};
    use std::collections::HashMap;
    use std::path::PathBuf;

    /// Resolver answering from a fixed table keyed by artifact name.
    struct TableResolver(HashMap<String, Vec<PathBuf>>);

    impl DependencyResolver for TableResolver {
        fn resolve_transitively(
            &self,
            artifact: &ArtifactCoordinate,
            local: &LocalRepository,
            _remotes: &[RemoteRepository],
        ) -> std::result::Result<Vec<PathBuf>, ResolutionError> {
            self.0
                .get(&artifact.name)
                .cloned()
                .ok_or_else(|| ResolutionError::NotFound {
                    artifact: artifact.clone(),
                    path: local.artifact_path(artifact),
                })
        }
    }

    fn resolver() -> TableResolver {
        TableResolver(HashMap::from([
            (
                "surefire-booter".to_string(),
                vec![PathBuf::from("/repo/booter.jar"), PathBuf::from("/repo/api.jar")],
            ),
            (
                "surefire-junit".to_string(),
                vec![PathBuf::from("/repo/surefire-junit.jar"), PathBuf::from("/repo/api.jar")],
            ),
        ]))
    }

    fn project() -> ProjectContext {
        let mut project = ProjectContext::new("/work/app", LocalRepository::new("/repo"));
        project
            .plugin_artifacts
            .insert(ArtifactCoordinate::new("org.apache.maven.surefire", "surefire-booter", "2.0"));
        project.classpath_elements = vec![
            "/repo/junit.jar".to_string(),
            "/repo/dup.jar".to_string(),
            "/repo/dup.jar".to_string(),
        ];
        project
    }

    #[test]
    fn test_classpath_is_ordered_and_keeps_duplicates() {
        let classpath = build_classpath(&project(), Provider::JUnit, &resolver()).unwrap();

        assert_eq!(
            classpath.test_classpath,
            vec![
                "/work/app/target/test-classes",
                "/work/app/target/classes",
                "/repo/junit.jar",
                "/repo/dup.jar",
                "/repo/dup.jar",
            ]
        );
    }

    #[test]
    fn runner_classpath_is_booter_then_provider_in_resolver_order() {
        let classpath = build_classpath(&project(), Provider::JUnit, &resolver()).unwrap();

        assert_eq!(
            classpath.runner_classpath,
            vec![
                "/repo/booter.jar",
                "/repo/api.jar",
                "/repo/surefire-junit.jar",
                "/repo/api.jar",
            ]
        );
    }

    #[test]
    fn missing_booter_fails_before_resolution() {
        let mut project = project();
        project.plugin_artifacts = Default::default();

        let err = build_classpath(&project, Provider::JUnit, &resolver()).unwrap_err();
        assert!(matches!(err, Error::BooterNotFound(key) if key == booter_key()));
    }

    #[test]
    fn resolver_failure_is_wrapped() {
        let err = build_classpath(&project(), Provider::TestNg, &resolver()).unwrap_err();

        match err {
            Error::ProviderResolutionFailed { artifact, source } => {
                assert_eq!(artifact.name, "surefire-testng");
                assert_eq!(artifact.version, "2.0");
                assert!(matches!(source, ResolutionError::NotFound { .. }));
            }
            other => panic!("expected resolution failure, got {:?}", other),
        }
    }
}
