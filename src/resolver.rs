//! Dependency resolution seam and the local repository resolver.
//!
//! Planning only talks to [`DependencyResolver`]; [`LocalRepositoryResolver`]
//! is the implementation the CLI uses. It reads artifacts straight out of a
//! local repository laid out as `<group path>/<name>/<version>/<name>-<version>.<type>`
//! and follows transitive dependencies listed in an optional
//! `<name>-<version>.deps.toml` file next to the artifact.

use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::artifact::ArtifactCoordinate;

/// Local artifact repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRepository {
    pub basedir: PathBuf,
}

impl LocalRepository {
    pub fn new(basedir: impl Into<PathBuf>) -> Self {
        Self {
            basedir: basedir.into(),
        }
    }

    /// Directory holding every file of the given artifact version.
    pub fn artifact_dir(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        let mut dir = self.basedir.clone();
        for segment in artifact.group.split('.') {
            dir.push(segment);
        }
        dir.join(&artifact.name).join(&artifact.version)
    }

    /// Path of the artifact file itself.
    pub fn artifact_path(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        self.artifact_dir(artifact).join(format!(
            "{}-{}.{}",
            artifact.name, artifact.version, artifact.kind
        ))
    }

    /// Path of the sidecar listing the artifact's own dependencies.
    pub fn descriptor_path(&self, artifact: &ArtifactCoordinate) -> PathBuf {
        self.artifact_dir(artifact)
            .join(format!("{}-{}.deps.toml", artifact.name, artifact.version))
    }
}

/// Remote artifact repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteRepository {
    pub id: String,
    pub url: String,
}

/// Errors raised while resolving an artifact.
#[derive(Error, Debug)]
pub enum ResolutionError {
    /// The artifact is not present in any repository.
    #[error("artifact {artifact} not found at {path}")]
    NotFound {
        artifact: ArtifactCoordinate,
        path: PathBuf,
    },

    /// The dependency descriptor could not be parsed.
    #[error("invalid dependency descriptor {path}: {reason}")]
    InvalidDescriptor { path: PathBuf, reason: String },

    /// IO error while reading the repository.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Resolves an artifact and its transitive dependencies to file paths.
pub trait DependencyResolver: Send + Sync {
    /// Returns the artifact's own file followed by its transitive
    /// dependencies, in resolution order.
    fn resolve_transitively(
        &self,
        artifact: &ArtifactCoordinate,
        local: &LocalRepository,
        remotes: &[RemoteRepository],
    ) -> Result<Vec<PathBuf>, ResolutionError>;
}

#[derive(Debug, Default, Deserialize)]
struct DependencyDescriptor {
    #[serde(default)]
    dependencies: Vec<ArtifactCoordinate>,
}

/// Resolver reading from the local repository only.
#[derive(Debug, Clone, Default)]
pub struct LocalRepositoryResolver;

impl LocalRepositoryResolver {
    pub fn new() -> Self {
        Self
    }

    fn read_descriptor(path: &Path) -> Result<DependencyDescriptor, ResolutionError> {
        if !path.exists() {
            return Ok(DependencyDescriptor::default());
        }
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ResolutionError::InvalidDescriptor {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

impl DependencyResolver for LocalRepositoryResolver {
    fn resolve_transitively(
        &self,
        artifact: &ArtifactCoordinate,
        local: &LocalRepository,
        remotes: &[RemoteRepository],
    ) -> Result<Vec<PathBuf>, ResolutionError> {
        if !remotes.is_empty() {
            tracing::debug!(
                remotes = remotes.len(),
                "remote repositories are not consulted by the local resolver"
            );
        }

        let mut resolved = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([artifact.clone()]);

        while let Some(next) = queue.pop_front() {
            // Versions are not mediated: the first version reached wins.
            if !seen.insert(next.key()) {
                continue;
            }

            let path = local.artifact_path(&next);
            if !path.exists() {
                return Err(ResolutionError::NotFound {
                    artifact: next,
                    path,
                });
            }
            tracing::debug!(artifact = %next, path = ?path, "resolved artifact");
            resolved.push(path);

            let descriptor = Self::read_descriptor(&local.descriptor_path(&next))?;
            queue.extend(
                descriptor
                    .dependencies
                    .into_iter()
                    .filter(|dep| dep.scope.is_transitive()),
            );
        }

        Ok(resolved)
    }
}
