//! Test framework providers and the suites they run.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::artifact::{ArtifactCoordinate, ArtifactKey, ArtifactRegistry, Scope};
use crate::error::{Error, Result};
use crate::scope::TestSelectionSpec;

/// Group of the booter and every provider adapter artifact.
pub const SUREFIRE_GROUP: &str = "org.apache.maven.surefire";

/// Name of the booter artifact in the plugin artifacts.
pub const BOOTER_ARTIFACT: &str = "surefire-booter";

/// Key of the booter artifact.
pub fn booter_key() -> ArtifactKey {
    ArtifactKey::new(SUREFIRE_GROUP, BOOTER_ARTIFACT)
}

/// Test framework adapter used for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// TestNG; discovers tests itself and accepts suite descriptors.
    TestNg,
    /// JUnit; runs the classes matched by include/exclude patterns.
    JUnit,
}

impl Provider {
    /// Providers in selection priority order.
    pub const PRIORITY: [Provider; 2] = [Provider::TestNg, Provider::JUnit];

    /// Key of the framework dependency that activates this provider.
    pub fn framework_key(self) -> ArtifactKey {
        match self {
            Provider::TestNg => ArtifactKey::new("org.testng", "testng"),
            Provider::JUnit => ArtifactKey::new("junit", "junit"),
        }
    }

    /// Name of the adapter artifact in the surefire group.
    pub fn adapter_name(self) -> &'static str {
        match self {
            Provider::TestNg => "surefire-testng",
            Provider::JUnit => "surefire-junit",
        }
    }

    /// Coordinate of the adapter artifact, versioned alongside the booter.
    pub fn adapter_artifact(self, booter_version: &str) -> ArtifactCoordinate {
        ArtifactCoordinate::new(SUREFIRE_GROUP, self.adapter_name(), booter_version)
            .with_scope(Scope::Test)
    }

    /// Returns true if this provider can run suite descriptor files.
    pub fn supports_suite_descriptors(self) -> bool {
        matches!(self, Provider::TestNg)
    }

    /// Suites the booter must construct for the given selection.
    pub fn suites(self, selection: &TestSelectionSpec) -> Vec<TestSuite> {
        match (self, selection) {
            (_, TestSelectionSpec::SuiteDescriptors { files }) => files
                .iter()
                .map(|file| TestSuite::TestNgXml { file: file.clone() })
                .collect(),
            (Provider::TestNg, TestSelectionSpec::PatternSet(patterns)) => {
                vec![TestSuite::TestNgDirectory {
                    test_classes_directory: patterns.test_classes_directory.clone(),
                    includes: patterns.includes.clone(),
                    excludes: patterns.excludes.clone(),
                    groups: patterns.groups.clone(),
                    excluded_groups: patterns.excluded_groups.clone(),
                    parallel: patterns.parallel,
                    thread_count: patterns.thread_count,
                }]
            }
            (Provider::JUnit, TestSelectionSpec::PatternSet(patterns)) => {
                vec![TestSuite::JUnitDirectory {
                    test_classes_directory: patterns.test_classes_directory.clone(),
                    includes: patterns.includes.clone(),
                    excludes: patterns.excludes.clone(),
                }]
            }
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.adapter_name())
    }
}

/// Picks the provider for the declared dependencies.
///
/// TestNG always wins over JUnit when both are declared.
pub fn select_provider(dependencies: &ArtifactRegistry) -> Result<Provider> {
    let provider = Provider::PRIORITY
        .into_iter()
        .find(|provider| dependencies.contains(&provider.framework_key()))
        .ok_or(Error::NoProviderFound)?;

    tracing::debug!(provider = %provider, "selected test provider");
    Ok(provider)
}

/// A suite the booter constructs and runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TestSuite {
    /// A TestNG suite descriptor file.
    #[serde(rename = "testng-xml")]
    TestNgXml { file: PathBuf },
    /// TestNG over the test classes directory.
    #[serde(rename = "testng-directory")]
    TestNgDirectory {
        test_classes_directory: PathBuf,
        includes: Vec<String>,
        excludes: Vec<String>,
        groups: Option<String>,
        excluded_groups: Option<String>,
        parallel: bool,
        thread_count: u32,
    },
    /// JUnit over the test classes directory.
    #[serde(rename = "junit-directory")]
    JUnitDirectory {
        test_classes_directory: PathBuf,
        includes: Vec<String>,
        excludes: Vec<String>,
    },
}

impl TestSuite {
    /// Booter-side implementation class for this suite.
    pub fn class_name(&self) -> &'static str {
        match self {
            TestSuite::TestNgXml { .. } => "org.apache.maven.surefire.testng.TestNgXmlTestSuite",
            TestSuite::TestNgDirectory { .. } => {
                "org.apache.maven.surefire.testng.TestNGDirectoryTestSuite"
            }
            TestSuite::JUnitDirectory { .. } => {
                "org.apache.maven.surefire.junit.JUnitDirectoryTestSuite"
            }
        }
    }
}
