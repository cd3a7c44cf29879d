//! Test selection: suite descriptors or include/exclude pattern sets.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::{Options, ProjectContext};
use crate::error::{Error, Result};
use crate::provider::Provider;

/// Extension of test source files matched by name patterns.
pub const SOURCE_EXTENSION: &str = "java";

/// Includes used when none are configured.
pub const DEFAULT_INCLUDES: [&str; 3] = ["**/Test*.java", "**/*Test.java", "**/*TestCase.java"];

/// Excludes used when none are configured.
pub const DEFAULT_EXCLUDES: [&str; 3] = [
    "**/Abstract*Test.java",
    "**/Abstract*TestCase.java",
    "**/*$*",
];

/// Pattern-based selection over the test classes directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSet {
    pub test_classes_directory: PathBuf,
    pub includes: Vec<String>,
    pub excludes: Vec<String>,
    pub groups: Option<String>,
    pub excluded_groups: Option<String>,
    pub parallel: bool,
    pub thread_count: u32,
}

/// Which tests a run selects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum TestSelectionSpec {
    /// Suite descriptor files that exist on disk.
    SuiteDescriptors { files: Vec<PathBuf> },
    /// Include/exclude patterns plus opaque runner settings.
    PatternSet(PatternSet),
}

/// Builds the test selection for a run.
pub fn build_selection(
    project: &ProjectContext,
    options: &Options,
    provider: Provider,
) -> Result<TestSelectionSpec> {
    if !options.suite_descriptor_files.is_empty() {
        if !provider.supports_suite_descriptors() {
            return Err(Error::SuiteModeRequiresProvider);
        }

        let files = options
            .suite_descriptor_files
            .iter()
            .map(|file| project.resolve(file))
            .filter(|file| {
                let exists = file.exists();
                if !exists {
                    tracing::debug!(file = ?file, "skipping missing suite descriptor");
                }
                exists
            })
            .collect();
        return Ok(TestSelectionSpec::SuiteDescriptors { files });
    }

    let (includes, excludes) = match &options.test {
        Some(test) => (test_name_includes(test), Vec::new()),
        None => (
            or_defaults(&options.includes, &DEFAULT_INCLUDES),
            or_defaults(&options.excludes, &DEFAULT_EXCLUDES),
        ),
    };

    Ok(TestSelectionSpec::PatternSet(PatternSet {
        test_classes_directory: project.test_classes_directory.clone(),
        includes,
        excludes,
        groups: options.groups.clone(),
        excluded_groups: options.excluded_groups.clone(),
        parallel: options.parallel,
        thread_count: options.thread_count,
    }))
}

/// Maps `FooTest,BarTest` to `**/FooTest.java`, `**/BarTest.java`.
///
/// Empty fragments are dropped; fragments are not trimmed.
pub fn test_name_includes(test: &str) -> Vec<String> {
    test.split(',')
        .filter(|fragment| !fragment.is_empty())
        .map(|fragment| format!("**/{}.{}", fragment, SOURCE_EXTENSION))
        .collect()
}

// Defaults apply only to an empty configured list, never to one that
// holds blank entries.
fn or_defaults(configured: &[String], defaults: &[&str]) -> Vec<String> {
    if configured.is_empty() {
        defaults.iter().map(|p| p.to_string()).collect()
    } else {
        configured.to_vec()
    }
}
