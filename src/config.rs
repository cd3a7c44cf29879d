//! Launch configuration: project context, user options, and validation.
//!
//! Both are usually loaded together from a TOML launch manifest:
//!
//! ```toml
//! [project]
//! base_directory = "/work/app"
//! classes_directory = "/work/app/target/classes"
//! test_classes_directory = "/work/app/target/test-classes"
//! build_directory = "/work/app/target"
//! local_repository = { basedir = "/home/me/.m2/repository" }
//!
//! [[project.dependencies]]
//! group = "junit"
//! name = "junit"
//! version = "3.8.1"
//!
//! [options]
//! forkMode = "once"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactRegistry;
use crate::error::{Error, Result};
use crate::fork::ForkMode;
use crate::report::ReportFormat;
use crate::resolver::{LocalRepository, RemoteRepository};

/// Immutable description of the project under test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectContext {
    /// Project base directory.
    pub base_directory: PathBuf,
    /// Compiled main classes.
    pub classes_directory: PathBuf,
    /// Compiled test classes.
    pub test_classes_directory: PathBuf,
    /// Build output directory; reports default to `surefire-reports` inside it.
    pub build_directory: PathBuf,
    /// Project test classpath elements, in order.
    #[serde(default)]
    pub classpath_elements: Vec<String>,
    /// Declared project dependencies.
    #[serde(default)]
    pub dependencies: ArtifactRegistry,
    /// Artifacts of the launcher itself (must hold the booter).
    #[serde(default)]
    pub plugin_artifacts: ArtifactRegistry,
    /// Local artifact repository.
    pub local_repository: LocalRepository,
    /// Remote repositories handed to the resolver.
    #[serde(default)]
    pub remote_repositories: Vec<RemoteRepository>,
}

impl ProjectContext {
    /// Creates a context using the conventional `target/` layout under `base_directory`.
    pub fn new(base_directory: impl Into<PathBuf>, local_repository: LocalRepository) -> Self {
        let base_directory = base_directory.into();
        let build_directory = base_directory.join("target");
        Self {
            classes_directory: build_directory.join("classes"),
            test_classes_directory: build_directory.join("test-classes"),
            build_directory,
            base_directory,
            classpath_elements: Vec::new(),
            dependencies: ArtifactRegistry::new(),
            plugin_artifacts: ArtifactRegistry::new(),
            local_repository,
            remote_repositories: Vec::new(),
        }
    }

    /// Resolves `path` against the base directory unless it is already absolute.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_directory.join(path)
        }
    }

    // Manifests may use paths relative to the base directory.
    fn resolve_directories(&mut self) {
        self.classes_directory = self.resolve(&self.classes_directory);
        self.test_classes_directory = self.resolve(&self.test_classes_directory);
        self.build_directory = self.resolve(&self.build_directory);
    }
}

/// User options controlling a test run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Options {
    /// Bypass the run entirely.
    #[serde(default)]
    pub skip: bool,

    /// Log test failures instead of failing.
    #[serde(default)]
    pub test_failure_ignore: bool,

    /// Comma-separated test names; overrides includes and excludes.
    #[serde(default)]
    pub test: Option<String>,

    #[serde(default)]
    pub includes: Vec<String>,

    #[serde(default)]
    pub excludes: Vec<String>,

    /// TestNG suite descriptor files; disables pattern selection.
    #[serde(default)]
    pub suite_descriptor_files: Vec<PathBuf>,

    #[serde(default)]
    pub groups: Option<String>,

    #[serde(default)]
    pub excluded_groups: Option<String>,

    #[serde(default)]
    pub thread_count: u32,

    #[serde(default)]
    pub parallel: bool,

    /// `brief` or `plain`.
    #[serde(default = "default_report_format")]
    pub report_format: String,

    /// Write reports to files rather than the console.
    #[serde(default = "default_true")]
    pub use_file: bool,

    #[serde(default = "default_true")]
    pub print_summary: bool,

    /// Where report files go; defaults to `<build>/surefire-reports`.
    #[serde(default)]
    pub reports_directory: Option<PathBuf>,

    /// `none`, `once` or `pertest`.
    #[serde(default = "default_fork_mode")]
    pub fork_mode: String,

    /// Executable for forked runs; resolved from `JAVA_HOME` when unset.
    #[serde(default)]
    pub jvm_executable: Option<PathBuf>,

    /// Raw extra arguments for the forked process.
    #[serde(default)]
    pub arg_line: Option<String>,

    #[serde(default)]
    pub environment_variables: BTreeMap<String, String>,

    /// Forked working directory; defaults to the project base directory.
    #[serde(default)]
    pub working_directory: Option<PathBuf>,

    #[serde(default = "default_true")]
    pub child_delegation: bool,

    #[serde(default)]
    pub system_properties: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

fn default_report_format() -> String {
    "brief".to_string()
}

fn default_fork_mode() -> String {
    "none".to_string()
}

impl Default for Options {
    fn default() -> Self {
        Self {
            skip: false,
            test_failure_ignore: false,
            test: None,
            includes: Vec::new(),
            excludes: Vec::new(),
            suite_descriptor_files: Vec::new(),
            groups: None,
            excluded_groups: None,
            thread_count: 0,
            parallel: false,
            report_format: default_report_format(),
            use_file: true,
            print_summary: true,
            reports_directory: None,
            fork_mode: default_fork_mode(),
            jvm_executable: None,
            arg_line: None,
            environment_variables: BTreeMap::new(),
            working_directory: None,
            child_delegation: true,
            system_properties: BTreeMap::new(),
        }
    }
}

impl Options {
    /// Reports directory for the given project.
    ///
    /// A relative configured directory is taken from the project base directory.
    pub fn reports_directory(&self, project: &ProjectContext) -> PathBuf {
        match &self.reports_directory {
            Some(directory) => project.resolve(directory),
            None => project.build_directory.join("surefire-reports"),
        }
    }

    /// Sets the fork mode.
    pub fn with_fork_mode(mut self, mode: impl Into<String>) -> Self {
        self.fork_mode = mode.into();
        self
    }

    /// Sets the free-form test expression.
    pub fn with_test(mut self, test: impl Into<String>) -> Self {
        self.test = Some(test.into());
        self
    }
}

/// Project and options loaded from one TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LaunchManifest {
    pub project: ProjectContext,
    #[serde(default)]
    pub options: Options,
}

impl LaunchManifest {
    /// Parses a manifest from TOML text.
    ///
    /// Relative project directories are resolved against `base_directory`.
    pub fn from_toml(content: &str) -> Result<Self> {
        let mut manifest: Self = toml::from_str(content)
            .map_err(|e| Error::Config(format!("invalid launch manifest: {}", e)))?;
        manifest.project.resolve_directories();
        Ok(manifest)
    }

    /// Reads and parses a manifest file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

/// Validation result containing all found issues.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// List of validation errors (fatal).
    pub errors: Vec<String>,
    /// List of validation warnings (non-fatal).
    pub warnings: Vec<String>,
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Converts to a Result, failing if there are errors.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.is_valid() {
            Ok(self.warnings)
        } else {
            Err(Error::Config(self.errors.join("; ")))
        }
    }
}

/// Trait for validatable configuration types.
pub trait Validate {
    /// Validates the configuration and returns any issues found.
    fn validate(&self) -> ValidationResult;
}

impl Validate for Options {
    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if let Err(e) = self.fork_mode.parse::<ForkMode>() {
            result.add_error(e.to_string());
        }

        // Unknown formats still run; they only lose the format-specific reporter.
        if let Err(e) = self.report_format.parse::<ReportFormat>() {
            result.add_warning(format!("{}; no format-specific reporter will be added", e));
        }

        if !self.suite_descriptor_files.is_empty()
            && (self.test.is_some() || !self.includes.is_empty() || !self.excludes.is_empty())
        {
            result.add_warning(
                "suiteDescriptorFiles is set; test, includes and excludes are ignored",
            );
        }

        if self.test.is_some() && (!self.includes.is_empty() || !self.excludes.is_empty()) {
            result.add_warning("test is set; includes and excludes are ignored");
        }

        if self.thread_count > 0 && !self.parallel {
            result.add_warning("threadCount only has an effect when parallel is enabled");
        }

        let fork_only = [
            ("jvmExecutable", self.jvm_executable.is_some()),
            ("argLine", self.arg_line.is_some()),
            ("workingDirectory", self.working_directory.is_some()),
            ("environmentVariables", !self.environment_variables.is_empty()),
        ];
        if self.fork_mode == "none" {
            for (name, set) in fork_only {
                if set {
                    result.add_warning(format!("{} is ignored when forkMode is none", name));
                }
            }
        }

        result
    }
}
