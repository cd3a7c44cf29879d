//! Fork configuration: whether and how tests run in a separate process.

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::{Options, ProjectContext};
use crate::error::{Error, Result};

/// Reserved property holding the absolute project base directory.
pub const BASEDIR_PROPERTY: &str = "basedir";

/// Reserved property holding the local repository directory.
pub const LOCAL_REPOSITORY_PROPERTY: &str = "localRepository";

/// How tests are isolated from the current process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ForkMode {
    /// Run in the current process.
    #[default]
    None,
    /// One child process for the whole run.
    Once,
    /// One child process per test; interpreted by the booter.
    PerTest,
}

impl ForkMode {
    pub fn is_forking(self) -> bool {
        self != ForkMode::None
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ForkMode::None => "none",
            ForkMode::Once => "once",
            ForkMode::PerTest => "pertest",
        }
    }
}

impl FromStr for ForkMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(ForkMode::None),
            "once" => Ok(ForkMode::Once),
            "pertest" => Ok(ForkMode::PerTest),
            other => Err(Error::UnrecognizedForkMode(other.to_string())),
        }
    }
}

impl fmt::Display for ForkMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// System properties declared for a run.
///
/// A plain value; nothing here touches process state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeclaredProperties(BTreeMap<String, String>);

impl DeclaredProperties {
    /// User-configured properties plus the two reserved keys.
    pub fn declare(project: &ProjectContext, options: &Options) -> Self {
        let mut properties = options.system_properties.clone();

        let basedir = std::path::absolute(&project.base_directory)
            .unwrap_or_else(|_| project.base_directory.clone());
        properties.insert(BASEDIR_PROPERTY.to_string(), basedir.display().to_string());
        properties.insert(
            LOCAL_REPOSITORY_PROPERTY.to_string(),
            project.local_repository.basedir.display().to_string(),
        );

        for (key, value) in &properties {
            tracing::debug!("Setting system property [{}]=[{}]", key, value);
        }

        Self(properties)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}

/// Settings for the child process of a forked run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkedProcess {
    pub executable: PathBuf,
    pub working_directory: PathBuf,
    /// Passed through unparsed.
    pub arg_line: Option<String>,
    pub environment: BTreeMap<String, String>,
    pub system_properties: DeclaredProperties,
    pub child_delegation: bool,
    pub debug: bool,
}

/// Execution mode plus child settings when forking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForkSpec {
    pub mode: ForkMode,
    /// Present exactly when `mode` forks.
    pub process: Option<ForkedProcess>,
}

impl ForkSpec {
    pub fn is_forking(&self) -> bool {
        self.mode.is_forking()
    }
}

/// Executable used when none is configured.
pub fn default_jvm_executable() -> PathBuf {
    match std::env::var_os("JAVA_HOME") {
        Some(home) if !home.is_empty() => PathBuf::from(home).join("bin").join("java"),
        _ => PathBuf::from("java"),
    }
}

/// Builds the fork configuration.
pub fn build_fork(
    project: &ProjectContext,
    options: &Options,
    properties: &DeclaredProperties,
) -> Result<ForkSpec> {
    let mode: ForkMode = options.fork_mode.parse()?;

    if !mode.is_forking() {
        return Ok(ForkSpec {
            mode,
            process: None,
        });
    }

    let debug = tracing::enabled!(tracing::Level::DEBUG);
    if debug {
        for (key, value) in &options.environment_variables {
            tracing::debug!("Setting environment variable [{}]=[{}]", key, value);
        }
    }

    let process = ForkedProcess {
        executable: options
            .jvm_executable
            .clone()
            .unwrap_or_else(default_jvm_executable),
        working_directory: options
            .working_directory
            .clone()
            .unwrap_or_else(|| project.base_directory.clone()),
        arg_line: options.arg_line.clone(),
        environment: options.environment_variables.clone(),
        system_properties: properties.clone(),
        child_delegation: options.child_delegation,
        debug,
    };

    Ok(ForkSpec {
        mode,
        process: Some(process),
    })
}
