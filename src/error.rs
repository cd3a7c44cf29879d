//! Error types for test launch planning and execution.

use thiserror::Error;

use crate::artifact::{ArtifactCoordinate, ArtifactKey};
use crate::resolver::ResolutionError;

/// Top-level error type for launch operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Neither a TestNG nor a JUnit dependency is declared.
    #[error("no supported test framework found in project dependencies")]
    NoProviderFound,

    /// The booter artifact is missing from the plugin artifacts.
    #[error("unable to locate {0} in the list of plugin artifacts")]
    BooterNotFound(ArtifactKey),

    /// The booter or provider artifact could not be resolved.
    #[error("unable to resolve provider dependency {artifact}: {source}")]
    ProviderResolutionFailed {
        artifact: ArtifactCoordinate,
        #[source]
        source: ResolutionError,
    },

    /// Suite descriptor files were configured without a TestNG dependency.
    #[error("suiteDescriptorFiles is configured, but there is no TestNG dependency")]
    SuiteModeRequiresProvider,

    /// The fork mode is not one of `none`, `once`, `pertest`.
    #[error("unrecognized fork mode '{0}' (expected none, once or pertest)")]
    UnrecognizedForkMode(String),

    /// The report format is not one of `brief`, `plain`.
    #[error("unrecognized report format '{0}' (expected brief or plain)")]
    UnrecognizedReportFormat(String),

    /// The runner process could not be started or awaited.
    #[error("failed to launch test runner: {0}")]
    Launch(String),

    /// The runner reported a launch-level fault.
    #[error("test launch fault: {0}")]
    LaunchFault(String),

    /// Tests ran and at least one failed.
    #[error("there are test failures")]
    TestFailure,

    /// Launch configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error while preparing or running the launch.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for launch operations.
pub type Result<T> = std::result::Result<T, Error>;
