//! Surefire Launch - plans and launches test runs for JVM projects
//!
//! This library selects a test framework provider, works out which tests to
//! run and how to isolate them, assembles classpaths and reporters into an
//! [`ExecutionPlan`], and hands that plan to a [`TestRunner`].

pub mod artifact;
pub mod classpath;
pub mod config;
pub mod error;
pub mod fork;
pub mod launch;
pub mod plan;
pub mod provider;
pub mod report;
pub mod resolver;
pub mod runner;
pub mod scope;
pub mod sysprops;

pub use error::Error;

pub use artifact::{ArtifactCoordinate, ArtifactKey, ArtifactRegistry, Scope};
pub use classpath::{build_classpath, ClasspathSet};
pub use config::{LaunchManifest, Options, ProjectContext, Validate, ValidationResult};
pub use fork::{build_fork, DeclaredProperties, ForkMode, ForkSpec, ForkedProcess};
pub use launch::{ExecutionOutcome, Launcher, SkipReason};
pub use plan::{build_plan, ExecutionPlan};
pub use provider::{select_provider, Provider, TestSuite};
pub use report::{build_reporters, ReportFormat, ReportOptions, Reporter, ReporterSpec};
pub use resolver::{
    DependencyResolver, LocalRepository, LocalRepositoryResolver, RemoteRepository,
    ResolutionError,
};
pub use runner::{BooterCommand, CommandBooter, TestRunner};
pub use scope::{build_selection, PatternSet, TestSelectionSpec};
