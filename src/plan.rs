//! Execution plan assembly.
//!
//! [`build_plan`] runs every planning step in order and is the single place
//! where declared system properties are applied process-wide.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::classpath::{build_classpath, ClasspathSet};
use crate::config::{Options, ProjectContext};
use crate::error::Result;
use crate::fork::{build_fork, DeclaredProperties, ForkSpec};
use crate::provider::{select_provider, Provider, TestSuite};
use crate::report::{build_reporters, ReportOptions, ReporterSpec};
use crate::resolver::DependencyResolver;
use crate::scope::{build_selection, TestSelectionSpec};
use crate::sysprops;

/// Everything the booter needs for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub provider: Provider,
    pub classpath: ClasspathSet,
    pub selection: TestSelectionSpec,
    /// Suites derived from the selection for the chosen provider.
    pub suites: Vec<TestSuite>,
    pub fork: ForkSpec,
    pub reporters: ReporterSpec,
    pub reports_directory: PathBuf,
    pub system_properties: DeclaredProperties,
}

/// Builds the execution plan for a run.
///
/// When the run does not fork, the declared system properties are applied to
/// the process-wide table before returning.
pub fn build_plan<R: DependencyResolver + ?Sized>(
    project: &ProjectContext,
    options: &Options,
    resolver: &R,
) -> Result<ExecutionPlan> {
    let provider = select_provider(&project.dependencies)?;
    let classpath = build_classpath(project, provider, resolver)?;
    let selection = build_selection(project, options, provider)?;
    let suites = provider.suites(&selection);

    let system_properties = DeclaredProperties::declare(project, options);
    let fork = build_fork(project, options, &system_properties)?;
    if !fork.is_forking() {
        sysprops::apply_process_wide(system_properties.iter());
    }

    let reports_directory = options.reports_directory(project);
    let reporters = build_reporters(
        ReportOptions {
            use_file: options.use_file,
            print_summary: options.print_summary,
            report_format: &options.report_format,
            forking: fork.is_forking(),
        },
        &reports_directory,
    );

    tracing::debug!(
        provider = %provider,
        fork_mode = %fork.mode,
        suites = suites.len(),
        reporters = reporters.len(),
        "built execution plan"
    );

    Ok(ExecutionPlan {
        provider,
        classpath,
        selection,
        suites,
        fork,
        reporters,
        reports_directory,
        system_properties,
    })
}
