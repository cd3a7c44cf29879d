//! Launch orchestration: plan, run once, interpret the result.

use serde::{Deserialize, Serialize};

use crate::config::{Options, ProjectContext, Validate};
use crate::error::{Error, Result};
use crate::plan::build_plan;
use crate::resolver::DependencyResolver;
use crate::runner::TestRunner;

/// Why a run did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SkipReason {
    /// `skip` was set.
    Requested,
    /// The test classes directory does not exist.
    NoTestClasses,
}

/// Final result of a launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExecutionOutcome {
    /// All tests passed.
    Success,
    /// Nothing was run.
    Skipped(SkipReason),
    /// Tests ran with failures; `ignored` when failures are tolerated.
    Failure { ignored: bool },
    /// The runner could not start or boot.
    LaunchFault(String),
}

impl ExecutionOutcome {
    /// Returns true if the outcome should fail the surrounding build.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ExecutionOutcome::Failure { ignored: false } | ExecutionOutcome::LaunchFault(_)
        )
    }

    /// Converts fatal outcomes into errors.
    pub fn into_result(self) -> Result<ExecutionOutcome> {
        match self {
            ExecutionOutcome::Failure { ignored: false } => Err(Error::TestFailure),
            ExecutionOutcome::LaunchFault(reason) => Err(Error::LaunchFault(reason)),
            outcome => Ok(outcome),
        }
    }
}

/// Plans test runs and hands them to a runner.
pub struct Launcher<R: DependencyResolver, T: TestRunner> {
    resolver: R,
    runner: T,
}

impl<R: DependencyResolver, T: TestRunner> Launcher<R, T> {
    /// Creates a new launcher.
    pub fn new(resolver: R, runner: T) -> Self {
        Self { resolver, runner }
    }

    /// Returns the runner tests are handed to.
    pub fn runner(&self) -> &T {
        &self.runner
    }

    /// Plans and runs the tests for a project.
    ///
    /// Planning failures are returned as errors. Everything the runner
    /// reports, including launch faults, comes back as an outcome.
    pub async fn execute_tests(
        &self,
        project: &ProjectContext,
        options: &Options,
    ) -> Result<ExecutionOutcome> {
        if options.skip {
            tracing::info!("Tests are skipped.");
            return Ok(ExecutionOutcome::Skipped(SkipReason::Requested));
        }

        if !project.test_classes_directory.exists() {
            tracing::info!("No tests to run.");
            return Ok(ExecutionOutcome::Skipped(SkipReason::NoTestClasses));
        }

        for warning in options.validate().warnings {
            tracing::warn!("{}", warning);
        }

        let plan = build_plan(project, options, &self.resolver)?;

        tracing::info!(
            runner = self.runner.name(),
            "Surefire report directory: {}",
            plan.reports_directory.display()
        );

        let success = match self.runner.run(&plan).await {
            Ok(success) => success,
            Err(e) => {
                tracing::error!(error = %e, "test launch failed");
                return Ok(ExecutionOutcome::LaunchFault(e.to_string()));
            }
        };

        if success {
            return Ok(ExecutionOutcome::Success);
        }

        if options.test_failure_ignore {
            tracing::error!("There are test failures.");
        }
        Ok(ExecutionOutcome::Failure {
            ignored: options.test_failure_ignore,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactCoordinate;
    use crate::plan::ExecutionPlan;
    use crate::resolver::{LocalRepository, RemoteRepository, ResolutionError};
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    struct NamedJarResolver;

    impl DependencyResolver for NamedJarResolver {
        fn resolve_transitively(
            &self,
            artifact: &ArtifactCoordinate,
            _local: &LocalRepository,
            _remotes: &[RemoteRepository],
        ) -> std::result::Result<Vec<PathBuf>, ResolutionError> {
            Ok(vec![PathBuf::from(format!("/repo/{}.jar", artifact.name))])
        }
    }

    /// Runner returning a canned answer and counting calls.
    struct ScriptedRunner {
        answer: fn() -> Result<bool>,
        calls: AtomicUsize,
    }

    impl ScriptedRunner {
        fn new(answer: fn() -> Result<bool>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl TestRunner for ScriptedRunner {
        async fn run(&self, _plan: &ExecutionPlan) -> Result<bool> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.answer)()
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn project(temp: &TempDir) -> ProjectContext {
        let mut project = ProjectContext::new(temp.path(), LocalRepository::new("/repo"));
        std::fs::create_dir_all(&project.test_classes_directory).unwrap();
        project
            .plugin_artifacts
            .insert(ArtifactCoordinate::new("org.apache.maven.surefire", "surefire-booter", "2.0"));
        project
            .dependencies
            .insert(ArtifactCoordinate::new("junit", "junit", "3.8.1"));
        project
    }

    fn forked() -> Options {
        Options::default().with_fork_mode("once")
    }

    #[tokio::test]
    async fn passing_run_is_success() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(NamedJarResolver, ScriptedRunner::new(|| Ok(true)));

        let outcome = launcher.execute_tests(&project(&temp), &forked()).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Success);
        assert_eq!(launcher.runner.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failing_run_is_fatal_unless_ignored() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(NamedJarResolver, ScriptedRunner::new(|| Ok(false)));

        let outcome = launcher.execute_tests(&project(&temp), &forked()).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Failure { ignored: false });
        assert!(outcome.is_fatal());
        assert!(matches!(outcome.into_result(), Err(Error::TestFailure)));

        let options = Options {
            test_failure_ignore: true,
            ..forked()
        };
        let outcome = launcher.execute_tests(&project(&temp), &options).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Failure { ignored: true });
        assert!(!outcome.is_fatal());
        assert!(outcome.into_result().is_ok());
    }

    #[tokio::test]
    async fn launch_fault_is_never_ignored() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(
            NamedJarResolver,
            ScriptedRunner::new(|| Err(Error::Launch("cannot boot".to_string()))),
        );
        let options = Options {
            test_failure_ignore: true,
            ..forked()
        };

        let outcome = launcher.execute_tests(&project(&temp), &options).await.unwrap();
        assert!(matches!(&outcome, ExecutionOutcome::LaunchFault(reason) if reason.contains("cannot boot")));
        assert!(outcome.is_fatal());
        assert!(matches!(outcome.into_result(), Err(Error::LaunchFault(_))));
    }

    #[tokio::test]
    async fn skip_does_not_run() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(NamedJarResolver, ScriptedRunner::new(|| Ok(true)));
        let options = Options {
            skip: true,
            ..forked()
        };

        let outcome = launcher.execute_tests(&project(&temp), &options).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Skipped(SkipReason::Requested));
        assert_eq!(launcher.runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_test_classes_does_not_plan_or_run() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(NamedJarResolver, ScriptedRunner::new(|| Ok(true)));
        // No framework declared either; planning would fail if it ran.
        let project = ProjectContext::new(temp.path(), LocalRepository::new("/repo"));

        let outcome = launcher.execute_tests(&project, &forked()).await.unwrap();
        assert_eq!(outcome, ExecutionOutcome::Skipped(SkipReason::NoTestClasses));
        assert_eq!(launcher.runner.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn planning_errors_do_not_run() {
        let temp = TempDir::new().unwrap();
        let launcher = Launcher::new(NamedJarResolver, ScriptedRunner::new(|| Ok(true)));

        let err = launcher
            .execute_tests(&project(&temp), &Options::default().with_fork_mode("twice"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedForkMode(mode) if mode == "twice"));
        assert_eq!(launcher.runner.calls.load(Ordering::SeqCst), 0);
    }
}
