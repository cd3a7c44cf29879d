//! Runner that launches the booter as a child process.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use crate::error::{Error, Result};
use crate::fork::{default_jvm_executable, BASEDIR_PROPERTY};
use crate::plan::ExecutionPlan;
use crate::sysprops;

use super::TestRunner;

/// Entry point of the booter on the runner classpath.
pub const BOOTER_MAIN_CLASS: &str = "org.apache.maven.surefire.booter.SurefireBooter";

/// Fully resolved command line for one booter launch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooterCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_directory: PathBuf,
    pub environment: BTreeMap<String, String>,
}

impl BooterCommand {
    /// Builds the command for a plan whose JSON lives at `plan_file`.
    ///
    /// Forked plans use the fork settings. In-process plans use the default
    /// executable in the base directory and carry the process-wide property
    /// table.
    pub fn from_plan(
        plan: &ExecutionPlan,
        plan_file: &Path,
        main_class: &str,
        process_properties: &BTreeMap<String, String>,
    ) -> Result<Self> {
        let mut args = Vec::new();

        let (program, working_directory, environment) = match &plan.fork.process {
            Some(process) => {
                if let Some(arg_line) = &process.arg_line {
                    args.extend(arg_line.split_whitespace().map(str::to_string));
                }
                args.extend(
                    process
                        .system_properties
                        .iter()
                        .map(|(key, value)| format!("-D{}={}", key, value)),
                );
                (
                    process.executable.clone(),
                    process.working_directory.clone(),
                    process.environment.clone(),
                )
            }
            None => {
                args.extend(
                    process_properties
                        .iter()
                        .map(|(key, value)| format!("-D{}={}", key, value)),
                );
                let basedir = plan
                    .system_properties
                    .get(BASEDIR_PROPERTY)
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from("."));
                (default_jvm_executable(), basedir, BTreeMap::new())
            }
        };

        let classpath = std::env::join_paths(
            plan.classpath
                .runner_classpath
                .iter()
                .chain(plan.classpath.test_classpath.iter()),
        )
        .map_err(|e| Error::Launch(format!("invalid classpath entry: {}", e)))?;

        args.push("-classpath".to_string());
        args.push(classpath.to_string_lossy().into_owned());
        args.push(main_class.to_string());
        args.push(plan_file.display().to_string());

        Ok(Self {
            program,
            args,
            working_directory,
            environment,
        })
    }
}

/// Runner that writes the plan to the reports directory and starts the booter.
pub struct CommandBooter {
    main_class: String,
}

impl Default for CommandBooter {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandBooter {
    /// Creates a booter using the standard booter main class.
    pub fn new() -> Self {
        Self {
            main_class: BOOTER_MAIN_CLASS.to_string(),
        }
    }

    /// Creates a booter with a custom main class.
    pub fn with_main_class(main_class: impl Into<String>) -> Self {
        Self {
            main_class: main_class.into(),
        }
    }

    /// Writes the plan as JSON and returns its path.
    fn write_plan(&self, plan: &ExecutionPlan) -> Result<PathBuf> {
        std::fs::create_dir_all(&plan.reports_directory)?;
        let plan_file = plan
            .reports_directory
            .join(format!("surefire-plan-{}.json", uuid::Uuid::new_v4()));
        let json = serde_json::to_string_pretty(plan)
            .map_err(|e| Error::Launch(format!("failed to serialize plan: {}", e)))?;
        std::fs::write(&plan_file, json)?;
        Ok(plan_file)
    }

    /// Starts the booter for a written plan and streams its output to the log.
    async fn launch(&self, plan: &ExecutionPlan, plan_file: &Path) -> Result<bool> {
        let command =
            BooterCommand::from_plan(plan, plan_file, &self.main_class, &sysprops::snapshot())?;

        tracing::info!(
            program = ?command.program,
            working_dir = ?command.working_directory,
            fork_mode = %plan.fork.mode,
            "starting test booter"
        );
        tracing::debug!(args = ?command.args, "booter arguments");

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_directory)
            .envs(&command.environment)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .stdin(Stdio::null())
            .spawn()
            .map_err(|e| Error::Launch(format!("failed to spawn {:?}: {}", command.program, e)))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| Error::Launch("booter stdout was not captured".to_string()))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| Error::Launch("booter stderr was not captured".to_string()))?;

        let mut stdout_reader = BufReader::new(stdout).lines();
        let mut stderr_reader = BufReader::new(stderr).lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            tokio::select! {
                line = stdout_reader.next_line(), if stdout_open => {
                    match line {
                        Ok(Some(line)) => tracing::info!(stream = "stdout", "{}", line),
                        Ok(None) => stdout_open = false,
                        Err(e) => {
                            tracing::error!(error = %e, "error reading booter stdout");
                            stdout_open = false;
                        }
                    }
                }
                line = stderr_reader.next_line(), if stderr_open => {
                    match line {
                        Ok(Some(line)) => tracing::warn!(stream = "stderr", "{}", line),
                        Ok(None) => stderr_open = false,
                        Err(e) => {
                            tracing::error!(error = %e, "error reading booter stderr");
                            stderr_open = false;
                        }
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| Error::Launch(format!("failed to wait for booter: {}", e)))?;

        tracing::debug!(status = %status, "booter exited");
        Ok(status.success())
    }
}

#[async_trait]
impl TestRunner for CommandBooter {
    async fn run(&self, plan: &ExecutionPlan) -> Result<bool> {
        let plan_file = self
            .write_plan(plan)
            .map_err(|e| Error::Launch(format!("failed to write plan: {}", e)))?;

        let result = self.launch(plan, &plan_file).await;

        if let Err(e) = std::fs::remove_file(&plan_file) {
            tracing::warn!(file = ?plan_file, error = %e, "failed to remove plan file");
        }
        result
    }

    fn name(&self) -> &str {
        "surefire-booter"
    }
}
