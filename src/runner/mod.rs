//! Test runner seam.
//!
//! The launcher hands a finished [`ExecutionPlan`] to a [`TestRunner`] and
//! reads back a single pass/fail signal.

mod booter;

pub use booter::{BooterCommand, CommandBooter, BOOTER_MAIN_CLASS};

use async_trait::async_trait;

use crate::error::Result;
use crate::plan::ExecutionPlan;

/// Trait for test runners.
#[async_trait]
pub trait TestRunner: Send + Sync {
    /// Runs the tests described by the plan.
    ///
    /// Returns `Ok(true)` when every test passed and `Ok(false)` when tests
    /// ran with failures. An `Err` means the run could not be started or
    /// booted at all.
    async fn run(&self, plan: &ExecutionPlan) -> Result<bool>;

    /// Returns the name of this runner.
    fn name(&self) -> &str;
}
