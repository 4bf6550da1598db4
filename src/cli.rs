//! CLI entry handling
//!
//! Resolves configuration, builds the run context, and drives the default
//! suite.

use std::path::PathBuf;

use crate::common::config::Config;
use crate::common::Result;
use crate::http::Executor;
use crate::scenarios::default_suite;
use crate::testing::{print_plan, run_suite, TestRun};

/// Options collected from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Overrides the configured base URL
    pub base_url: Option<String>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
    /// Print the plan instead of running it
    pub list: bool,
}

/// Run the suite and return the process exit code
pub async fn dispatch(opts: RunOptions) -> Result<i32> {
    let mut config = Config::load(opts.config.as_deref())?;
    if let Some(base_url) = opts.base_url {
        config.base_url = base_url;
    }

    let suite = default_suite(&config);

    if opts.list {
        print_plan(&suite);
        return Ok(0);
    }

    let executor = Executor::new(&config.base_url, config.http.timeout())?;
    tracing::info!(base_url = %config.base_url, scenarios = suite.len(), "starting run");

    let mut run = TestRun::new(executor);
    let summary = run_suite(&mut run, &suite).await;
    summary.print();

    Ok(summary.exit_code())
}
