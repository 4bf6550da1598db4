//! Test run orchestration
//!
//! `TestRun` is the mutable context every scenario receives; the runner
//! sequences scenarios over it and aggregates their outcomes.

mod context;
mod runner;

pub use context::{CallRecord, TestRun};
pub use runner::{print_plan, run_suite, RunSummary, ScenarioResult};
