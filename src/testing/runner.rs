//! Run controller
//!
//! Executes scenarios in order, one at a time. Each scenario runs inside a
//! boundary that turns errors and panics into a failed outcome, so one
//! broken scenario never takes the rest of the run down with it. The
//! exception is a scenario declared critical: if it does not pass, the run
//! stops there.

use colored::Colorize;
use futures_util::FutureExt;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;

use crate::scenarios::{Outcome, Scenario, ScenarioInfo};

use super::context::TestRun;

/// Outcome of one scenario
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    pub name: String,
    pub outcome: Outcome,
}

/// Aggregate result of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub tests_run: usize,
    pub tests_passed: usize,
    pub results: Vec<ScenarioResult>,
    /// Name of the critical scenario that stopped the run, if any
    pub halted_by: Option<String>,
}

impl RunSummary {
    /// True when every attempted call passed and no critical scenario
    /// stopped the run. Per-scenario outcomes are reported, not scored.
    pub fn all_passed(&self) -> bool {
        self.halted_by.is_none() && self.tests_passed == self.tests_run
    }

    /// Process exit status: 0 on full success, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        if self.all_passed() {
            0
        } else {
            1
        }
    }

    pub fn outcome_of(&self, name: &str) -> Option<&Outcome> {
        self.results
            .iter()
            .find(|r| r.name == name)
            .map(|r| &r.outcome)
    }

    /// Print the closing report
    pub fn print(&self) {
        println!("\n{}", "=".repeat(50));
        println!(
            "{} {}/{} passed",
            "Test Results:".blue().bold(),
            self.tests_passed,
            self.tests_run
        );

        for result in &self.results {
            match &result.outcome {
                Outcome::Passed => println!("  {} {}", "✓".green(), result.name),
                Outcome::Failed(detail) => {
                    println!("  {} {} ({})", "✗".red(), result.name, detail.dimmed())
                }
                Outcome::Skipped(reason) => {
                    println!("  {} {} ({})", "-".yellow(), result.name, reason.dimmed())
                }
            }
        }

        if let Some(name) = &self.halted_by {
            println!("  {}", format!("Run stopped after {name}").yellow());
        }

        if self.all_passed() {
            println!("\n{}", "All tests passed!".green().bold());
        } else {
            println!("\n{}", "Some tests failed".red().bold());
        }
    }
}

/// Run `scenarios` in order against `run`
pub async fn run_suite(run: &mut TestRun, scenarios: &[Box<dyn Scenario>]) -> RunSummary {
    println!("{}", "Starting Lost & Found API Tests".bold());
    println!("   Base URL: {}", run.executor().base_url().dimmed());
    println!("{}", "=".repeat(50));

    let mut passed: HashMap<&'static str, bool> = HashMap::new();
    let mut results = Vec::with_capacity(scenarios.len());
    let mut halted_by = None;

    for scenario in scenarios {
        let info = scenario.info();
        tracing::debug!(scenario = info.name, "starting scenario");

        let outcome = match unmet_prerequisite(info, &passed) {
            Some(missing) => Outcome::Skipped(format!("prerequisite '{missing}' not satisfied")),
            None => run_isolated(scenario.as_ref(), run).await,
        };

        match &outcome {
            Outcome::Passed => {}
            Outcome::Failed(detail) => {
                println!("{} {} failed: {}", "✗".red(), info.name, detail)
            }
            Outcome::Skipped(reason) => {
                println!("\n{} {} skipped: {}", "-".yellow(), info.name, reason)
            }
        }
        tracing::debug!(scenario = info.name, %outcome, "scenario finished");

        passed.insert(info.name, outcome.is_passed());
        let stop = info.critical && !outcome.is_passed();
        results.push(ScenarioResult {
            name: info.name.to_string(),
            outcome,
        });

        if stop {
            println!(
                "{} {} failed - stopping critical tests",
                "✗".red().bold(),
                info.name
            );
            halted_by = Some(info.name.to_string());
            break;
        }
    }

    RunSummary {
        tests_run: run.tests_run(),
        tests_passed: run.tests_passed(),
        results,
        halted_by,
    }
}

fn unmet_prerequisite(
    info: &ScenarioInfo,
    passed: &HashMap<&'static str, bool>,
) -> Option<&'static str> {
    info.requires
        .iter()
        .copied()
        .find(|name| !passed.get(name).copied().unwrap_or(false))
}

async fn run_isolated(scenario: &dyn Scenario, run: &mut TestRun) -> Outcome {
    match AssertUnwindSafe(scenario.run(run)).catch_unwind().await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => Outcome::Failed(e.to_string()),
        Err(panic) => Outcome::Failed(format!("panicked: {}", panic_message(&*panic))),
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Print the execution plan without running anything
pub fn print_plan(scenarios: &[Box<dyn Scenario>]) {
    println!("{}", "Scenarios:".cyan());
    for (i, scenario) in scenarios.iter().enumerate() {
        let info = scenario.info();
        let mut line = format!("  {}. {}", i + 1, info.name);
        if !info.requires.is_empty() {
            line.push_str(&format!(" (requires: {})", info.requires.join(", ")));
        }
        if info.critical {
            line.push_str(&format!(" {}", "[critical]".red()));
        }
        println!("{line}");
    }
}
