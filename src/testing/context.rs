//! Mutable state shared by the scenarios of one run

use colored::Colorize;

use crate::http::{CallResult, CallSpec, Executor, Method};
use crate::session::Credentials;

/// Record of one issued call
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub name: String,
    pub method: Method,
    pub endpoint: String,
    pub status: Option<u16>,
    pub success: bool,
}

/// The run context handed to every scenario
///
/// Owns the executor, the credential store, the pass/fail counters, and a
/// log of every call issued so far.
#[derive(Debug)]
pub struct TestRun {
    executor: Executor,
    pub credentials: Credentials,
    tests_run: usize,
    tests_passed: usize,
    calls: Vec<CallRecord>,
}

impl TestRun {
    pub fn new(executor: Executor) -> Self {
        Self {
            executor,
            credentials: Credentials::new(),
            tests_run: 0,
            tests_passed: 0,
            calls: Vec::new(),
        }
    }

    pub fn tests_run(&self) -> usize {
        self.tests_run
    }

    pub fn tests_passed(&self) -> usize {
        self.tests_passed
    }

    pub fn calls(&self) -> &[CallRecord] {
        &self.calls
    }

    pub fn executor(&self) -> &Executor {
        &self.executor
    }

    /// Issue one call, count it, and print its progress lines
    pub async fn call(&mut self, spec: CallSpec) -> CallResult {
        self.tests_run += 1;
        println!("\n{} {}...", "Testing".blue().bold(), spec.name.white().bold());
        println!("   URL: {}", self.executor.url(&spec.endpoint).dimmed());

        let result = self.executor.execute(&spec, &self.credentials).await;

        if result.success {
            self.tests_passed += 1;
            println!(
                "{} Passed - Status: {}",
                "✓".green(),
                result.status.unwrap_or(spec.expected_status)
            );
        } else {
            match result.status {
                Some(status) => println!(
                    "{} Failed - Expected {}, got {}",
                    "✗".red(),
                    spec.expected_status,
                    status
                ),
                None => println!("{} Failed - Error: {}", "✗".red(), "no response".red()),
            }
            if let Some(error) = &result.error {
                println!("   Error: {}", error);
            }
        }

        self.calls.push(CallRecord {
            name: spec.name,
            method: spec.method,
            endpoint: spec.endpoint,
            status: result.status,
            success: result.success,
        });

        result
    }

    /// Number of calls with `method` issued since the `since`-th call
    pub fn count_calls_since(&self, since: usize, method: Method) -> usize {
        self.calls
            .iter()
            .skip(since)
            .filter(|c| c.method == method)
            .count()
    }

    pub fn all_calls_passed(&self) -> bool {
        self.tests_passed == self.tests_run
    }
}
