//! Business-level scenarios against the Lost & Found API
//!
//! Each scenario composes one or more calls through the shared `TestRun`
//! and reports an `Outcome`. Ordering constraints are declared through
//! `ScenarioInfo::requires` rather than implied by list position.

pub mod auth;
pub mod general;
pub mod students;
pub mod workbook;

use async_trait::async_trait;
use std::fmt;

use crate::common::config::Config;
use crate::common::Result;
use crate::http::CallResult;
use crate::testing::TestRun;

pub use auth::{AdminLogin, StudentLogin};
pub use general::{DashboardStats, GetItems, HealthCheck};
pub use students::{DeleteStudent, ExcelUpload, GetStudents};

/// Static description of a scenario
#[derive(Debug, Clone)]
pub struct ScenarioInfo {
    /// Display name, also used to reference the scenario as a prerequisite
    pub name: &'static str,
    /// Scenarios that must have passed before this one runs
    pub requires: &'static [&'static str],
    /// A failure here stops the rest of the run
    pub critical: bool,
}

/// How a scenario ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed(String),
    Skipped(String),
}

impl Outcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, Outcome::Passed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Map a call result onto an outcome
    pub fn from_call(result: &CallResult) -> Self {
        if result.success {
            Outcome::Passed
        } else {
            Outcome::Failed(call_failure_detail(result))
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Passed => write!(f, "passed"),
            Outcome::Failed(detail) => write!(f, "failed: {detail}"),
            Outcome::Skipped(reason) => write!(f, "skipped: {reason}"),
        }
    }
}

fn call_failure_detail(result: &CallResult) -> String {
    match (result.status, &result.error) {
        (Some(status), _) => format!("unexpected status {status}"),
        (None, Some(error)) => error.clone(),
        (None, None) => "request failed".to_string(),
    }
}

/// A named unit of verification
#[async_trait]
pub trait Scenario: Send + Sync {
    /// Scenario metadata
    fn info(&self) -> &ScenarioInfo;

    /// Run the scenario against the shared run context
    async fn run(&self, run: &mut TestRun) -> Result<Outcome>;

    fn name(&self) -> &'static str {
        self.info().name
    }
}

/// The standard suite, in execution order
///
/// Student login goes last: only the admin token is attached by default,
/// and the admin-dependent scenarios must all have run first.
pub fn default_suite(config: &Config) -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(HealthCheck),
        Box::new(AdminLogin::new(config.admin.clone())),
        Box::new(GetStudents),
        Box::new(ExcelUpload),
        Box::new(DeleteStudent),
        Box::new(DashboardStats),
        Box::new(GetItems),
        Box::new(StudentLogin::new(config.student.clone())),
    ]
}
