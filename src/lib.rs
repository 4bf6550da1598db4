//! Lost & Found API tester
//!
//! A sequential integration-test harness for the Lost & Found admin API.
//! Scenarios run in a fixed order against one shared `TestRun`, carrying
//! login tokens from call to call and reporting pass/fail counts at the end.

pub mod cli;
pub mod common;
pub mod http;
pub mod scenarios;
pub mod session;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use http::{Auth, CallResult, CallSpec, Executor, Method};
pub use scenarios::{default_suite, Outcome, Scenario, ScenarioInfo};
pub use session::{Credentials, Role};
pub use testing::{run_suite, RunSummary, TestRun};
