//! Single-call checks: API health and the aggregate endpoints

use async_trait::async_trait;

use crate::common::Result;
use crate::http::{Auth, CallSpec};
use crate::testing::TestRun;

use super::{Outcome, Scenario, ScenarioInfo};

static HEALTH_INFO: ScenarioInfo = ScenarioInfo {
    name: "Health Check",
    requires: &[],
    critical: false,
};

/// `GET /` without credentials
pub struct HealthCheck;

#[async_trait]
impl Scenario for HealthCheck {
    fn info(&self) -> &ScenarioInfo {
        &HEALTH_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let result = run
            .call(CallSpec::get("Health Check", "", 200).with_auth(Auth::Anonymous))
            .await;
        Ok(Outcome::from_call(&result))
    }
}

static STATS_INFO: ScenarioInfo = ScenarioInfo {
    name: "Dashboard Stats",
    requires: &["Admin Login"],
    critical: false,
};

/// `GET /stats` as admin
pub struct DashboardStats;

#[async_trait]
impl Scenario for DashboardStats {
    fn info(&self) -> &ScenarioInfo {
        &STATS_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let result = run.call(CallSpec::get("Dashboard Stats", "stats", 200)).await;
        Ok(Outcome::from_call(&result))
    }
}

static ITEMS_INFO: ScenarioInfo = ScenarioInfo {
    name: "Get Items",
    requires: &["Admin Login"],
    critical: false,
};

/// `GET /items` as admin
pub struct GetItems;

#[async_trait]
impl Scenario for GetItems {
    fn info(&self) -> &ScenarioInfo {
        &ITEMS_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let result = run.call(CallSpec::get("Get Items", "items", 200)).await;
        Ok(Outcome::from_call(&result))
    }
}
