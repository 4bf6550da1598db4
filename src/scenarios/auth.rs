//! Login scenarios
//!
//! Both logins send an explicit JSON content-type header and no bearer
//! token. A successful response must carry a string `token`, which is stored
//! in the credential slot for that role.

use async_trait::async_trait;
use colored::Colorize;
use serde_json::{json, Value};

use crate::common::config::{AdminAccount, StudentAccount};
use crate::common::{preview, Result};
use crate::http::{Auth, CallSpec};
use crate::session::Role;
use crate::testing::TestRun;

use super::{Outcome, Scenario, ScenarioInfo};

/// Characters of a token shown on the console
const TOKEN_PREVIEW_CHARS: usize = 20;

static ADMIN_INFO: ScenarioInfo = ScenarioInfo {
    name: "Admin Login",
    requires: &[],
    critical: true,
};

/// `POST /auth/admin/login`, storing the admin token
pub struct AdminLogin {
    account: AdminAccount,
}

impl AdminLogin {
    pub fn new(account: AdminAccount) -> Self {
        Self { account }
    }
}

#[async_trait]
impl Scenario for AdminLogin {
    fn info(&self) -> &ScenarioInfo {
        &ADMIN_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let payload = json!({
            "username": self.account.username,
            "password": self.account.password,
        });
        Ok(login(run, "Admin Login", "auth/admin/login", payload, Role::Admin).await)
    }
}

static STUDENT_INFO: ScenarioInfo = ScenarioInfo {
    name: "Student Login",
    requires: &[],
    critical: false,
};

/// `POST /auth/student/login`, storing the student token
pub struct StudentLogin {
    account: StudentAccount,
}

impl StudentLogin {
    pub fn new(account: StudentAccount) -> Self {
        Self { account }
    }
}

#[async_trait]
impl Scenario for StudentLogin {
    fn info(&self) -> &ScenarioInfo {
        &STUDENT_INFO
    }

    async fn run(&self, run: &mut TestRun) -> Result<Outcome> {
        let payload = json!({
            "roll_number": self.account.roll_number,
            "dob": self.account.dob,
        });
        Ok(login(run, "Student Login", "auth/student/login", payload, Role::Student).await)
    }
}

async fn login(
    run: &mut TestRun,
    name: &str,
    endpoint: &str,
    payload: Value,
    role: Role,
) -> Outcome {
    let spec = CallSpec::post(name, endpoint, 200)
        .with_payload(payload)
        .with_header("Content-Type", "application/json")
        .with_auth(Auth::Anonymous);

    let result = run.call(spec).await;
    if !result.success {
        return Outcome::from_call(&result);
    }

    match result.str_field("token").filter(|t| !t.is_empty()) {
        Some(token) => {
            println!(
                "   {} token obtained: {}",
                role_label(role),
                preview(token, TOKEN_PREVIEW_CHARS).dimmed()
            );
            run.credentials.set(role, token);
            Outcome::Passed
        }
        None => Outcome::Failed(format!("{name} response did not include a token")),
    }
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::Admin => "Admin",
        Role::Student => "Student",
    }
}
