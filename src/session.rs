//! Bearer tokens collected during a run
//!
//! Tokens are written by the login scenarios and live until the process
//! exits. There is no expiry or refresh.

use std::fmt;

/// Which account a token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Admin,
    Student,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Student => write!(f, "student"),
        }
    }
}

/// Run-scoped credential store with one slot per role
#[derive(Debug, Default, Clone)]
pub struct Credentials {
    admin: Option<String>,
    student: Option<String>,
}

impl Credentials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a token, replacing whatever the slot held
    pub fn set(&mut self, role: Role, token: impl Into<String>) {
        let token = token.into();
        tracing::debug!(%role, "storing bearer token");
        match role {
            Role::Admin => self.admin = Some(token),
            Role::Student => self.student = Some(token),
        }
    }

    pub fn get(&self, role: Role) -> Option<&str> {
        match role {
            Role::Admin => self.admin.as_deref(),
            Role::Student => self.student.as_deref(),
        }
    }

    pub fn admin(&self) -> Option<&str> {
        self.get(Role::Admin)
    }

    pub fn student(&self) -> Option<&str> {
        self.get(Role::Student)
    }
}
