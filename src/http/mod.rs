//! HTTP call execution
//!
//! `CallSpec` describes a request, `Executor` issues it, and `CallResult`
//! reports whether the observed status matched the expected one.

pub mod client;
pub mod types;

pub use client::Executor;
pub use types::{Attachment, Auth, CallResult, CallSpec, Method};
