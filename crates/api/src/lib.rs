//! `api` crate: client side of the workflow execution service.
//!
//! Talks to two endpoints:
//!   POST /api/workflow/execute
//!   POST /validate
//!
//! [`ExecutionService`] is the seam the rest of the program codes against;
//! [`HttpExecutionService`] is the real implementation and
//! [`mock::MockExecutionService`] the test double. [`SubmissionTracker`] keeps
//! the execute panel's loading / result state.

pub mod config;
pub mod error;
pub mod http;
pub mod mock;
pub mod service;
pub mod submission;

pub use config::ApiConfig;
pub use error::ApiError;
pub use http::HttpExecutionService;
pub use service::{ExecutionService, ValidationReport, VALIDATION_UNREACHABLE};
pub use submission::{ExecutionState, Outcome, SubmissionTracker, Ticket};
