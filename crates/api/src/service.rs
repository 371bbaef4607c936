//! The `ExecutionService` trait: what the editor needs from a backend.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use engine::{WorkflowRequest, WorkflowResponse};

use crate::ApiError;

/// Error reported when the validation endpoint cannot be used at all.
pub const VALIDATION_UNREACHABLE: &str = "Failed to connect to validation service";

/// Answer of the validation endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ValidationReport {
    pub fn valid() -> Self {
        Self {
            valid: true,
            errors: None,
        }
    }

    /// The negative report every validation failure degrades to.
    pub fn unreachable() -> Self {
        Self {
            valid: false,
            errors: Some(vec![VALIDATION_UNREACHABLE.to_owned()]),
        }
    }

    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}

/// A backend that can run and check workflows.
#[async_trait]
pub trait ExecutionService: Send + Sync {
    /// Run the workflow with the given input.
    async fn execute(&self, request: &WorkflowRequest) -> Result<WorkflowResponse, ApiError>;

    /// Check the workflow. Never fails: problems come back as a negative report.
    async fn validate(&self, request: &WorkflowRequest) -> ValidationReport;
}
