//! `MockExecutionService`: a test double for `ExecutionService`.
//!
//! Records every request it receives and answers with a programmer-specified
//! result, optionally after a delay so tests can overlap submissions.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Map, Value};

use engine::{WorkflowRequest, WorkflowResponse};

use crate::{ApiError, ExecutionService, ValidationReport};

/// Behaviour injected into `MockExecutionService` at construction time.
#[derive(Debug, Clone)]
pub enum MockBehaviour {
    /// Answer with this output and status `success`.
    Succeed(Value),
    /// Fail as if the service returned the given status.
    FailStatus { status: u16, status_text: String },
}

#[derive(Debug, Clone)]
pub struct MockExecutionService {
    pub behaviour: MockBehaviour,
    /// Returned by `validate`.
    pub validation: ValidationReport,
    pub delay: Option<Duration>,
    /// Every request seen by `execute` and `validate`, in call order.
    pub calls: Arc<Mutex<Vec<WorkflowRequest>>>,
}

impl MockExecutionService {
    /// A mock that always succeeds with `output`.
    pub fn succeeding(output: Value) -> Self {
        Self::with_behaviour(MockBehaviour::Succeed(output))
    }

    /// A mock that always fails with the given HTTP status.
    pub fn failing(status: u16, status_text: impl Into<String>) -> Self {
        Self::with_behaviour(MockBehaviour::FailStatus {
            status,
            status_text: status_text.into(),
        })
    }

    fn with_behaviour(behaviour: MockBehaviour) -> Self {
        Self {
            behaviour,
            validation: ValidationReport::valid(),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_validation(mut self, report: ValidationReport) -> Self {
        self.validation = report;
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    fn record(&self, request: &WorkflowRequest) {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());
    }
}

#[async_trait]
impl ExecutionService for MockExecutionService {
    async fn execute(&self, request: &WorkflowRequest) -> Result<WorkflowResponse, ApiError> {
        self.record(request);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        match &self.behaviour {
            MockBehaviour::Succeed(output) => Ok(WorkflowResponse {
                output: output.clone(),
                execution_time: Some(0.0),
                status: "success".to_owned(),
                extra: Map::new(),
            }),
            MockBehaviour::FailStatus { status, status_text } => Err(ApiError::RequestFailed {
                status: *status,
                status_text: status_text.clone(),
            }),
        }
    }

    async fn validate(&self, request: &WorkflowRequest) -> ValidationReport {
        self.record(request);
        self.validation.clone()
    }
}
