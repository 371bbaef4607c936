//! Loading and result state of the execute panel.
//!
//! Each submission gets a [`Ticket`]. Starting a submission clears the
//! previous outcome at once; settling with anything but the newest ticket is
//! discarded, so the latest *submission* wins regardless of which response
//! arrives last.

use tracing::{debug, info, instrument, warn};

use engine::{WorkflowRequest, WorkflowResponse};

use crate::{ApiError, ExecutionService};

/// Identifies one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

/// Terminal result of a submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Success(WorkflowResponse),
    /// Error message shown to the user.
    Failure(String),
}

impl From<Result<WorkflowResponse, ApiError>> for Outcome {
    fn from(result: Result<WorkflowResponse, ApiError>) -> Self {
        match result {
            Ok(response) => Self::Success(response),
            Err(e) => Self::Failure(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ExecutionState {
    #[default]
    Idle,
    Submitting { ticket: Ticket },
    Settled { ticket: Ticket, outcome: Outcome },
}

/// Tracks the newest submission and its outcome.
#[derive(Debug, Default)]
pub struct SubmissionTracker {
    state: ExecutionState,
    issued: u64,
}

impl SubmissionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ExecutionState::Submitting { .. })
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.state {
            ExecutionState::Settled { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Start a submission. Any earlier outcome is cleared and any submission
    /// still in flight is superseded.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        if let ExecutionState::Submitting { ticket: previous } = self.state {
            debug!(?previous, ?ticket, "superseding in-flight submission");
        }
        self.state = ExecutionState::Submitting { ticket };
        ticket
    }

    /// Record the result for `ticket`. Returns `false` if the ticket was
    /// superseded or already settled; the state is untouched in that case.
    pub fn settle(&mut self, ticket: Ticket, result: Result<WorkflowResponse, ApiError>) -> bool {
        match self.state {
            ExecutionState::Submitting { ticket: current } if current == ticket => {
                let outcome = Outcome::from(result);
                match &outcome {
                    Outcome::Success(resp) => {
                        info!(?ticket, status = %resp.status, "execution settled")
                    }
                    Outcome::Failure(message) => warn!(?ticket, %message, "execution failed"),
                }
                self.state = ExecutionState::Settled { ticket, outcome };
                true
            }
            _ => {
                debug!(?ticket, "discarding stale execution result");
                false
            }
        }
    }

    /// Submit `request` and wait for its outcome.
    ///
    /// Holds the tracker for the whole call; callers that need overlapping
    /// submissions use [`begin`](Self::begin) and [`settle`](Self::settle)
    /// directly.
    #[instrument(skip_all)]
    pub async fn submit<S>(&mut self, service: &S, request: &WorkflowRequest) -> &ExecutionState
    where
        S: ExecutionService + ?Sized,
    {
        let ticket = self.begin();
        let result = service.execute(request).await;
        self.settle(ticket, result);
        &self.state
    }
}

// ============================================================
// Unit tests
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExecutionService;
    use crate::ValidationReport;
    use engine::Workflow;
    use serde_json::{json, Map};
    use std::time::Duration;

    fn request(name: &str) -> WorkflowRequest {
        WorkflowRequest {
            workflow: Workflow {
                name: Some(name.into()),
                nodes: vec![],
                edges: vec![],
            },
            input: Map::new(),
        }
    }

    #[tokio::test]
    async fn successful_submission_settles_once() {
        let mock = MockExecutionService::succeeding(json!({ "text": "done" }));
        let mut tracker = SubmissionTracker::new();

        let state = tracker.submit(&mock, &request("a")).await;
        assert!(matches!(state, ExecutionState::Settled { outcome: Outcome::Success(_), .. }));
        assert_eq!(mock.call_count(), 1);
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn failure_message_comes_from_the_status_text() {
        let mock = MockExecutionService::failing(502, "Bad Gateway");
        let mut tracker = SubmissionTracker::new();

        tracker.submit(&mock, &request("a")).await;
        assert_eq!(
            tracker.outcome(),
            Some(&Outcome::Failure("API request failed: Bad Gateway".into()))
        );
    }

    #[tokio::test]
    async fn mock_validation_returns_the_injected_report() {
        let mock = MockExecutionService::succeeding(json!(null))
            .with_validation(ValidationReport::unreachable());

        let report = mock.validate(&request("a")).await;
        assert!(!report.valid);
        assert_eq!(report.errors(), ["Failed to connect to validation service"]);
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn begin_clears_the_previous_outcome() {
        let mut tracker = SubmissionTracker::new();
        let first = tracker.begin();
        let failed = ApiError::RequestFailed { status: 500, status_text: "x".into() };
        tracker.settle(first, Err(failed));
        assert!(tracker.outcome().is_some());

        tracker.begin();
        assert!(tracker.outcome().is_none());
        assert!(tracker.is_loading());
    }

    #[test]
    fn a_ticket_settles_at_most_once() {
        let mut tracker = SubmissionTracker::new();
        let ticket = tracker.begin();
        let fail = || Err(ApiError::RequestFailed { status: 500, status_text: "x".into() });

        assert!(tracker.settle(ticket, fail()));
        assert!(!tracker.settle(ticket, fail()));
    }

    #[tokio::test(start_paused = true)]
    async fn latest_submission_wins_even_if_it_finishes_first() {
        let slow =
            MockExecutionService::succeeding(json!("slow")).with_delay(Duration::from_millis(200));
        let fast =
            MockExecutionService::succeeding(json!("fast")).with_delay(Duration::from_millis(10));
        let mut tracker = SubmissionTracker::new();

        let first = tracker.begin();
        let second = tracker.begin();
        let (slow_req, fast_req) = (request("first"), request("second"));

        let (slow_result, fast_result) =
            tokio::join!(slow.execute(&slow_req), fast.execute(&fast_req));

        assert!(tracker.settle(second, fast_result));
        assert!(!tracker.settle(first, slow_result));
        match tracker.outcome() {
            Some(Outcome::Success(resp)) => assert_eq!(resp.output, json!("fast")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
