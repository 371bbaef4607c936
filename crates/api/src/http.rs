//! `ExecutionService` over HTTP, using `reqwest`.

use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use engine::{WorkflowRequest, WorkflowResponse};

use crate::{ApiConfig, ApiError, ExecutionService, ValidationReport};

/// Client for a remote execution service.
#[derive(Debug, Clone)]
pub struct HttpExecutionService {
    client: reqwest::Client,
    config: ApiConfig,
}

impl HttpExecutionService {
    /// # Errors
    /// [`ApiError::Client`] if the TLS backend cannot be initialised.
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(ApiError::Client)?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }
}

/// Reason phrase for a status, falling back to the bare code.
fn status_text(status: reqwest::StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_owned)
        .unwrap_or_else(|| status.as_str().to_owned())
}

#[async_trait]
impl ExecutionService for HttpExecutionService {
    #[instrument(
        skip_all,
        fields(
            nodes = request.workflow.nodes.len(),
            edges = request.workflow.edges.len()
        )
    )]
    async fn execute(&self, request: &WorkflowRequest) -> Result<WorkflowResponse, ApiError> {
        let url = self.config.execute_url();
        debug!(%url, "submitting workflow");

        let resp = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(ApiError::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "execution request rejected");
            return Err(ApiError::RequestFailed {
                status: status.as_u16(),
                status_text: status_text(status),
            });
        }

        resp.json::<WorkflowResponse>().await.map_err(ApiError::Decode)
    }

    #[instrument(skip_all, fields(nodes = request.workflow.nodes.len()))]
    async fn validate(&self, request: &WorkflowRequest) -> ValidationReport {
        let url = self.config.validate_url();

        let resp = match self.client.post(&url).json(request).send().await {
            Ok(resp) => resp,
            Err(e) => {
                warn!(error = %e, "validation service unreachable");
                return ValidationReport::unreachable();
            }
        };

        if !resp.status().is_success() {
            warn!(
                status = resp.status().as_u16(),
                "validation failed: {}",
                status_text(resp.status())
            );
            return ValidationReport::unreachable();
        }

        match resp.json::<ValidationReport>().await {
            Ok(report) => report,
            Err(e) => {
                warn!(error = %e, "validation response could not be decoded");
                ValidationReport::unreachable()
            }
        }
    }
}

// ============================================================
// Unit tests (against an in-process axum server)
// ============================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use engine::{Workflow, WorkflowRequest};
    use serde_json::{json, Map, Value};

    fn request() -> WorkflowRequest {
        WorkflowRequest {
            workflow: Workflow {
                name: Some("workflow_1".into()),
                nodes: vec![],
                edges: vec![],
            },
            input: Map::new(),
        }
    }

    /// Serve `router` on an ephemeral port and return a client pointed at it.
    async fn spawn(router: Router) -> HttpExecutionService {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        let config = ApiConfig::default().with_base_url(format!("http://{addr}"));
        HttpExecutionService::new(config).unwrap()
    }

    #[tokio::test]
    async fn execute_posts_the_request_and_decodes_the_response() {
        let router = Router::new().route(
            "/api/workflow/execute",
            post(|Json(body): Json<Value>| async move {
                Json(json!({
                    "output": { "echo": body["input"]["message"] },
                    "executionTime": 0.5,
                    "status": "success",
                    "runId": "r-1",
                }))
            }),
        );
        let service = spawn(router).await;

        let mut req = request();
        req.input.insert("message".into(), json!("Hello world"));
        let resp = service.execute(&req).await.unwrap();

        assert_eq!(resp.status, "success");
        assert_eq!(resp.output["echo"], json!("Hello world"));
        assert_eq!(resp.execution_time, Some(0.5));
        assert_eq!(resp.extra["runId"], json!("r-1"));
    }

    #[tokio::test]
    async fn non_success_status_carries_the_reason_phrase() {
        let router = Router::new().route(
            "/api/workflow/execute",
            post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
        );
        let service = spawn(router).await;

        let err = service.execute(&request()).await.unwrap_err();
        assert!(matches!(err, ApiError::RequestFailed { status: 500, .. }));
        assert_eq!(err.to_string(), "API request failed: Internal Server Error");
    }

    #[tokio::test]
    async fn validate_passes_the_report_through() {
        let router = Router::new().route(
            "/validate",
            post(|| async { Json(json!({ "valid": false, "errors": ["no output node"] })) }),
        );
        let service = spawn(router).await;

        let report = service.validate(&request()).await;
        assert!(!report.valid);
        assert_eq!(report.errors(), ["no output node".to_owned()]);
    }

    #[tokio::test]
    async fn validate_degrades_on_error_status() {
        let router = Router::new().route("/validate", post(|| async { StatusCode::NOT_FOUND }));
        let service = spawn(router).await;

        assert_eq!(service.validate(&request()).await, ValidationReport::unreachable());
    }

    #[tokio::test]
    async fn unreachable_service() {
        // bind then drop to get a port nobody listens on
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = ApiConfig::default().with_base_url(format!("http://{addr}"));
        let service = HttpExecutionService::new(config).unwrap();

        assert!(matches!(service.execute(&request()).await, Err(ApiError::Transport(_))));
        assert_eq!(service.validate(&request()).await, ValidationReport::unreachable());
    }
}
