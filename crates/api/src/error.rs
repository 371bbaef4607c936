//! Errors returned by the execution service client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    // ------ Transport errors ------

    /// The HTTP client could not be built from the configuration.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request never produced a response (connection refused, timeout...).
    #[error("could not reach the execution service: {0}")]
    Transport(#[source] reqwest::Error),

    // ------ Response errors ------

    /// The service answered with a non-success status.
    #[error("API request failed: {status_text}")]
    RequestFailed { status: u16, status_text: String },

    /// The response body is not a valid `WorkflowResponse`.
    #[error("invalid response from the execution service: {0}")]
    Decode(#[source] reqwest::Error),
}
